//! Scopes, visibility and sandbox status
//!
//! A [`Scope`] selects which variant of the schema a caller sees: the public
//! schema, or the public schema overlaid with one workspace's sandbox.
//! [`SandboxStatus`] is never stored; it is derived from an element's
//! [`Visibility`] relative to the scope it is read in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Identifier of a collaborative workspace
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Create workspace id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WorkspaceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkspaceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for WorkspaceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Read/write scope of a schema operation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Scope {
    /// The published schema shared by everyone
    #[default]
    Public,

    /// The published schema overlaid with one workspace's sandbox
    Workspace(WorkspaceId),
}

impl Scope {
    /// Scope for the given workspace
    #[inline]
    #[must_use]
    pub fn workspace(id: impl Into<WorkspaceId>) -> Self {
        Self::Workspace(id.into())
    }

    /// Build from an optional workspace id (`None` is public)
    #[inline]
    #[must_use]
    pub fn from_option(id: Option<WorkspaceId>) -> Self {
        id.map_or(Self::Public, Self::Workspace)
    }

    /// Check if this is the public sentinel
    #[inline]
    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }

    /// Workspace id, if any
    #[inline]
    #[must_use]
    pub fn workspace_id(&self) -> Option<&WorkspaceId> {
        match self {
            Self::Public => None,
            Self::Workspace(id) => Some(id),
        }
    }

    /// Tag mixed into dynamic IRIs and element identities
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Public => "",
            Self::Workspace(id) => id.as_str(),
        }
    }

    /// Visibility a newly written record gets in this scope
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        match self {
            Self::Public => Visibility::public(),
            Self::Workspace(id) => Visibility::workspace(id.clone()),
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("public"),
            Self::Workspace(id) => write!(f, "workspace:{id}"),
        }
    }
}

/// Whether an element is published or private to the requesting workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SandboxStatus {
    /// Visible in every scope
    Public,

    /// Visible only in the owning workspace's scope
    Private,
}

impl SandboxStatus {
    /// Check for [`SandboxStatus::Public`]
    #[inline]
    #[must_use]
    pub fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }

    /// Combine two statuses: public only if both are public
    #[inline]
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        if self.is_public() && other.is_public() {
            Self::Public
        } else {
            Self::Private
        }
    }
}

impl Display for SandboxStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("PUBLIC"),
            Self::Private => f.write_str("PRIVATE"),
        }
    }
}

/// Stored visibility metadata of a vertex, edge or property value
///
/// An empty workspace set means the record is public.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Visibility {
    workspaces: BTreeSet<WorkspaceId>,
}

impl Visibility {
    /// Public visibility
    #[inline]
    #[must_use]
    pub fn public() -> Self {
        Self::default()
    }

    /// Visibility restricted to one workspace
    #[must_use]
    pub fn workspace(id: WorkspaceId) -> Self {
        let mut workspaces = BTreeSet::new();
        workspaces.insert(id);
        Self { workspaces }
    }

    /// Workspaces named by this visibility
    #[inline]
    pub fn workspaces(&self) -> impl Iterator<Item = &WorkspaceId> {
        self.workspaces.iter()
    }

    /// Check if the record is public
    #[inline]
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.workspaces.is_empty()
    }

    /// Check if the visibility names the workspace
    #[inline]
    #[must_use]
    pub fn names(&self, workspace: &WorkspaceId) -> bool {
        self.workspaces.contains(workspace)
    }

    /// Check if a reader in `scope` may see the record
    #[must_use]
    pub fn is_visible_in(&self, scope: &Scope) -> bool {
        match scope {
            Scope::Public => self.is_public(),
            Scope::Workspace(id) => self.is_public() || self.names(id),
        }
    }

    /// Sandbox status of the record relative to `scope`
    ///
    /// PRIVATE iff the scope is a workspace this visibility names.
    #[must_use]
    pub fn sandbox_status(&self, scope: &Scope) -> SandboxStatus {
        match scope.workspace_id() {
            Some(id) if self.names(id) => SandboxStatus::Private,
            _ => SandboxStatus::Public,
        }
    }

    /// Copy of this visibility with the workspace removed
    #[must_use]
    pub fn without(&self, workspace: &WorkspaceId) -> Self {
        let mut workspaces = self.workspaces.clone();
        workspaces.remove(workspace);
        Self { workspaces }
    }

    /// Union of two visibilities
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            workspaces: self.workspaces.union(&other.workspaces).cloned().collect(),
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_public() {
            return f.write_str("public");
        }
        let names: Vec<&str> = self.workspaces.iter().map(WorkspaceId::as_str).collect();
        write!(f, "[{}]", names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_visibility_is_visible_everywhere() {
        let vis = Visibility::public();
        assert!(vis.is_visible_in(&Scope::Public));
        assert!(vis.is_visible_in(&Scope::workspace("w1")));
        assert_eq!(vis.sandbox_status(&Scope::workspace("w1")), SandboxStatus::Public);
    }

    #[test]
    fn workspace_visibility_is_private_to_its_workspace() {
        let vis = Visibility::workspace(WorkspaceId::new("w1"));
        assert!(!vis.is_visible_in(&Scope::Public));
        assert!(vis.is_visible_in(&Scope::workspace("w1")));
        assert!(!vis.is_visible_in(&Scope::workspace("w2")));
        assert_eq!(vis.sandbox_status(&Scope::workspace("w1")), SandboxStatus::Private);
        assert_eq!(vis.sandbox_status(&Scope::workspace("w2")), SandboxStatus::Public);
        assert_eq!(vis.sandbox_status(&Scope::Public), SandboxStatus::Public);
    }

    #[test]
    fn without_drops_workspace() {
        let ws = WorkspaceId::new("w1");
        let vis = Visibility::workspace(ws.clone()).without(&ws);
        assert!(vis.is_public());
    }

    #[test]
    fn status_and() {
        assert_eq!(SandboxStatus::Public.and(SandboxStatus::Public), SandboxStatus::Public);
        assert_eq!(SandboxStatus::Public.and(SandboxStatus::Private), SandboxStatus::Private);
    }

    #[test]
    fn scope_display() {
        assert_eq!(Scope::Public.to_string(), "public");
        assert_eq!(Scope::workspace("w0").to_string(), "workspace:w0");
        assert_eq!(Scope::workspace("w0").tag(), "w0");
    }
}
