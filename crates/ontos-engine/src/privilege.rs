//! Privilege gate
//!
//! Decides whether a user may create, update, publish or delete schema
//! elements in a scope:
//!
//! | Operation     | System user | Public scope | Workspace scope              |
//! |---------------|-------------|--------------|------------------------------|
//! | create/update | allowed     | PUBLISH      | workspace write access + ADD |
//! | publish       | allowed     | n/a          | PUBLISH                      |
//! | delete        | allowed     | denied       | ADMIN                        |
//!
//! Privilege sets and workspace access come from an
//! [`AuthorizationProvider`].

use crate::error::{OntologyError, OntologyResult};
use dashmap::DashMap;
use ontos_model::{Scope, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Named privilege held by a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Privilege {
    /// Add schema elements inside a workspace
    Add,
    /// Change the public schema
    Publish,
    /// Delete schema elements
    Admin,
}

impl Privilege {
    /// Upper-case privilege name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Publish => "PUBLISH",
            Self::Admin => "ADMIN",
        }
    }
}

impl Display for Privilege {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acting user of a schema operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    id: String,
    system: bool,
}

impl User {
    /// Ordinary user
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            system: false,
        }
    }

    /// The system identity, which bypasses every privilege check
    #[inline]
    #[must_use]
    pub fn system() -> Self {
        Self {
            id: "system".to_string(),
            system: true,
        }
    }

    /// Identifier privileges are granted to
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Check if this is the [`system`](Self::system) identity
    #[inline]
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.system
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Privilege and workspace-access collaborator
pub trait AuthorizationProvider: Send + Sync + fmt::Debug {
    /// Check if the user holds the privilege
    fn has_privilege(&self, user: &User, privilege: Privilege) -> bool;

    /// Check if the user may write to the workspace
    fn has_workspace_write_access(&self, user: &User, workspace: &WorkspaceId) -> bool;
}

/// Kind of schema operation being authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create or update an element
    Write,
    /// Publish an element out of a workspace
    Publish,
    /// Delete an element
    Delete,
}

/// Authorize an operation according to the decision table
///
/// # Errors
/// Returns [`OntologyError::AccessDenied`] when the table denies the operation
pub fn authorize(
    provider: &dyn AuthorizationProvider,
    user: &User,
    operation: Operation,
    scope: &Scope,
) -> OntologyResult<()> {
    if user.is_system() {
        return Ok(());
    }
    let require = |privilege: Privilege| {
        if provider.has_privilege(user, privilege) {
            Ok(())
        } else {
            Err(OntologyError::access_denied(
                user.id(),
                format!("missing {privilege} privilege"),
            ))
        }
    };
    match (operation, scope) {
        (Operation::Write | Operation::Publish, Scope::Public) => require(Privilege::Publish),
        (Operation::Write, Scope::Workspace(workspace)) => {
            if !provider.has_workspace_write_access(user, workspace) {
                return Err(OntologyError::access_denied(
                    user.id(),
                    format!("no write access to workspace {workspace}"),
                ));
            }
            require(Privilege::Add)
        }
        (Operation::Publish, Scope::Workspace(_)) => require(Privilege::Publish),
        (Operation::Delete, Scope::Public) => Err(OntologyError::access_denied(
            user.id(),
            "published elements cannot be deleted",
        )),
        (Operation::Delete, Scope::Workspace(_)) => require(Privilege::Admin),
    }
}

/// In-memory grants table
#[derive(Debug, Default)]
pub struct StaticAuthorization {
    privileges: DashMap<String, BTreeSet<Privilege>>,
    workspaces: DashMap<String, BTreeSet<WorkspaceId>>,
}

impl StaticAuthorization {
    /// Empty grants table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant privileges to a user
    pub fn grant(&self, user: &str, privileges: impl IntoIterator<Item = Privilege>) {
        self.privileges
            .entry(user.to_string())
            .or_default()
            .extend(privileges);
    }

    /// Revoke a privilege
    pub fn revoke(&self, user: &str, privilege: Privilege) {
        if let Some(mut held) = self.privileges.get_mut(user) {
            held.remove(&privilege);
        }
    }

    /// Give a user write access to a workspace
    pub fn grant_workspace_write(&self, user: &str, workspace: impl Into<WorkspaceId>) {
        self.workspaces
            .entry(user.to_string())
            .or_default()
            .insert(workspace.into());
    }

    /// Builder form of [`grant`](Self::grant)
    #[must_use]
    pub fn with_privileges(self, user: &str, privileges: impl IntoIterator<Item = Privilege>) -> Self {
        self.grant(user, privileges);
        self
    }

    /// Builder form of [`grant_workspace_write`](Self::grant_workspace_write)
    #[must_use]
    pub fn with_workspace_write(self, user: &str, workspace: impl Into<WorkspaceId>) -> Self {
        self.grant_workspace_write(user, workspace);
        self
    }
}

impl AuthorizationProvider for StaticAuthorization {
    fn has_privilege(&self, user: &User, privilege: Privilege) -> bool {
        self.privileges
            .get(user.id())
            .is_some_and(|held| held.contains(&privilege))
    }

    fn has_workspace_write_access(&self, user: &User, workspace: &WorkspaceId) -> bool {
        self.workspaces
            .get(user.id())
            .is_some_and(|held| held.contains(workspace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn provider() -> StaticAuthorization {
        StaticAuthorization::new()
            .with_privileges("editor", [Privilege::Add])
            .with_workspace_write("editor", "w1")
            .with_privileges("publisher", [Privilege::Publish])
            .with_privileges("admin", [Privilege::Admin, Privilege::Add])
            .with_workspace_write("admin", "w1")
    }

    fn check(user: &str, op: Operation, scope: &Scope) -> bool {
        authorize(&provider(), &User::new(user), op, scope).is_ok()
    }

    #[test]
    fn system_user_always_allowed() {
        let p = provider();
        for op in [Operation::Write, Operation::Publish, Operation::Delete] {
            for scope in [Scope::Public, Scope::workspace("w9")] {
                assert!(authorize(&p, &User::system(), op, &scope).is_ok());
            }
        }
    }

    #[test]
    fn write_needs_access_and_add_in_workspace() {
        let w1 = Scope::workspace("w1");
        assert!(check("editor", Operation::Write, &w1));
        assert!(!check("editor", Operation::Write, &Scope::workspace("w2")));
        assert!(!check("publisher", Operation::Write, &w1));
    }

    #[test]
    fn public_write_and_publish_need_publish() {
        assert!(check("publisher", Operation::Write, &Scope::Public));
        assert!(!check("editor", Operation::Write, &Scope::Public));
        assert!(check("publisher", Operation::Publish, &Scope::workspace("w1")));
        assert!(!check("editor", Operation::Publish, &Scope::workspace("w1")));
    }

    #[test]
    fn delete_needs_admin_and_never_public() {
        assert!(check("admin", Operation::Delete, &Scope::workspace("w1")));
        assert!(!check("editor", Operation::Delete, &Scope::workspace("w1")));
        let err = authorize(&provider(), &User::new("admin"), Operation::Delete, &Scope::Public)
            .unwrap_err();
        assert!(err.is_access_denied());
    }

    #[test]
    fn revoke_removes_privilege() {
        let p = provider();
        p.revoke("publisher", Privilege::Publish);
        assert!(!p.has_privilege(&User::new("publisher"), Privilege::Publish));
    }

    fn operation() -> impl Strategy<Value = Operation> {
        prop_oneof![
            Just(Operation::Write),
            Just(Operation::Publish),
            Just(Operation::Delete),
        ]
    }

    fn privileges() -> impl Strategy<Value = Vec<Privilege>> {
        proptest::sample::subsequence(vec![Privilege::Add, Privilege::Publish, Privilege::Admin], 0..=3)
    }

    proptest! {
        #[test]
        fn prop_public_delete_is_always_denied(held in privileges()) {
            let p = StaticAuthorization::new().with_privileges("u", held);
            let result = authorize(&p, &User::new("u"), Operation::Delete, &Scope::Public);
            prop_assert!(result.is_err());
        }

        #[test]
        fn prop_workspace_write_needs_access(held in privileges(), workspace in "[a-z]{1,4}") {
            let p = StaticAuthorization::new().with_privileges("u", held);
            let result = authorize(&p, &User::new("u"), Operation::Write, &Scope::workspace(workspace.as_str()));
            prop_assert!(result.is_err());
        }

        #[test]
        fn prop_users_without_grants_are_denied(op in operation(), workspace in proptest::option::of("[a-z]{1,4}")) {
            let scope = match workspace {
                Some(w) => Scope::workspace(w.as_str()),
                None => Scope::Public,
            };
            let err = authorize(&StaticAuthorization::new(), &User::new("u"), op, &scope).unwrap_err();
            prop_assert!(err.is_access_denied());
        }
    }
}
