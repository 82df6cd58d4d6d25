use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ontos_engine::{OntologyConfig, OntologyRepository, StaticAuthorization, User};
use ontos_ingest::{ImportOutcome, OntologyImporter};
use ontos_model::{generate_dynamic_iri, ElementKind, Ontology, Scope};
use ontos_store::MemoryStore;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("ontos")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Import and inspect sandboxed schema documents")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML engine configuration"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("import")
                .about("Import schema documents in order and summarize the result")
                .arg(
                    Arg::new("files")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON or YAML schema documents"),
                )
                .arg(
                    Arg::new("iri")
                        .long("iri")
                        .help("Document IRI, overriding the one in the file (single file only)"),
                )
                .arg(
                    Arg::new("resource-dir")
                        .long("resource-dir")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory icon file names resolve against"),
                )
                .arg(
                    Arg::new("workspace")
                        .long("workspace")
                        .help("Import privately into this workspace"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("load")
                .about("Import the documents listed in the configuration")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("iri")
                .about("Print the dynamic IRI for a user-named element")
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .value_parser(["concept", "relationship", "property"]),
                )
                .arg(Arg::new("name").required(true).help("Display name"))
                .arg(
                    Arg::new("scope")
                        .required(true)
                        .help("Workspace the element is created in, or `public`"),
                )
                .arg(
                    Arg::new("extra")
                        .num_args(0..)
                        .help("Additional values mixed into the hash"),
                ),
        )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => OntologyConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => OntologyConfig::default(),
    };

    match matches.subcommand() {
        Some(("import", args)) => import(config, args),
        Some(("load", args)) => load(config, args),
        Some(("iri", args)) => iri(args),
        _ => Ok(()),
    }
}

fn open(config: OntologyConfig) -> Result<Arc<OntologyRepository>> {
    let repository = OntologyRepository::open(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticAuthorization::new()),
        config,
    )
    .context("opening schema repository")?;
    Ok(Arc::new(repository))
}

fn scope_of(args: &ArgMatches) -> Scope {
    Scope::from_option(args.get_one::<String>("workspace").map(|w| w.as_str().into()))
}

fn import(config: OntologyConfig, args: &ArgMatches) -> Result<()> {
    let files: Vec<&PathBuf> = args.get_many::<PathBuf>("files").into_iter().flatten().collect();
    let document_iri = args.get_one::<String>("iri").map(String::as_str);
    if document_iri.is_some() && files.len() > 1 {
        bail!("--iri applies to a single file");
    }
    let resource_dir = args.get_one::<PathBuf>("resource-dir").map(PathBuf::as_path);
    let scope = scope_of(args);

    let importer = OntologyImporter::new(open(config)?);
    let user = User::system();
    tracing::info!(files = files.len(), %scope, "importing documents");
    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        tracing::debug!(file = %file.display(), "reading document");
        let outcome = importer
            .import_file(file, document_iri, resource_dir, &user, &scope)
            .with_context(|| format!("importing {}", file.display()))?;
        outcomes.push(outcome);
    }
    let ontology = importer.repository().get_ontology(&scope)?;
    report(&outcomes, &ontology, args.get_flag("json"))
}

fn load(config: OntologyConfig, args: &ArgMatches) -> Result<()> {
    if config.import.documents.is_empty() {
        bail!("no documents configured; pass --config with [[import.documents]] entries");
    }
    tracing::info!(documents = config.import.documents.len(), "loading configured documents");
    let importer = OntologyImporter::new(open(config)?);
    let outcomes = importer.load_configured(&User::system())?;
    let ontology = importer.repository().get_ontology(&Scope::Public)?;
    report(&outcomes, &ontology, args.get_flag("json"))
}

fn iri(args: &ArgMatches) -> Result<()> {
    let kind: ElementKind = args
        .get_one::<String>("kind")
        .map(|k| k.parse())
        .transpose()?
        .context("missing kind")?;
    let name = args.get_one::<String>("name").context("missing name")?;
    tracing::debug!(%kind, %name, "generating dynamic IRI");
    let extra: Vec<&str> = args
        .get_many::<String>("extra")
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();
    let scope = match args.get_one::<String>("scope").map(String::as_str) {
        None | Some("public") => Scope::Public,
        Some(workspace) => Scope::workspace(workspace),
    };
    println!("{}", generate_dynamic_iri(kind, name, scope.tag(), &extra));
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    scope: String,
    documents: Vec<DocumentLine<'a>>,
    concepts: Vec<&'a str>,
    relationships: Vec<&'a str>,
    properties: Vec<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentLine<'a> {
    iri: &'a str,
    status: &'static str,
    hash: Option<&'a str>,
}

fn report(outcomes: &[ImportOutcome], ontology: &Ontology, json: bool) -> Result<()> {
    let documents: Vec<DocumentLine<'_>> = outcomes
        .iter()
        .map(|outcome| match outcome {
            ImportOutcome::Imported(summary) => DocumentLine {
                iri: &summary.document_iri,
                status: "imported",
                hash: Some(&summary.hash),
            },
            ImportOutcome::Unchanged { document_iri } => DocumentLine {
                iri: document_iri,
                status: "unchanged",
                hash: None,
            },
        })
        .collect();

    if json {
        let report = Report {
            scope: ontology.scope().to_string(),
            documents,
            concepts: ontology.concepts().map(|c| c.iri().as_str()).collect(),
            relationships: ontology.relationships().map(|r| r.iri().as_str()).collect(),
            properties: ontology.properties().map(|p| p.iri().as_str()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for document in &documents {
        println!("{:<10} {}", document.status, document.iri);
    }
    println!();
    println!("Scope: {}", ontology.scope());
    println!("  Concepts:      {}", ontology.concept_count());
    println!("  Relationships: {}", ontology.relationship_count());
    println!("  Properties:    {}", ontology.property_count());
    for concept in ontology.concepts() {
        let depth = ontology.concept_ancestors(concept.iri().as_str()).len();
        println!("  {:indent$}{} ({})", "", concept.core.label(), concept.iri(), indent = depth * 2);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn workspace_flag_selects_scope() {
        let matches = cli().get_matches_from(["ontos", "import", "a.json", "--workspace", "w1"]);
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(scope_of(args), Scope::workspace("w1"));

        let matches = cli().get_matches_from(["ontos", "import", "a.json"]);
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(scope_of(args), Scope::Public);
    }

    #[test]
    fn iri_takes_scope_and_extras() {
        let matches = cli().get_matches_from(["ontos", "iri", "concept", "XxX", "w0", "1"]);
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_one::<String>("scope").map(String::as_str), Some("w0"));
        assert_eq!(args.get_many::<String>("extra").unwrap().count(), 1);
        assert!(iri(args).is_ok());
    }

    #[test]
    fn import_accepts_many_files() {
        let matches = cli().get_matches_from(["ontos", "import", "a.json", "b.yaml", "--json"]);
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "import");
        assert_eq!(args.get_many::<PathBuf>("files").unwrap().count(), 2);
        assert!(args.get_flag("json"));
    }
}
