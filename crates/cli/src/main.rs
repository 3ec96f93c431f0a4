use anyhow::Context;
use clap::{Parser, Subcommand};
use clinform_core::config::{data_dir_from_env_value, record_collection_from_env_value};
use clinform_core::print::render_html;
use clinform_core::{
    CoreConfig, CurrentTemplate, DataEntrySession, FileStorage, FormDesigner, JsonRecordStore,
    JsonTemplateStore, PatientRoster, RecordCollection, RecordStore, ReportView, TemplateDraft,
    TemplateStore,
};
use clinform_ids::{Clock, IdGenerator, SystemClock, TimestampIdGenerator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinform")]
#[command(about = "Dynamic clinical form templates, records and reports")]
struct Cli {
    /// Data directory (overrides CLINFORM_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage form templates
    #[command(subcommand)]
    Template(TemplateCommand),
    /// Fill in, list and print records
    #[command(subcommand)]
    Record(RecordCommand),
    /// List the patient roster
    Patients,
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// List saved templates
    List,
    /// Show a template's sections and fields
    Show {
        /// Template id
        id: String,
    },
    /// Delete a template (records keep their snapshot)
    Delete {
        /// Template id
        id: String,
    },
    /// Save a draft `{name, sections}` read from a JSON or YAML file as a new template
    Import {
        /// Path to a .json, .yaml or .yml file
        file: PathBuf,
    },
    /// Print a template document
    Export {
        /// Template id
        id: String,
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
    /// Make a template the current template used by `record fill`
    Apply {
        /// Template id
        id: String,
    },
}

#[derive(Subcommand)]
enum RecordCommand {
    /// List records
    List {
        /// Only this patient's records
        #[arg(long)]
        patient: Option<String>,
        /// Record collection: reports or fertility
        #[arg(long)]
        collection: Option<String>,
    },
    /// Fill in a form for a patient and save it
    Fill {
        /// Patient id from the roster
        #[arg(long)]
        patient: String,
        /// Template id (defaults to the current template)
        #[arg(long)]
        template: Option<String>,
        /// Field value as key=value (repeatable)
        #[arg(long = "set", value_parser = parse_key_val)]
        values: Vec<(String, String)>,
        /// Record collection: reports or fertility
        #[arg(long)]
        collection: Option<String>,
    },
    /// Show a record as a text report
    Show {
        /// Record id
        id: String,
        /// Record collection: reports or fertility
        #[arg(long)]
        collection: Option<String>,
    },
    /// Write a record as a printable HTML report
    Print {
        /// Record id
        id: String,
        /// Output file
        #[arg(long)]
        out: PathBuf,
        /// Record collection: reports or fertility
        #[arg(long)]
        collection: Option<String>,
    },
    /// Delete a record
    Delete {
        /// Record id
        id: String,
        /// Record collection: reports or fertility
        #[arg(long)]
        collection: Option<String>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

/// Shared services for one invocation.
struct App {
    config: CoreConfig,
    storage: FileStorage,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl App {
    fn templates(&self) -> JsonTemplateStore<FileStorage> {
        JsonTemplateStore::open(self.storage.clone(), self.ids.clone(), self.clock.clone())
    }

    fn records(&self, collection: Option<&str>) -> anyhow::Result<JsonRecordStore<FileStorage>> {
        let collection = match collection {
            Some(name) => RecordCollection::from_name(name)?,
            None => self.config.record_collection().clone(),
        };
        Ok(JsonRecordStore::open(
            self.storage.clone(),
            collection,
            self.ids.clone(),
            self.clock.clone(),
        ))
    }

    fn current(&self) -> CurrentTemplate<FileStorage> {
        CurrentTemplate::new(self.storage.clone())
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinform=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| data_dir_from_env_value(std::env::var("CLINFORM_DATA_DIR").ok()));
    let collection =
        record_collection_from_env_value(std::env::var("CLINFORM_RECORD_COLLECTION").ok())?;
    let config = CoreConfig::new(data_dir, collection)?;

    let storage = config
        .storage()
        .with_context(|| format!("opening data directory {}", config.data_dir().display()))?;
    tracing::debug!("using data directory {}", config.data_dir().display());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let app = App {
        config,
        storage,
        ids: Arc::new(TimestampIdGenerator::new(clock.clone())),
        clock,
    };

    match cli.command {
        Some(Commands::Template(cmd)) => run_template(&app, cmd),
        Some(Commands::Record(cmd)) => run_record(&app, cmd),
        Some(Commands::Patients) => {
            let roster = PatientRoster::load(&app.storage);
            if roster.list().is_empty() {
                println!("No patients found.");
            }
            for patient in roster.list() {
                println!("ID: {}, Name: {}", patient.id, patient.name);
            }
            Ok(())
        }
        None => {
            println!("Use 'clinform --help' for commands");
            Ok(())
        }
    }
}

fn run_template(app: &App, cmd: TemplateCommand) -> anyhow::Result<()> {
    let mut store = app.templates();

    match cmd {
        TemplateCommand::List => {
            if store.list().is_empty() {
                println!("No templates found.");
            }
            for t in store.list() {
                println!(
                    "ID: {}, Name: {}, Fields: {}, Created: {}",
                    t.id,
                    t.name,
                    t.field_count(),
                    t.created_at
                );
            }
        }
        TemplateCommand::Show { id } => {
            let t = store.get(&id)?;
            println!("{} ({})", t.name, t.id);
            for section in &t.sections {
                println!("\n== {} ==", section.title);
                for field in &section.fields {
                    let kind = field
                        .field_type()
                        .map(|ft| ft.to_string())
                        .unwrap_or_else(|| "unknown".into());
                    let required = if field.required { " *" } else { "" };
                    println!("  {} [{}] {}{}", field.id, kind, field.label, required);
                }
            }
        }
        TemplateCommand::Delete { id } => {
            let removed = store.delete(&id)?;
            println!("Deleted template {} ({})", removed.name, removed.id);
        }
        TemplateCommand::Import { file } => {
            let draft = read_draft(&file)?;
            let designer = FormDesigner::with_draft(app.ids.clone(), draft);
            let saved = designer.save_as_template(&mut store)?;
            println!("Saved template {} with ID: {}", saved.name, saved.id);
        }
        TemplateCommand::Export { id, yaml } => {
            let t = store.get(&id)?;
            let out = if yaml {
                serde_yaml::to_string(t)?
            } else {
                serde_json::to_string_pretty(t)?
            };
            println!("{out}");
        }
        TemplateCommand::Apply { id } => {
            let t = store.get(&id)?;
            app.current().apply(t)?;
            println!("Applied template {} ({}) as the current template", t.name, t.id);
        }
    }

    Ok(())
}

fn read_draft(path: &Path) -> anyhow::Result<TemplateDraft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let draft = if is_yaml {
        serde_yaml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
    } else {
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
    };
    Ok(draft)
}

fn run_record(app: &App, cmd: RecordCommand) -> anyhow::Result<()> {
    match cmd {
        RecordCommand::List {
            patient,
            collection,
        } => {
            let store = app.records(collection.as_deref())?;
            let records = match patient.as_deref() {
                Some(id) => store.for_patient(id),
                None => store.list().iter().collect(),
            };
            if records.is_empty() {
                println!("No records found.");
            }
            for r in records {
                println!(
                    "ID: {}, Patient: {} ({}), Form: {}, Date: {}",
                    r.id, r.patient_name, r.patient_id, r.template_name, r.date
                );
            }
        }
        RecordCommand::Fill {
            patient,
            template,
            values,
            collection,
        } => {
            let roster = PatientRoster::load(&app.storage);
            let patient = roster.get(&patient)?.clone();
            let templates = app.templates();

            let mut session = match template.as_deref() {
                Some(id) => DataEntrySession::new(Some(patient), Some(templates.get(id)?)),
                None => DataEntrySession::from_current(Some(patient), &app.current()),
            };
            for (key, value) in &values {
                session.set_input(key, value);
            }

            let mut store = app.records(collection.as_deref())?;
            let record = session.save(&mut store)?;
            println!("Saved record with ID: {}", record.id);
        }
        RecordCommand::Show { id, collection } => {
            let store = app.records(collection.as_deref())?;
            let record = store.get(&id)?;
            let view = ReportView::for_record(record, &app.templates());
            print!("{}", view.to_text());
        }
        RecordCommand::Print {
            id,
            out,
            collection,
        } => {
            let store = app.records(collection.as_deref())?;
            let record = store.get(&id)?;
            let view = ReportView::for_record(record, &app.templates());
            let html = render_html(&view, app.clock.now())?;
            std::fs::write(&out, html).with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote report {} to {}", record.id, out.display());
        }
        RecordCommand::Delete { id, collection } => {
            let mut store = app.records(collection.as_deref())?;
            let removed = store.remove(&id)?;
            println!("Deleted record {} for patient {}", removed.id, removed.patient_id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("age=34").expect("should parse"),
            ("age".to_string(), "34".to_string())
        );
        assert_eq!(
            parse_key_val("notes=a=b").expect("should parse"),
            ("notes".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("age").is_err());
        assert!(parse_key_val("=34").is_err());
    }

    #[test]
    fn test_cli_parses_fill() {
        let cli = Cli::try_parse_from([
            "clinform",
            "--data-dir",
            "/tmp/data",
            "record",
            "fill",
            "--patient",
            "ASCAS03579",
            "--set",
            "age=34",
            "--set",
            "consent=yes",
        ])
        .expect("should parse");

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/data")));
        let Some(Commands::Record(RecordCommand::Fill { patient, values, .. })) = cli.command
        else {
            panic!("expected record fill");
        };
        assert_eq!(patient, "ASCAS03579");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
