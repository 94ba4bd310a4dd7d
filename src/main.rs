use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use site_cms::commands::{self, AppContext};
use site_cms::config::{load_config_from, save_config_to, Config};
use site_cms::email::{ContactForm, DemoRequest};
use site_cms::logger;
use site_cms::models::{FixedSectionKind, SectionUpdate, UploadMetadata};
use site_cms::sheets::SheetConfig;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "site-cms", version, about = "Manage marketing site content")]
struct Cli {
    /// Config file to use instead of the per-user default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the layout templates new sections can use
    Templates,
    /// Manage dynamic sections
    #[command(subcommand)]
    Sections(SectionsCommand),
    /// Print the assembled page in render order
    Page {
        /// Print navigation entries instead
        #[arg(long)]
        nav: bool,
        /// Include hidden sections
        #[arg(long)]
        all: bool,
    },
    /// Manage the fixed hero/about/features/solutions/contact sections
    #[command(subcommand)]
    Content(ContentCommand),
    /// Manage the media library
    #[command(subcommand)]
    Media(MediaCommand),
    /// Subscribe an address to the newsletter
    Subscribe {
        email: String,
        #[arg(long, default_value = "cli")]
        source: String,
    },
    /// Submit a contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        message: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Submit a demo request
    Demo {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Fetch a spreadsheet range as chart data
    Chart {
        spreadsheet_id: String,
        #[arg(long)]
        range: Option<String>,
        #[arg(long)]
        gid: Option<String>,
    },
    /// Export, restore and track data migration
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Show or replace the configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    Show,
    /// Replace the configuration with a JSON object
    Set { json: String },
}

#[derive(Subcommand)]
enum SectionsCommand {
    List,
    Show { id: String },
    Create {
        #[arg(long)]
        layout: String,
        #[arg(long)]
        name: String,
        /// JSON object of field values
        #[arg(long)]
        fields: Option<String>,
    },
    /// Apply a JSON partial update, e.g. '{"isVisible": false}'
    Update { id: String, json: String },
    Delete { id: String },
    Reorder { ids: Vec<String> },
    Reset,
    Validate { id: String },
}

#[derive(Subcommand)]
enum ContentCommand {
    Show { section: FixedSectionKind },
    /// Replace a fixed section with a JSON object
    Set { section: FixedSectionKind, json: String },
    Reset { section: FixedSectionKind },
}

#[derive(Subcommand)]
enum MediaCommand {
    Upload {
        path: PathBuf,
        #[arg(long)]
        folder: Option<String>,
        #[arg(long)]
        alt: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    List {
        #[arg(long)]
        folder: Option<String>,
    },
    /// Write a stored file back to disk
    Export {
        id: String,
        #[arg(long)]
        output: PathBuf,
    },
    Delete { id: String },
    Mkdir {
        name: String,
        #[arg(long)]
        parent: Option<String>,
    },
    Folders,
    Rmdir { id: String },
}

#[derive(Subcommand)]
enum MigrateCommand {
    Run {
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        force: bool,
    },
    Status,
    Reset,
    Restore { input: PathBuf },
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_json<T: serde::de::DeserializeOwned>(raw: &str) -> anyhow::Result<T> {
    serde_json::from_str(raw).with_context(|| format!("invalid JSON argument: {}", raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_logging();
    tracing::info!("site-cms starting...");

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => commands::get_config()?,
    };

    if let Command::Config(cmd) = &cli.command {
        return match cmd {
            ConfigCommand::Show => print(&config),
            ConfigCommand::Set { json } => {
                let updated: Config = parse_json(json)?;
                match &cli.config {
                    Some(path) => save_config_to(path, &updated)?,
                    None => commands::update_config(updated.clone())?,
                }
                print(&updated)
            }
        };
    }
    if let Command::Templates = cli.command {
        return print(&commands::list_templates());
    }

    let ctx = AppContext::open(config).context("failed to open content store")?;

    match cli.command {
        Command::Sections(cmd) => match cmd {
            SectionsCommand::List => print(&commands::list_sections(&ctx)?),
            SectionsCommand::Show { id } => print(&commands::get_section(&ctx, &id)?),
            SectionsCommand::Create {
                layout,
                name,
                fields,
            } => {
                let fields: BTreeMap<String, Value> = match fields {
                    Some(raw) => parse_json(&raw)?,
                    None => BTreeMap::new(),
                };
                print(&commands::create_section(&ctx, &layout, &name, fields)?)
            }
            SectionsCommand::Update { id, json } => {
                let update: SectionUpdate = parse_json(&json)?;
                print(&commands::update_section(&ctx, &id, update)?)
            }
            SectionsCommand::Delete { id } => {
                commands::delete_section(&ctx, &id)?;
                print(&serde_json::json!({ "deleted": id }))
            }
            SectionsCommand::Reorder { ids } => print(&commands::reorder_sections(&ctx, &ids)?),
            SectionsCommand::Reset => {
                commands::reset_sections(&ctx)?;
                print(&serde_json::json!({ "reset": true }))
            }
            SectionsCommand::Validate { id } => print(&commands::validate_section(&ctx, &id)?),
        },
        Command::Page { nav, all } => {
            if nav {
                print(&commands::get_navigation(&ctx)?)
            } else {
                print(&commands::get_page(&ctx, all)?)
            }
        }
        Command::Content(cmd) => match cmd {
            ContentCommand::Show { section } => {
                print(&commands::get_fixed_section(&ctx, section)?)
            }
            ContentCommand::Set { section, json } => {
                let data: Value = parse_json(&json)?;
                print(&commands::update_fixed_section(&ctx, section, data)?)
            }
            ContentCommand::Reset { section } => {
                print(&commands::reset_fixed_section(&ctx, section)?)
            }
        },
        Command::Media(cmd) => match cmd {
            MediaCommand::Upload {
                path,
                folder,
                alt,
                tags,
            } => {
                let metadata = UploadMetadata {
                    mime_type: None,
                    alt_text: alt,
                    tags,
                };
                print(&commands::upload_media(&ctx, &path, folder.as_deref(), metadata)?)
            }
            MediaCommand::List { folder } => {
                print(&commands::list_media(&ctx, folder.as_deref())?)
            }
            MediaCommand::Export { id, output } => {
                print(&commands::export_media(&ctx, &id, &output)?)
            }
            MediaCommand::Delete { id } => {
                let deleted = commands::delete_media(&ctx, &id)?;
                print(&serde_json::json!({ "deleted": deleted }))
            }
            MediaCommand::Mkdir { name, parent } => {
                print(&commands::create_media_folder(&ctx, &name, parent.as_deref())?)
            }
            MediaCommand::Folders => print(&commands::list_media_folders(&ctx)?),
            MediaCommand::Rmdir { id } => {
                commands::delete_media_folder(&ctx, &id)?;
                print(&serde_json::json!({ "deleted": id }))
            }
        },
        Command::Subscribe { email, source } => {
            print(&commands::subscribe_newsletter(&ctx, &email, &source).await)
        }
        Command::Contact {
            name,
            email,
            message,
            company,
            phone,
        } => {
            let form = ContactForm {
                name,
                email,
                company,
                phone,
                message,
            };
            print(&commands::submit_contact_form(&ctx, &form).await)
        }
        Command::Demo {
            name,
            email,
            company,
            phone,
            date,
        } => {
            let request = DemoRequest {
                name,
                email,
                company,
                phone,
                preferred_date: date,
            };
            print(&commands::submit_demo_request(&ctx, &request).await)
        }
        Command::Chart {
            spreadsheet_id,
            range,
            gid,
        } => {
            let sheet = SheetConfig {
                spreadsheet_id,
                range,
                gid,
                api_key: None,
            };
            print(&commands::fetch_chart_data(&ctx, sheet).await?)
        }
        Command::Migrate(cmd) => match cmd {
            MigrateCommand::Run { output, force } => {
                print(&commands::migrate(&ctx, &output, force)?)
            }
            MigrateCommand::Status => print(&commands::migration_status(&ctx)?),
            MigrateCommand::Reset => {
                commands::reset_migration(&ctx)?;
                print(&commands::migration_status(&ctx)?)
            }
            MigrateCommand::Restore { input } => {
                commands::restore(&ctx, &input)?;
                print(&serde_json::json!({ "restored": input }))
            }
        },
        Command::Config(_) | Command::Templates => Ok(()),
    }
}
