//! Command-line front end over the contact directory core.
//!
//! # Responsibility
//! - Load a contacts document and print the filtered view.
//! - Share configuration and logging bootstrap with the FFI front end.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use contactbook_core::{
    init_logging_from_config, or_not_available, read_contact_file, ActiveFilter, ContactRecord,
    ContactStore, CoreConfig, FilterCriteria, TagFilter, TypeFilter,
};

#[derive(Parser, Debug)]
#[command(name = "contactbook", version)]
struct Cli {
    /// Contacts document (`{ "contacts": [...] }`). Defaults to CONTACTBOOK_DATA_PATH.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Log level override (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for log files; logging is off without one.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print contacts matching the filters (default)
    List(ListArgs),
    /// Print every distinct tag
    Tags,
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    /// Contact type: All, Contractor, Employee or Freelancer
    #[arg(long = "type", default_value = "All")]
    contact_type: String,

    /// Exact tag to match
    #[arg(long, default_value = "All")]
    tag: String,

    /// Active flag: All, true or false
    #[arg(long, default_value = "All")]
    active: String,

    /// Only main contacts
    #[arg(long, default_value_t = false)]
    main_only: bool,

    /// Case-insensitive substring of "<first> <last>"
    #[arg(long, default_value = "")]
    search: String,

    /// Print matching records as a JSON array
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli);
    init_logging_from_config(&config).context("failed to initialize logging")?;

    let data_path = config
        .data_path
        .clone()
        .context("no contacts document given; pass --data or set CONTACTBOOK_DATA_PATH")?;

    let mut store = ContactStore::in_memory();
    if !store.load_or_empty(read_contact_file(&data_path)) {
        eprintln!(
            "warning: could not load `{}`; continuing with an empty directory",
            data_path.display()
        );
    }
    info!("event=cli_start module=cli status=ok count={}", store.len());

    match cli.command {
        Some(Command::Tags) => {
            for tag in store.unique_tags() {
                println!("{tag}");
            }
        }
        Some(Command::List(args)) => print_list(&store, &args)?,
        None => print_list(&store, &ListArgs::default_listing())?,
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> CoreConfig {
    let mut config = CoreConfig::from_env();
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    if let Some(data) = &cli.data {
        config.data_path = Some(data.clone());
    }
    config
}

impl ListArgs {
    fn default_listing() -> Self {
        Self {
            contact_type: "All".to_string(),
            tag: "All".to_string(),
            active: "All".to_string(),
            ..Self::default()
        }
    }

    fn criteria(&self) -> Result<FilterCriteria> {
        Ok(FilterCriteria {
            contact_type: TypeFilter::try_from(self.contact_type.clone())?,
            tag: TagFilter::from(self.tag.clone()),
            active_contact: ActiveFilter::try_from(self.active.clone())?,
            main_contact_only: self.main_only,
        })
    }
}

fn print_list(store: &ContactStore, args: &ListArgs) -> Result<()> {
    let criteria = args.criteria()?;
    let visible = store.get_filtered(&criteria, &args.search);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    for record in &visible {
        println!("{}", format_row(record));
    }
    println!("{} of {} contact(s)", visible.len(), store.len());
    Ok(())
}

fn format_row(record: &ContactRecord) -> String {
    let details = &record.contact_details;
    let phone = details.phone_numbers.first().map(|phone| phone.number.as_str());
    let email = details.emails.first().map(|email| email.email.as_str());
    let main = if record.main_contact { "*" } else { " " };
    format!(
        "{main}{:>4}  {:<24}  {:<16}  {:<10}  {:<2}  {:<15}  {}",
        record.id,
        record.display_name(),
        or_not_available(Some(record.role.as_str())),
        record.contact_type.as_str(),
        details.preferred_language.flag_country_code(),
        or_not_available(phone),
        or_not_available(email),
    )
}
