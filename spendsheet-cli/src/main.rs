use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use spendsheet_finance::{
    CsvDirPublisher, Publisher, SourceInput, categorize, publish_by_category, run_pipeline,
    sort_by_date,
};
use spendsheet_ingest::{Source, adapter_for, detect_source};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
#[cfg(feature = "sheets")]
mod google_sheets;
mod state;
mod stdout;

use config::{Config, PublishTarget};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SPENDSHEET_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "spendsheet",
    version = VERSION,
    about = "Normalize bank exports into categorized spending sheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest all exports, categorize, sort and publish one sheet per category
    Run(RunArgs),

    /// Adapt a single export and print its canonical records
    Ingest {
        /// Institution; detected from the file name when omitted
        #[arg(long, value_parser = parse_source)]
        source: Option<Source>,

        /// Export CSV
        file: PathBuf,

        /// Emit JSON instead of comma-separated tuples
        #[arg(long)]
        json: bool,
    },

    /// Manage ~/.spendsheet/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Google Sheets integration
    #[cfg(feature = "sheets")]
    Sheets {
        #[command(subcommand)]
        command: SheetsCommand,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Brokerage cash-management export
    #[arg(long)]
    brokerage: Option<PathBuf>,

    /// Membership credit card export
    #[arg(long)]
    card: Option<PathBuf>,

    /// Digital bank export
    #[arg(long)]
    bank: Option<PathBuf>,

    #[arg(long, value_enum)]
    target: Option<PublishTarget>,

    /// Output directory for target = csv
    #[arg(long)]
    out: Option<PathBuf>,

    /// Workbook id for target = sheets
    #[arg(long)]
    spreadsheet_id: Option<String>,

    /// Insurer payments below this are renters insurance (default 25.00)
    #[arg(long)]
    insurance_threshold: Option<Decimal>,

    /// Fail instead of publishing when any export could not be ingested
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[cfg(feature = "sheets")]
#[derive(Subcommand, Debug)]
enum SheetsCommand {
    /// Store OAuth client credentials and authorize (TTY required)
    Connect,
}

fn parse_source(s: &str) -> std::result::Result<Source, String> {
    s.parse::<Source>().map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let cfg = config::load_config()?;
            run(args, cfg)?;
        }

        Command::Ingest { source, file, json } => {
            let cfg = config::load_config()?;
            ingest(source, file, json, &cfg)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", config::render_config(&cfg)?);
            }
        },

        #[cfg(feature = "sheets")]
        Command::Sheets { command } => match command {
            SheetsCommand::Connect => google_sheets::connect_interactive()?,
        },
    }

    Ok(())
}

/// Pair each source with the flag value, falling back to the config file.
fn collect_inputs(args: &RunArgs, cfg: &Config) -> Vec<SourceInput> {
    let ingest = &cfg.ingest;
    [
        (Source::Brokerage, args.brokerage.as_ref().or(ingest.brokerage_csv.as_ref())),
        (Source::MembershipCard, args.card.as_ref().or(ingest.card_csv.as_ref())),
        (Source::Bank, args.bank.as_ref().or(ingest.bank_csv.as_ref())),
    ]
    .into_iter()
    .filter_map(|(source, path)| path.map(|p| SourceInput::new(source, p.clone())))
    .collect()
}

fn run(args: RunArgs, mut cfg: Config) -> Result<()> {
    if let Some(threshold) = args.insurance_threshold {
        cfg.ingest.insurance_threshold = threshold;
    }
    let inputs = collect_inputs(&args, &cfg);
    if inputs.is_empty() {
        bail!("no exports given (pass --brokerage/--card/--bank or set them in config.toml)");
    }

    let output = run_pipeline(inputs, &cfg.ingest.settings())?;
    let records = if args.strict || cfg.pipeline.strict {
        output.ensure_complete()?
    } else {
        for failure in &output.failures {
            warn!("{failure}");
        }
        output.records
    };

    let target = args.target.unwrap_or(cfg.publish.target);
    let mut publisher: Box<dyn Publisher> = match target {
        PublishTarget::Csv => Box::new(CsvDirPublisher::new()),
        PublishTarget::Stdout => Box::new(stdout::StdoutPublisher::new(std::io::stdout().lock())),
        #[cfg(feature = "sheets")]
        PublishTarget::Sheets => Box::new(google_sheets::SheetsPublisher::connect()?),
        #[cfg(not(feature = "sheets"))]
        PublishTarget::Sheets => bail!("this build has no Google Sheets support (rebuild with --features sheets)"),
    };

    let destination = match target {
        PublishTarget::Csv => args
            .out
            .unwrap_or(cfg.publish.out_dir)
            .display()
            .to_string(),
        PublishTarget::Stdout => "stdout".to_string(),
        PublishTarget::Sheets => {
            let id = args.spreadsheet_id.unwrap_or(cfg.publish.spreadsheet_id);
            if id.is_empty() {
                bail!("target sheets needs --spreadsheet-id or publish.spreadsheet_id");
            }
            id
        }
    };

    let summary = publish_by_category(publisher.as_mut(), &destination, &records)
        .with_context(|| format!("publishing to {target}"))?;
    info!(
        records = records.len(),
        sheets = summary.sheets.len(),
        cells = summary.total_cells(),
        %destination,
        "run complete"
    );
    Ok(())
}

fn ingest(source: Option<Source>, file: PathBuf, json: bool, cfg: &Config) -> Result<()> {
    let source = match source {
        Some(s) => s,
        None => detect_source(&file).with_context(|| {
            format!("cannot tell the institution of {}; pass --source", file.display())
        })?,
    };

    let records = adapter_for(source, cfg.ingest.settings())
        .adapt(&file)
        .with_context(|| format!("adapting {} as {}", file.display(), source.name()))?;
    let records = sort_by_date(categorize(records)?);

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for c in &records {
            println!("{}", c.fields().join(","));
        }
    }
    Ok(())
}
