use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use typeahead::catalog::{Country, CountryCatalog, StaticCatalog, offline_countries};
use typeahead::config::AppConfig;
use typeahead::error::AppError;
use typeahead::logging;
use typeahead::runtime::Runtime;
use typeahead::terminal::Terminal;
use typeahead::widgets::Autocomplete;

const OFFLINE_LATENCY: Duration = Duration::from_millis(300);

/// Pick a country with a type-ahead search box.
#[derive(Debug, Parser)]
#[command(name = "typeahead", version)]
struct Args {
    /// YAML or JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Characters required before a lookup is issued.
    #[arg(long)]
    min_length: Option<usize>,

    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Prefix for the accessibility ids.
    #[arg(long)]
    id_prefix: Option<String>,

    /// Search the built-in country list instead of the REST endpoint.
    #[arg(long)]
    offline: bool,

    /// Append logs to this file (`RUST_LOG` sets the filter).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let config = load_config(&args)?;
    if let Some(path) = args.log_file.as_deref() {
        logging::init(path)?;
    }
    info!(
        min_query_length = config.widget.min_query_length,
        debounce_ms = config.widget.debounce_ms,
        offline = config.catalog.offline,
        "starting"
    );

    let widget_config = config.widget.clone();
    let widget: Autocomplete<Country> = if config.catalog.offline {
        let catalog = StaticCatalog::new(offline_countries()).with_latency(OFFLINE_LATENCY);
        Autocomplete::new(catalog, widget_config)
    } else {
        let catalog = CountryCatalog::new(config.catalog.base_url.clone(), config.catalog.timeout());
        Autocomplete::new(catalog, widget_config)
    };
    let widget = widget.with_on_select(|country| {
        info!(country = country.label.as_str(), "country selected");
    });

    let terminal = Terminal::new()?;
    let mut runtime = Runtime::new(widget, terminal).with_details(|country| country.value.describe());
    runtime.run()?;

    let widget = runtime.into_widget();
    if let Some(selection) = widget.selection() {
        println!("{}", selection.label);
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<AppConfig, AppError> {
    let mut config = match args.config.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(min_length) = args.min_length {
        config.widget.min_query_length = min_length;
    }
    if let Some(debounce_ms) = args.debounce_ms {
        config.widget.debounce_ms = debounce_ms;
    }
    if let Some(id_prefix) = args.id_prefix.as_ref() {
        config.widget.id_prefix = id_prefix.clone();
    }
    if args.offline {
        config.catalog.offline = true;
    }
    if config.widget.label.is_none() {
        config.widget.label = Some("Country".to_string());
    }
    if config.widget.placeholder.is_none() {
        config.widget.placeholder = Some("Start typing a country name".to_string());
    }

    config.validate()?;
    Ok(config)
}
