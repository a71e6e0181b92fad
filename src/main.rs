use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod controller;
mod domain;
mod export;
mod format;
mod grid;
mod inference;
mod inputter;
mod model;
mod record;
mod ui;

use controller::Controller;
use domain::{DEFAULT_PAGE_SIZE, RosterError, ViewConfig};
use model::{Model, Status};
use record::{EMBEDDED_RECORDS, Record, load_records, parse_records};
use ui::TableUI;

/// Browse employee records in the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON file holding an array of records, the bundled sample is used if omitted
    #[arg(short, long)]
    data: Option<String>,

    /// Initial rows per page (5, 10, 15, 20 or 25)
    #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Directory CSV exports are written to
    #[arg(long, default_value = ".")]
    export_dir: String,

    /// Log file, filtered by RUST_LOG
    #[arg(long, default_value = "roster.log")]
    log_file: PathBuf,

    /// Write the CSV export and exit without starting the viewer
    #[arg(long)]
    export: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("Could not open log file {}: {e}", args.log_file.display());
        return ExitCode::FAILURE;
    }

    match run(args) {
        Err(e) => {
            error!("Exiting with error: {e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn init_logging(log_file: &Path) -> Result<(), RosterError> {
    let file = File::create(log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn expand(path: &str) -> Result<PathBuf, RosterError> {
    let expanded =
        shellexpand::full(path).map_err(|e| RosterError::InvalidPath(format!("{path}: {e}")))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

fn load(args: &Args) -> Result<(String, Vec<Record>), RosterError> {
    match &args.data {
        Some(data) => {
            let path = expand(data)?;
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| data.clone());
            Ok((name, load_records(&path)?))
        }
        None => Ok(("employees".to_string(), parse_records(EMBEDDED_RECORDS)?)),
    }
}

fn run(args: Args) -> Result<(), RosterError> {
    info!("Starting roster");
    let (name, records) = load(&args)?;
    let cfg = ViewConfig::default()
        .page_size(args.page_size)
        .export_dir(expand(&args.export_dir)?);

    if args.export {
        let model = Model::init(&cfg, name, records, 0, 0);
        let path = model.export()?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut terminal = ratatui::init();
    let result = execute!(stdout(), EnableMouseCapture)
        .map_err(RosterError::from)
        .and_then(|_| {
            let size = terminal.size()?;
            let mut model = Model::init(
                &cfg,
                name,
                records,
                size.width as usize,
                size.height as usize,
            );
            let mut ui = TableUI;
            let controller = Controller::new(&cfg);

            while model.status != Status::QUITTING {
                terminal.draw(|f| ui.draw(&model, f))?;
                let message = controller.handle_event(&model)?;
                model.update(message)?;
            }
            Ok(())
        });

    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}
