use clap::Parser;
use credit_gateway::application::service::CreditService;
use credit_gateway::config::ServicesConfig;
use credit_gateway::domain::ports::TransportBox;
use credit_gateway::infrastructure::in_memory::SimulatedGateway;
use credit_gateway::interfaces::batch::{error_row, prepare, process_row};
use credit_gateway::interfaces::csv::request_reader::RequestReader;
use credit_gateway::interfaces::csv::result_writer::ResultWriter;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SIMULATOR_KEY: &str = "skapi_sim_local";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input requests CSV file
    input: PathBuf,

    /// Gateway credentials as JSON. Defaults to simulator credentials.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print each request document instead of submitting it
    #[arg(long)]
    render: bool,

    /// Log filter, e.g. `debug` or `credit_gateway=trace`. Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level).into_diagnostic()?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ServicesConfig::from_json_file(path).into_diagnostic()?,
        None => ServicesConfig::with_secret_api_key(SIMULATOR_KEY),
    };

    let transport: TransportBox = Box::new(SimulatedGateway::new());
    let service = CreditService::new(config, transport).into_diagnostic()?;

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = RequestReader::new(file);
    let stdout = io::stdout();

    if cli.render {
        let mut out = stdout.lock();
        for (index, row) in reader.requests().enumerate() {
            let rendered = row
                .and_then(|row| prepare(&service, &row).and_then(|request| request.build()))
                .and_then(|request| service.render(&request, None));
            match rendered {
                Ok(document) => writeln!(out, "{document}").into_diagnostic()?,
                Err(e) => eprintln!("row {}: {e}", index + 1),
            }
        }
        return Ok(());
    }

    let mut writer = ResultWriter::new(stdout.lock());
    let mut processed = 0usize;
    for (index, row) in reader.requests().enumerate() {
        let row_number = index + 1;
        let result = match row {
            Ok(row) => process_row(&service, row_number, &row).await,
            Err(e) => error_row(row_number, String::new(), &e),
        };
        writer.write(&result).into_diagnostic()?;
        processed += 1;
    }
    writer.flush().into_diagnostic()?;

    info!(processed, "batch finished");
    Ok(())
}
