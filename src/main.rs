use clap::Parser;
use quill::core::config::{self, CliOverrides};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "quill", about = "Terminal chat client with typewriter replies")]
struct Args {
    /// Backend base URL (e.g. http://127.0.0.1:8000)
    #[arg(short, long)]
    url: Option<String>,

    /// Endpoint path on the backend (e.g. /api/generate or /api/query)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Milliseconds per revealed character
    #[arg(short, long = "delay-ms")]
    delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to quill.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("quill.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().map_err(std::io::Error::other)?;
    let cli = CliOverrides {
        base_url: args.url,
        endpoint: args.endpoint,
        unit_delay_ms: args.delay_ms,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "Quill starting up: {}{} ({:?} per character)",
        resolved.base_url,
        resolved.endpoint,
        resolved.unit_delay
    );

    quill::tui::run(resolved)
}
