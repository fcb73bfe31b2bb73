mod cli;
use cli::{parse_cli_mode, run_export_mode, CliMode};
mod tui;
use tui::run_tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let cli_mode = match parse_cli_mode() {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("Usage: calpane [--export [YYYY-MM-DD]] [--output DIR]");
            return Ok(());
        }
    };

    match cli_mode {
        CliMode::Export { date, output } => run_export_mode(date, output).await?,
        CliMode::Default => run_tui().await?,
    }

    Ok(())
}

fn setup_logging() {
    let log_dir = dirs::config_dir()
        .map(|d| d.join("calpane"))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "calpane.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("calpane started");
}
