use std::{env, path::PathBuf};

use anyhow::Context;
use chrono::NaiveDate;

use calpane::{
    export::{write_csv, ExportFormat},
    remote::CalendarService,
    session::OAuthProvider,
    storage::config::Config,
    store::EventStore,
};

#[derive(Debug, Clone, PartialEq)]
pub enum CliMode {
    Default,
    Export {
        date: Option<String>,
        output: Option<PathBuf>,
    },
}

pub fn parse_cli_mode() -> Result<CliMode, String> {
    parse_args(env::args().skip(1))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliMode, String> {
    let mut export = false;
    let mut date = None;
    let mut output = None;
    let mut args = args.into_iter().peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--export" => {
                export = true;
                if let Some(next) = args.peek() {
                    if !next.starts_with("--") {
                        let date_str = args.next().expect("peeked value must exist");
                        NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                            .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD.", date_str))?;
                        date = Some(date_str);
                    }
                }
            }
            "--output" => {
                let dir = args
                    .next()
                    .ok_or_else(|| "--output requires a directory".to_string())?;
                output = Some(PathBuf::from(dir));
            }
            "--help" => {
                println!("Usage: calpane [--export [YYYY-MM-DD]] [--output DIR]");
                std::process::exit(0);
            }
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    if export {
        Ok(CliMode::Export { date, output })
    } else if output.is_some() {
        Err("--output only makes sense with --export".to_string())
    } else {
        Ok(CliMode::Default)
    }
}

/// One-shot headless export: fetch, optionally filter, write the CSV.
pub async fn run_export_mode(date: Option<String>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load_or_create().context("Failed to load config")?;
    let provider = OAuthProvider::new(config.google.clone());

    let session = match provider.resolve_session().await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Not signed in: {}", e);
            eprintln!("Start calpane without arguments and sign in first.");
            return Ok(());
        }
    };

    let service = CalendarService::new();
    let mut store = EventStore::new();

    match service.fetch_events(&session).await {
        Ok(items) => {
            store.apply_fetch(items);
        }
        Err(e) => {
            eprintln!("Failed to fetch events: {}", e);
            tracing::error!("Export fetch failed: {}", e);
            return Ok(());
        }
    }

    if let Some(date) = date {
        store.set_filter(&date);
    }

    let format = ExportFormat {
        date_format: config.ui.date_format.clone(),
        time_format: config.ui.time_format.clone(),
    };
    let directory = output.unwrap_or_else(|| config.export.directory.clone());

    match write_csv(store.filtered(), &directory, &format) {
        Ok(path) => {
            println!(
                "Exported {} events to {}",
                store.filtered().len(),
                path.display()
            );
        }
        Err(e) => {
            eprintln!("Export failed: {}", e);
            tracing::error!("Export write failed: {}", e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_is_the_default_mode() {
        assert_eq!(parse_args(args(&[])).unwrap(), CliMode::Default);
    }

    #[test]
    fn export_without_date_exports_everything() {
        assert_eq!(
            parse_args(args(&["--export"])).unwrap(),
            CliMode::Export {
                date: None,
                output: None
            }
        );
    }

    #[test]
    fn export_accepts_a_filter_date() {
        assert_eq!(
            parse_args(args(&["--export", "2024-05-01"])).unwrap(),
            CliMode::Export {
                date: Some("2024-05-01".to_string()),
                output: None
            }
        );
    }

    #[test]
    fn export_rejects_a_malformed_date() {
        assert!(parse_args(args(&["--export", "05/01/2024"])).is_err());
    }

    #[test]
    fn output_requires_export() {
        assert!(parse_args(args(&["--output", "/tmp"])).is_err());
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        assert!(parse_args(args(&["--bogus"])).is_err());
    }
}
