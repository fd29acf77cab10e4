// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command-line presence tracker for ipTIME routers.
//!
//! Prints one JSON line per target per tick until interrupted, or logs
//! the reports with `--log-reports`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use iptime_tracker::{LogSink, PresenceReport, PresenceSink, Scanner, TrackerConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(name = "iptime-tracker", version, about)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Poll once, print the reports and exit.
    #[arg(long)]
    once: bool,

    /// Write reports to the log instead of stdout.
    #[arg(long)]
    log_reports: bool,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "iptime_tracker=info")]
    log_level: String,
}

fn print_report(report: &PresenceReport) {
    match serde_json::to_string(report) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::error!(error = %e, "cannot serialize report"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .init();

    let config = match TrackerConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let scanner = match Scanner::new(config) {
        Ok(scanner) => scanner,
        Err(e) => {
            tracing::error!(error = %e, "cannot start scanner");
            return ExitCode::FAILURE;
        }
    };

    if cli.once {
        for report in scanner.tick().await {
            if cli.log_reports {
                LogSink.see(&report);
            } else {
                print_report(&report);
            }
        }
        scanner.close().await;
        return ExitCode::SUCCESS;
    }

    let scanner = if cli.log_reports {
        scanner.with_sink(LogSink)
    } else {
        scanner.with_sink(print_report)
    };
    scanner
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "cannot listen for Ctrl-C");
            }
        })
        .await;

    ExitCode::SUCCESS
}
