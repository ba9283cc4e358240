//! Checks that the configured provider credentials work, then exits.

use anyhow::Context;
use avatar_demo_core::config::{AvatarConfig, GenerationConfig};
use avatar_demo_probe::{CheckOutcome, run_probe};
use clap::Parser;
use std::process::ExitCode;
use tracing::Level;

/// Verify the avatar and generation provider credentials.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Only print the final verdict.
    #[arg(short, long)]
    quiet: bool,

    /// Emit provider call diagnostics on stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::ERROR })
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();
    let http = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    println!("Testing provider credentials...\n");
    let report = run_probe(&http, AvatarConfig::from_env(), GenerationConfig::from_env()).await;

    if !args.quiet {
        for (name, outcome) in report.checks() {
            match outcome {
                CheckOutcome::Pass(details) => {
                    println!("{}: WORKING", name);
                    for line in details {
                        println!("   {}", line);
                    }
                }
                CheckOutcome::Fail(message) => {
                    println!("{}: FAILED", name);
                    println!("   Error: {}", message);
                }
            }
        }
        println!("\n{}", "=".repeat(50));
    }
    println!("\n{}", report);

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
