//! Upgate CLI
//!
//! Sends update checks to an Upgate server and verifies response signatures
//! with the shared API secret.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use upgate_cli::check_cmd::{self, CheckRequest, DEFAULT_CHECK_URL};
use upgate_cli::verify_cmd;
use upgate_core::tracing_init::init_tracing;
use upgate_crypto::SigningKey;

#[derive(Parser, Debug)]
#[command(name = "upgate")]
#[command(version, about = "Upgate update-check client", long_about = None)]
struct Cli {
    /// Shared secret the server signs with.
    #[arg(long, env = "API_SECRET", hide_env_values = true, global = true)]
    api_secret: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask a server whether an app version must update.
    Check {
        /// Check endpoint URL.
        #[arg(long, default_value = DEFAULT_CHECK_URL, env = "UPGATE_URL")]
        url: String,

        /// Application identifier (package name or App Store id).
        #[arg(long)]
        app_id: String,

        /// Installed version.
        #[arg(long, default_value = "1.0.0")]
        current_version: String,

        /// Installed build number.
        #[arg(long)]
        build_number: Option<String>,
    },
    /// Verify a saved response read from a file or stdin.
    Verify {
        /// Response file; stdin when omitted.
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing("upgate_cli=warn", false);

    let secret = cli
        .api_secret
        .filter(|s| !s.is_empty())
        .context("API_SECRET is required to verify signatures")?;
    let key = SigningKey::from_secret_str(&secret)?;

    let valid = match cli.command {
        Command::Check {
            url,
            app_id,
            current_version,
            build_number,
        } => {
            let request = CheckRequest {
                app_id,
                current_version,
                build_number,
            };
            check_cmd::run(&url, request, &key).await?
        }
        Command::Verify { file } => verify_cmd::run(file.as_deref(), &key)?,
    };

    Ok(if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
