//! `callvault`: decrypt, inspect and seal recording envelopes.
//!
//! Loads the configuration, initializes logging, then runs one command.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use callvault_cli::config::{CONFIG_ENV, CallvaultConfig, DEFAULT_CONFIG_PATH};
use callvault_cli::{commands, logging};

/// Decrypt and inspect hybrid-encrypted call recordings.
#[derive(Parser)]
#[command(name = "callvault", version, about, long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(short, long, env = CONFIG_ENV, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decrypt an envelope. Output is written only after the tag verifies.
    Decrypt {
        /// Stored envelope.
        input: PathBuf,

        /// Output file. Defaults to the decrypted directory from the config.
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write plaintext to stdout instead of a file.
        #[arg(long)]
        stdout: bool,

        /// Size recorded at upload; extra bytes are rejected.
        #[arg(long)]
        expected_size: Option<usize>,
    },

    /// Show the envelope structure without decrypting.
    Inspect {
        input: PathBuf,
    },

    /// Encrypt a file the way the recording client does.
    Seal {
        input: PathBuf,
        output: PathBuf,

        /// Public key PEM. Defaults to the configured path.
        #[arg(long)]
        public_key: Option<PathBuf>,
    },

    /// Print the fingerprint of the configured private key.
    Fingerprint,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = CallvaultConfig::load(&cli.config)?;
    logging::init(&config.logging);

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "callvault starting"
    );

    match cli.command {
        Command::Decrypt {
            input,
            output,
            stdout,
            expected_size,
        } => {
            let decryptor = commands::load_decryptor(&config)?;
            if stdout {
                let mut out = io::stdout().lock();
                commands::decrypt_to_writer(&decryptor, &input, expected_size, &mut out)?;
            } else {
                let path = commands::decrypt_to_file(
                    &config,
                    &decryptor,
                    &input,
                    output.as_deref(),
                    expected_size,
                )?;
                println!("{}", path.display());
            }
        }
        Command::Inspect { input } => {
            println!("{}", commands::inspect(&input)?);
        }
        Command::Seal {
            input,
            output,
            public_key,
        } => {
            let n = commands::seal(&config, &input, &output, public_key.as_deref())?;
            println!("{} ({n} bytes)", output.display());
        }
        Command::Fingerprint => {
            let decryptor = commands::load_decryptor(&config)?;
            println!("{}", commands::fingerprint(&decryptor));
        }
    }
    Ok(())
}
