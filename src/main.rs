//! # eposbridge CLI
//!
//! ## Usage
//!
//! ```bash
//! # Run the bridge server
//! eposbridge serve --listen 0.0.0.0:8089
//!
//! # Convert an ePOS-Print request to ESC/POS bytes and a preview
//! eposbridge render receipt.xml --bin receipt.bin --png receipt.png
//!
//! # Preview a captured ESC/POS stream
//! eposbridge render capture.bin --raw --png capture.png
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use eposbridge::{
    BridgeError, epos,
    hub::{DEFAULT_HISTORY_LIMIT, DEFAULT_SUBSCRIBER_BUFFER},
    preview,
    server::{self, ServerConfig},
    transport::TransportConfig,
};

/// eposbridge - ePOS-Print to ESC/POS bridge with live preview
#[derive(Parser, Debug)]
#[command(name = "eposbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP bridge
    Serve {
        /// Address to listen on
        #[arg(long, env = "EPOSBRIDGE_LISTEN", default_value = "0.0.0.0:8089")]
        listen: String,

        /// Previews kept per printer
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        history_limit: usize,

        /// Connect + write timeout for network printers, in seconds
        #[arg(long, default_value_t = 10)]
        network_timeout_secs: u64,

        /// Bulk write timeout for USB printers, in seconds
        #[arg(long, default_value_t = 5)]
        usb_timeout_secs: u64,

        /// Queued previews per live viewer before it is dropped
        #[arg(long, default_value_t = DEFAULT_SUBSCRIBER_BUFFER)]
        subscriber_buffer: usize,
    },

    /// Render a request offline
    Render {
        /// ePOS-Print XML file (or ESC/POS bytes with --raw)
        input: PathBuf,

        /// Treat the input as an ESC/POS stream and only preview it
        #[arg(long)]
        raw: bool,

        /// Write the encoded ESC/POS bytes here
        #[arg(long, value_name = "FILE")]
        bin: Option<PathBuf>,

        /// Write the preview PNG here
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eposbridge=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BridgeError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            history_limit,
            network_timeout_secs,
            usb_timeout_secs,
            subscriber_buffer,
        } => {
            if history_limit == 0 {
                return Err(BridgeError::Config(
                    "--history-limit must be at least 1".to_string(),
                ));
            }
            if subscriber_buffer == 0 {
                return Err(BridgeError::Config(
                    "--subscriber-buffer must be at least 1".to_string(),
                ));
            }

            let config = ServerConfig {
                listen_addr: listen,
                history_limit,
                subscriber_buffer,
                transport: TransportConfig {
                    network_timeout: Duration::from_secs(network_timeout_secs),
                    usb_timeout: Duration::from_secs(usb_timeout_secs),
                },
            };
            server::serve(config).await
        }

        Commands::Render {
            input,
            raw,
            bin,
            png,
        } => render(&input, raw, bin, png),
    }
}

fn render(
    input: &Path,
    raw: bool,
    bin: Option<PathBuf>,
    png: Option<PathBuf>,
) -> Result<(), BridgeError> {
    let bytes = if raw {
        if bin.is_some() {
            return Err(BridgeError::Config(
                "--bin is not available with --raw (input is already ESC/POS)".to_string(),
            ));
        }
        std::fs::read(input)?
    } else {
        let xml = std::fs::read_to_string(input)?;
        let program = epos::decode(&xml)?;
        println!("Decoded {} operations", program.len());
        program.to_bytes()
    };

    if let Some(path) = &bin {
        std::fs::write(path, &bytes)?;
        println!("Wrote {} bytes to {}", bytes.len(), path.display());
    }

    if let Some(path) = &png {
        let rendered = preview::render_preview(&bytes)?;
        std::fs::write(path, &rendered.png)?;
        println!(
            "Saved {}x{} preview to {}",
            rendered.width,
            rendered.height,
            path.display()
        );
    }

    if bin.is_none() && png.is_none() {
        println!("{} bytes (use --bin or --png to save output)", bytes.len());
    }

    Ok(())
}
