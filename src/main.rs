//! mermaid-scene CLI entry point.
//!
//! Reads Mermaid text from a file or stdin and writes the scene as JSON.

use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mermaid_scene::syntax::types::Direction;
use mermaid_scene::{ConvertError, RenderConfig, convert_with_config};

/// Mermaid flowchart, sequence or ER text to a JSON drawing scene.
#[derive(Parser, Debug)]
#[command(
    name = "mermaid-scene",
    about = "Mermaid flowchart, sequence or ER text to a JSON drawing scene"
)]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<String>,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Override flowchart direction (TD, TB, BT, LR, RL)
    #[arg(short = 'd', long = "direction")]
    direction: Option<String>,

    /// Seed for element ids and rendering seeds
    #[arg(long = "seed", default_value = "1")]
    seed: u64,

    /// Pretty-print the JSON output
    #[arg(long = "pretty")]
    pretty: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read { path: String, source: io::Error },
    #[error("cannot read stdin: {0}")]
    Stdin(io::Error),
    #[error("cannot write '{path}': {source}")]
    Write { path: String, source: io::Error },
    #[error("cannot write stdout: {0}")]
    Stdout(io::Error),
    #[error("unknown direction '{0}'; use TD, TB, BT, LR or RL")]
    Direction(String),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("cannot serialize scene: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let direction_override = match cli.direction.as_deref() {
        None => None,
        Some(token) => Some(
            Direction::from_token(token).ok_or_else(|| CliError::Direction(token.to_string()))?,
        ),
    };
    let config = RenderConfig {
        direction_override,
        seed: cli.seed,
        ..RenderConfig::default()
    };

    // Read input from file or stdin
    let text = match cli.input {
        Some(ref path) => fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map_err(CliError::Stdin)?;
            buf
        }
    };

    let conversion = convert_with_config(&text, &config)?;
    info!(
        dialect = %conversion.diagram.dialect,
        elements = conversion.scene.elements.len(),
        "converted"
    );
    let json = if cli.pretty {
        serde_json::to_string_pretty(&conversion.scene)?
    } else {
        serde_json::to_string(&conversion.scene)?
    };

    // Write output to file or stdout
    match cli.output {
        Some(ref path) => fs::write(path, json).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        }),
        None => {
            let mut stdout = io::stdout();
            writeln!(stdout, "{json}")
                .and_then(|()| stdout.flush())
                .map_err(CliError::Stdout)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
