//! Command line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "boardsync")]
#[command(about = "Keeps the selected board and port in sync with the hardware that is plugged in")]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/boardsync/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// List serial ports, board ports first
    Ports {
        /// Also list ports that cannot carry a board
        #[arg(short, long)]
        all: bool,
    },
    /// Append configuration options to a FQBN
    Decorate {
        /// Fully qualified board name, e.g. arduino:avr:uno
        fqbn: String,
        /// Selected options as option=value pairs
        #[arg(value_name = "OPTION=VALUE")]
        options: Vec<String>,
        /// Skip FQBN validation
        #[arg(long)]
        no_validate: bool,
    },
    /// Select a board and optionally a port
    Select {
        /// Board name, e.g. "Arduino Uno"
        board: String,
        /// FQBN of the board, leave out for boards of uninstalled packages
        #[arg(short, long)]
        fqbn: Option<String>,
        /// Serial port address, e.g. /dev/ttyACM0 or COM3
        #[arg(short, long)]
        port: Option<String>,
    },
    /// Watch ports and print board events until interrupted
    Watch,
    /// Show the persisted selection state
    State,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
