mod complete;
mod config;

pub use complete::{CompletionOutcome, handle_complete};
pub use config::handle_config;

use crate::console::VerbosityLevel;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Increase verbosity (-v verbose, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode - only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose", global = true)]
    pub quiet: bool,

    /// Config file to use instead of ~/.config/textcomplete/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one completion cycle over TEXT and print the result
    Complete(CompleteArgs),
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CompleteArgs {
    /// Text to complete; markup when --rich is set
    pub text: String,

    /// Cursor byte offset (defaults to the end of the text)
    #[arg(long, conflicts_with = "rich")]
    pub cursor: Option<usize>,

    /// Candidate words, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub words: Vec<String>,

    /// Rows to move down from the first option before selecting
    #[arg(short, long, default_value_t = 0)]
    pub pick: usize,

    /// Treat TEXT as rich-text markup
    #[arg(long)]
    pub rich: bool,

    /// Text inserted in front of the selected word
    #[arg(long, default_value = "@")]
    pub prefix: String,

    /// How long to wait for the word source, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show,
    Path,
    Set { key: String, value: String },
}

impl Cli {
    pub fn get_verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else {
            match self.verbose {
                0 => VerbosityLevel::Normal,
                1 => VerbosityLevel::Verbose,
                _ => VerbosityLevel::Debug,
            }
        }
    }

    pub fn get_effective_verbosity(&self, config_verbosity: VerbosityLevel) -> VerbosityLevel {
        if self.quiet || self.verbose > 0 {
            // CLI verbosity specified, use it
            self.get_verbosity()
        } else {
            // No CLI verbosity specified, use config
            config_verbosity
        }
    }
}
