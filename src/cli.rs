use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "photoverse", version, about = "Turn a photo into a poem")]
pub struct Cli {
    /// TOML configuration file. Missing settings use system defaults.
    #[arg(long, global = true, env = "PHOTOVERSE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Write a poem for an image.
    Compose {
        image: PathBuf,

        /// Add the result to the saved collection.
        #[arg(long)]
        save: bool,

        /// Write the poem to a text file in the export directory.
        #[arg(long)]
        export: bool,
    },

    /// Show the saved collection, newest first.
    List,

    /// Remove a saved poem.
    Delete { id: String },

    /// Export a saved poem as a text file.
    Export { id: String },
}
