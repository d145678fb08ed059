//! CLI argument definitions using clap
//!
//! Commands:
//! - catalogdb init --config <path>
//! - catalogdb create --config <path>
//! - catalogdb update --config <path> --product <id>
//! - catalogdb show --config <path> --product <id> [--version <n>]
//! - catalogdb delete --config <path> --product <id>
//! - catalogdb restore --config <path> --product <id>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// catalogdb - versioned product catalog
#[derive(Parser, Debug)]
#[command(name = "catalogdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new catalog data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./catalogdb.json")]
        config: PathBuf,
    },

    /// Create a product from a JSON request on stdin
    Create {
        #[arg(long, default_value = "./catalogdb.json")]
        config: PathBuf,
    },

    /// Append a version to a product from a JSON request on stdin
    Update {
        #[arg(long, default_value = "./catalogdb.json")]
        config: PathBuf,

        /// Product id
        #[arg(long)]
        product: u64,
    },

    /// Print a product's history, or one version of it
    Show {
        #[arg(long, default_value = "./catalogdb.json")]
        config: PathBuf,

        #[arg(long)]
        product: u64,

        /// Version number (1-based)
        #[arg(long)]
        version: Option<u64>,
    },

    /// Flag a product as deleted
    Delete {
        #[arg(long, default_value = "./catalogdb.json")]
        config: PathBuf,

        #[arg(long)]
        product: u64,
    },

    /// Clear a product's deleted flag
    Restore {
        #[arg(long, default_value = "./catalogdb.json")]
        config: PathBuf,

        #[arg(long)]
        product: u64,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update() {
        let cli = Cli::try_parse_from(["catalogdb", "update", "--product", "7"]).unwrap();
        match cli.command {
            Command::Update { config, product } => {
                assert_eq!(product, 7);
                assert_eq!(config, PathBuf::from("./catalogdb.json"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_version() {
        let cli = Cli::try_parse_from(["catalogdb", "show", "--product", "3", "--version", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Show { product: 3, version: Some(2), .. }
        ));
    }

    #[test]
    fn test_update_requires_product() {
        assert!(Cli::try_parse_from(["catalogdb", "update"]).is_err());
    }
}
