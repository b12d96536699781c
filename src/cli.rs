use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Order Wizard - order a home connectivity tariff from the terminal
#[derive(Parser, Debug)]
#[command(name = "order-wizard")]
#[command(about = "Step-by-step ordering of a home internet tariff at a trade point")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive order wizard (default)
    Run,
    /// Load the catalogs and print them normalized, as JSON
    Catalog {
        /// Exit with an error if any collection fell back
        #[arg(long)]
        strict: bool,
    },
    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        config: PathBuf,
    },
}

impl Cli {
    /// The subcommand to execute; `run` when none was given.
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_runs_wizard() {
        let cli = Cli::try_parse_from(["order-wizard"]).unwrap();
        assert_eq!(cli.command(), &Commands::Run);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["order-wizard", "catalog", "--config", "wizard.json"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("wizard.json")));
        assert_eq!(cli.command(), &Commands::Catalog { strict: false });
    }

    #[test]
    fn test_validate_requires_path() {
        assert!(Cli::try_parse_from(["order-wizard", "validate"]).is_err());
        let cli = Cli::try_parse_from(["order-wizard", "validate", "cfg.json"]).unwrap();
        assert_eq!(
            cli.command(),
            &Commands::Validate {
                config: PathBuf::from("cfg.json")
            }
        );
    }
}
