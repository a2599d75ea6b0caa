//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// termport - taxonomy translation export and import
#[derive(Parser, Debug)]
#[command(name = "termport")]
#[command(version, about, long_about = None)]
#[command(author = "Termport Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "termport.toml", env = "TERMPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TERMPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the translations of a vocabulary to a CSV file
    Export(commands::export::ExportArgs),

    /// Import translations from a CSV file
    Import(commands::import::ImportArgs),

    /// List vocabularies and languages
    Vocabularies(commands::vocabularies::VocabulariesArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from([
            "termport",
            "export",
            "--vocabulary",
            "tags",
            "--language",
            "fr",
        ]);
        assert_eq!(cli.config, "termport.toml");
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.vocabulary, "tags");
                assert_eq!(args.language, "fr");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_export_requires_language() {
        assert!(Cli::try_parse_from(["termport", "export", "--vocabulary", "tags"]).is_err());
    }

    #[test]
    fn test_cli_parse_import() {
        let cli = Cli::parse_from([
            "termport",
            "--config",
            "custom.toml",
            "import",
            "--file",
            "tags.csv",
            "--vocabulary",
            "tags",
            "--language",
            "fr",
            "--dry-run",
        ]);
        assert_eq!(cli.config, "custom.toml");
        match cli.command {
            Commands::Import(args) => {
                assert!(args.dry_run);
                assert!(!args.no_overwrite);
                assert_eq!(args.file, std::path::PathBuf::from("tags.csv"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["termport", "--log-level", "debug", "vocabularies"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Vocabularies(_)));
    }

    #[test]
    fn test_cli_parse_validate_config_and_init() {
        let cli = Cli::parse_from(["termport", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));

        let cli = Cli::parse_from(["termport", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
