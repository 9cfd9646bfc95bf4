//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::ask::AskArgs;
use super::commands::chunks::ChunksArgs;

#[derive(Parser, Debug)]
#[command(name = "docrag")]
#[command(about = "docrag - Answer questions from your own documents", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (replaces .docrag/config.yaml and .docrag/local.yaml)
    #[arg(short, long, global = true, env = "DOCRAG_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer one or more questions from the corpus
    Ask(AskArgs),

    /// Chunk the corpus and show or save the chunks
    Chunks(ChunksArgs),

    /// List backend models and check the configured ones
    Models,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_global_flags() {
        let cli = Cli::try_parse_from([
            "docrag",
            "ask",
            "How do I turn it on?",
            "How long does the battery last?",
            "--show-sources",
            "--json",
            "--config",
            "rag.yaml",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("rag.yaml")));
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.questions.len(), 2);
                assert!(args.show_sources);
                assert!(!args.diagnostic);
            }
            other => panic!("Expected ask command, got {other:?}"),
        }
    }

    #[test]
    fn test_ask_requires_a_question() {
        assert!(Cli::try_parse_from(["docrag", "ask"]).is_err());
    }

    #[test]
    fn test_parse_chunks() {
        let cli = Cli::try_parse_from(["docrag", "chunks", "--limit", "5", "-o", "out.json"]).unwrap();
        match cli.command {
            Commands::Chunks(args) => {
                assert_eq!(args.limit, Some(5));
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
            }
            other => panic!("Expected chunks command, got {other:?}"),
        }
    }
}
