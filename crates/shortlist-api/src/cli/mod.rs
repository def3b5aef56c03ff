//! CLI command definitions for the `shortlist` binary.
//!
//! Uses clap derive macros for argument parsing. Every command except
//! `serve` and `completions` talks to the store directly, without a server.

pub mod shortlist;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use shortlist_types::shortlist::DEFAULT_SESSION;

/// Build and browse AI-assisted vendor shortlists.
#[derive(Parser)]
#[command(name = "shortlist", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding `shortlists.db` and `config.toml`.
    #[arg(long, global = true, env = "SHORTLIST_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Emit log lines as JSON objects.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on [default: from config.toml, else 3000].
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to [default: from config.toml, else 127.0.0.1].
        #[arg(long)]
        host: Option<String>,
    },

    /// Build a shortlist from the terminal and save it.
    Build {
        /// What you are looking for, e.g. "CRM for a 20-person sales team".
        need: String,

        /// A requirement to score vendors against (repeatable).
        #[arg(short = 'r', long = "require")]
        requirements: Vec<String>,

        /// Requirement weight as `REQUIREMENT=N`, 1-10 (repeatable).
        #[arg(short, long = "weight", value_parser = parse_weight)]
        weights: Vec<(String, f64)>,

        /// Vendor to leave out of the results (repeatable).
        #[arg(short = 'x', long = "exclude")]
        excluded: Vec<String>,

        /// Session the shortlist is saved under.
        #[arg(long, default_value = DEFAULT_SESSION)]
        session: String,
    },

    /// Show a saved shortlist.
    Show {
        /// Shortlist id.
        id: String,

        /// Render the markdown report instead of the summary table.
        #[arg(long)]
        markdown: bool,

        /// Write the markdown report to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the most recent shortlists of a session.
    History {
        #[arg(long, default_value = DEFAULT_SESSION)]
        session: String,
    },

    /// Store and LLM health report.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Parse `REQUIREMENT=N`. The weight is range-checked by validation.
fn parse_weight(raw: &str) -> Result<(String, f64), String> {
    let (requirement, weight) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected REQUIREMENT=N, got '{raw}'"))?;
    let requirement = requirement.trim();
    if requirement.is_empty() {
        return Err(format!("missing requirement name in '{raw}'"));
    }
    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("weight must be a number, got '{}'", weight.trim()))?;
    Ok((requirement.to_string(), weight))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("Email sync=8"), Ok(("Email sync".to_string(), 8.0)));
        assert_eq!(parse_weight("a=b=3"), Ok(("a=b".to_string(), 3.0)));
        assert!(parse_weight("Email sync").is_err());
        assert!(parse_weight("=4").is_err());
        assert!(parse_weight("SSO=high").is_err());
    }

    #[test]
    fn test_build_arguments() {
        let cli = Cli::try_parse_from([
            "shortlist",
            "build",
            "CRM for a small team",
            "-r",
            "Email sync",
            "--require",
            "Reports",
            "-w",
            "Reports=9",
            "-x",
            "Pipedrive",
        ])
        .unwrap();

        match cli.command {
            Commands::Build {
                need,
                requirements,
                weights,
                excluded,
                session,
            } => {
                assert_eq!(need, "CRM for a small team");
                assert_eq!(requirements, vec!["Email sync", "Reports"]);
                assert_eq!(weights, vec![("Reports".to_string(), 9.0)]);
                assert_eq!(excluded, vec!["Pipedrive"]);
                assert_eq!(session, "default");
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["shortlist", "status", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Status));
    }
}
