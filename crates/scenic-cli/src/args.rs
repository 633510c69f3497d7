//! Command-line argument definitions for the Scenic CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects the operation; configuration file
//! selection and logging verbosity apply to both.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Scenic layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Operation to run on the input scene
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rearrange a scene and write the optimized scene as JSON
    Optimize {
        /// Path to the input scene (JSON)
        input: String,

        /// Path to the output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Return the scene unchanged instead of running the simulation
        #[arg(long)]
        no_force_directed: bool,
    },

    /// Score a scene without changing it
    Validate {
        /// Path to the input scene (JSON)
        input: String,

        /// Path to the output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Command {
    /// Path of the scene file to read
    pub fn input(&self) -> &str {
        match self {
            Self::Optimize { input, .. } | Self::Validate { input, .. } => input,
        }
    }

    /// Path of the response file; `None` writes to stdout
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Optimize { output, .. } | Self::Validate { output, .. } => output.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_optimize_flags() {
        let args = Args::parse_from([
            "scenic",
            "optimize",
            "scene.json",
            "-o",
            "out.json",
            "--no-force-directed",
            "--log-level",
            "debug",
        ]);

        assert_eq!(args.log_level, "debug");
        assert_eq!(args.command.input(), "scene.json");
        assert_eq!(args.command.output(), Some("out.json"));
        assert!(matches!(
            args.command,
            Command::Optimize {
                no_force_directed: true,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_defaults() {
        let args = Args::parse_from(["scenic", "validate", "scene.json"]);

        assert_eq!(args.log_level, "info");
        assert!(args.config.is_none());
        assert_eq!(args.command.output(), None);
        assert!(matches!(args.command, Command::Validate { .. }));
    }
}
