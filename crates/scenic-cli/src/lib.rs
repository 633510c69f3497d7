//! CLI logic for the Scenic layout tool.
//!
//! Reads a scene from a JSON file, runs the requested operation through the
//! JSON api of the `scenic` crate and writes the response.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{fs, io::Write};

use log::{info, warn};
use serde_json::Value;

use scenic::{SceneOptimizer, ScenicError, api};

/// Run the Scenic CLI application
///
/// Returns the `success` flag of the written response. A scene that fails
/// validation still produces a response, so it is reported through the flag
/// rather than as an error.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ScenicError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Input that is not JSON at all
pub fn run(args: &Args) -> Result<bool, ScenicError> {
    info!(
        input_path = args.command.input(),
        output_path = args.command.output().unwrap_or("-");
        "Processing scene"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let optimizer = SceneOptimizer::new(app_config);

    let source = fs::read_to_string(args.command.input())?;
    let scene: Value = serde_json::from_str(&source)?;

    let (response, success) = match &args.command {
        Command::Optimize {
            no_force_directed, ..
        } => {
            let response = api::optimize_layout(&optimizer, scene, !no_force_directed);
            if let Some(warning) = &response.warning {
                warn!(warning = warning.as_str(); "Optimization finished with a warning");
            }
            let success = response.success;
            (serde_json::to_string_pretty(&response)?, success)
        }
        Command::Validate { .. } => {
            let response = api::validate(&optimizer, scene);
            let success = response.success;
            (serde_json::to_string_pretty(&response)?, success)
        }
    };

    match args.command.output() {
        Some(path) => {
            fs::write(path, format!("{response}\n"))?;
            info!(output_file = path; "Response written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{response}")?;
        }
    }

    Ok(success)
}
