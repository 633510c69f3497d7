//! Locating and reading `config.toml` for the `scenic` binary.
//!
//! A file named with `--config` always wins and must exist. Otherwise a
//! `scenic/config.toml` under the working directory lets one project pin its
//! layout and scoring settings, and the per-user file in the platform config
//! directory (for example `~/.config/scenic/config.toml` on Linux) supplies
//! personal defaults. With neither present the built-in defaults are used.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use scenic::{ScenicError, config::AppConfig};

/// Project-relative location of the per-project settings
const PROJECT_CONFIG: &str = "scenic/config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("configuration file {0} does not exist")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for ScenicError {
    fn from(err: ConfigError) -> Self {
        ScenicError::Config(err.to_string())
    }
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    Explicit,
    Project,
    User,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Explicit => "--config",
            Self::Project => "project",
            Self::User => "user",
        };
        f.write_str(name)
    }
}

/// Loads the settings the optimizer should run with.
///
/// # Errors
///
/// Returns [`ScenicError::Config`] when `explicit_path` names a file that
/// does not exist, or when the chosen file is not a valid configuration.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ScenicError> {
    if let Some(path) = explicit_path {
        return read_config(path.as_ref(), ConfigSource::Explicit);
    }

    let user_config = ProjectDirs::from("com", "scenic", "scenic")
        .map(|dirs| dirs.config_dir().join("config.toml"));
    if user_config.is_none() {
        debug!("No platform config directory for this user");
    }

    match first_existing(Path::new(PROJECT_CONFIG), user_config.as_deref()) {
        Some((path, source)) => read_config(path, source),
        None => {
            debug!("No configuration file found, using built-in defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Picks the project file over the user file, skipping absent ones
fn first_existing<'a>(
    project: &'a Path,
    user: Option<&'a Path>,
) -> Option<(&'a Path, ConfigSource)> {
    [
        Some((project, ConfigSource::Project)),
        user.map(|path| (path, ConfigSource::User)),
    ]
    .into_iter()
    .flatten()
    .find(|(path, _)| path.is_file())
}

fn read_config(path: &Path, source: ConfigSource) -> Result<AppConfig, ScenicError> {
    if !path.is_file() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    info!(path = path.display().to_string(), source = source.to_string(); "Reading configuration");
    let text = fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|err| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_explicit_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[layout]\nmax_iterations = 42\n\n[scoring]\nalignment_tolerance = 2.5\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.layout().max_iterations(), 42);
        assert_eq!(config.scoring().alignment_tolerance(), 2.5);
        assert_eq!(config.layout().damping(), 0.5);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ScenicError::Config(message) if message.contains("does not exist")));
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout]\nmax_iterations = \"many\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ScenicError::Config(message) if message.contains("invalid configuration")));
    }

    #[test]
    fn test_project_file_shadows_user_file() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project.toml");
        let user = dir.path().join("user.toml");
        fs::write(&project, "").unwrap();
        fs::write(&user, "").unwrap();

        let (path, source) = first_existing(&project, Some(user.as_path())).unwrap();
        assert_eq!(path, project.as_path());
        assert_eq!(source, ConfigSource::Project);

        fs::remove_file(&project).unwrap();
        let (path, source) = first_existing(&project, Some(user.as_path())).unwrap();
        assert_eq!(path, user.as_path());
        assert_eq!(source, ConfigSource::User);

        fs::remove_file(&user).unwrap();
        assert!(first_existing(&project, Some(user.as_path())).is_none());
        assert!(first_existing(&project, None).is_none());
    }
}
