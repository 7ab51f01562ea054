use crate::{
    errors::{FileFormat, FileOperation, IoError, ParseError},
    project::{Dependency, ProjectError},
    vcs::GitSettings,
};
use indexmap::IndexMap;
use miette::Diagnostic;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(hatake::config::io))]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dependency(#[from] ProjectError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub init: bool,
    #[serde(flatten)]
    pub settings: GitSettings,
}

/// Optional defaults read from a TOML file. Every key may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub author: Option<String>,
    pub dependencies: IndexMap<String, String>, // keeps file order for requirements.txt
    pub git: GitConfig,
}
impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let parsed: Config = toml::from_str(&content)
            .map_err(|error| ParseError::new(FileFormat::Toml, path.to_path_buf(), error))?;

        log::debug!("loaded config from {}", path.display());

        Ok(parsed)
    }

    /// Loads `path` when given, otherwise falls back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Config::from_file(path),
            None => Ok(Config::default()),
        }
    }

    /// Config dependencies followed by `overrides`. A name present in both keeps its config
    /// position and takes the override's version.
    pub fn merged_dependencies(
        &self,
        overrides: &[Dependency],
    ) -> Result<Vec<Dependency>, ConfigError> {
        let mut merged = self.dependencies.clone();

        for dependency in overrides {
            merged.insert(dependency.name.clone(), dependency.version.clone());
        }

        merged
            .into_iter()
            .map(|(name, version)| -> Result<Dependency, ConfigError> {
                let dependency = Dependency::new(name, version);
                dependency.validate()?;
                Ok(dependency)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            author = "Ada Lovelace"

            [dependencies]
            pandas = "2.2.0"
            numpy = "1.26.3"

            [git]
            init = true
            commit_message = "chore: scaffold"
            "#,
        )
        .unwrap();

        assert_eq!(config.author.as_deref(), Some("Ada Lovelace"));
        assert_eq!(
            config.dependencies.keys().collect::<Vec<_>>(),
            vec!["pandas", "numpy"]
        );
        assert!(config.git.init);
        assert_eq!(config.git.settings.commit_message, "chore: scaffold");
        assert_eq!(config.git.settings.name, GitSettings::default().name);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.author.is_none());
        assert!(config.dependencies.is_empty());
        assert!(!config.git.init);
        assert_eq!(config.git.settings.commit_message, "Initial commit");
    }

    #[test]
    fn overrides_keep_config_order() {
        let config: Config = toml::from_str(
            r#"
            [dependencies]
            pandas = "2.1.0"
            numpy = "1.26.3"
            "#,
        )
        .unwrap();

        let merged = config
            .merged_dependencies(&[
                Dependency::new("scikit-learn", "1.4.0"),
                Dependency::new("pandas", "2.2.0"),
            ])
            .unwrap();

        assert_eq!(
            merged,
            vec![
                Dependency::new("pandas", "2.2.0"),
                Dependency::new("numpy", "1.26.3"),
                Dependency::new("scikit-learn", "1.4.0"),
            ]
        );
    }

    #[test]
    fn rejects_empty_version_in_config() {
        let config: Config = toml::from_str("[dependencies]\npandas = \"\"\n").unwrap();

        assert!(matches!(
            config.merged_dependencies(&[]),
            Err(ConfigError::Dependency(ProjectError::InvalidDependency { .. }))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();

        let result = Config::load(Some(tmp.path().join("missing.toml").as_path()));

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
