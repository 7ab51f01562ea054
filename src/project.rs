use miette::Diagnostic;
use std::{fmt, path::PathBuf, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum ProjectError {
    #[error("invalid project name '{name}': {reason}")]
    #[diagnostic(
        code(hatake::project::invalid_name),
        help("Use a single directory name without path separators, e.g. 'my-project'")
    )]
    InvalidName { name: String, reason: &'static str },

    #[error("invalid dependency '{spec}': {reason}")]
    #[diagnostic(
        code(hatake::project::invalid_dependency),
        help("Dependencies are written as name==version, e.g. 'pandas==2.2.0'")
    )]
    InvalidDependency { spec: String, reason: &'static str },
}

lazy_static::lazy_static! {
    static ref UNSAFE_NAME_CHARS: regex::Regex =
        regex::Regex::new(r#"[/\\:*?"<>|\x00-\x1f\x7f]"#).expect("a valid regex pattern");

    static ref DEPENDENCY_NAME: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9._-]*[A-Za-z0-9])?$").expect("a valid regex pattern");
}

/// A project name that is safe to use as a single directory component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);
impl ProjectName {
    pub fn parse(name: &str) -> Result<Self, ProjectError> {
        let invalid = |reason| ProjectError::InvalidName {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if name == "." || name == ".." {
            return Err(invalid("name refers to a relative directory"));
        }
        if name.trim() != name {
            return Err(invalid("name has leading or trailing whitespace"));
        }
        if UNSAFE_NAME_CHARS.is_match(name) {
            return Err(invalid(
                "name contains a path separator or a character that is not filesystem-safe",
            ));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pinned dependency, rendered as one `name==version` line of `requirements.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}
impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Package name compared the way pip does: case-insensitive, with `-`, `_` and `.` equal.
    pub fn normalized_name(&self) -> String {
        self.name
            .to_ascii_lowercase()
            .replace(['_', '.'], "-")
    }

    pub fn validate(&self) -> Result<(), ProjectError> {
        let invalid = |reason| ProjectError::InvalidDependency {
            spec: self.to_string(),
            reason,
        };

        if !DEPENDENCY_NAME.is_match(&self.name) {
            return Err(invalid("package name is empty or contains invalid characters"));
        }
        if self.version.is_empty() {
            return Err(invalid("version is empty"));
        }
        if self.version.chars().any(char::is_whitespace) {
            return Err(invalid("version contains whitespace"));
        }

        Ok(())
    }
}
impl FromStr for Dependency {
    type Err = ProjectError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let Some((name, version)) = spec.split_once("==") else {
            return Err(ProjectError::InvalidDependency {
                spec: spec.to_string(),
                reason: "expected the form name==version",
            });
        };

        let dependency = Dependency::new(name.trim(), version.trim());
        dependency.validate()?;

        Ok(dependency)
    }
}
impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.version)
    }
}

/// Everything needed to scaffold one project. Built once from user input and never mutated.
#[derive(Debug, Clone)]
pub struct ProjectSpec {
    pub name: String,
    pub target_dir: PathBuf,
    pub init_version_control: bool,
    pub dependencies: Vec<Dependency>,
    pub author: Option<String>,
}
impl ProjectSpec {
    pub fn new(name: impl Into<String>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            target_dir: target_dir.into(),
            init_version_control: false,
            dependencies: Vec::new(),
            author: None,
        }
    }

    pub fn with_version_control(mut self, enabled: bool) -> Self {
        self.init_version_control = enabled;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    /// The directory the project is scaffolded into: `target_dir/name`.
    pub fn root(&self) -> PathBuf {
        self.target_dir.join(&self.name)
    }
}
