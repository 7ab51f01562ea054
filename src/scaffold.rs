use crate::{
    errors::{FileOperation, IoError},
    plan::{DirectoryPlan, PlanEntry, PlanError},
    project::{ProjectError, ProjectName, ProjectSpec},
    vcs::{self, GitSettings, VersionControlError},
};
use miette::Diagnostic;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ScaffoldError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Invalid(#[from] ProjectError),

    #[error("'{path}' already exists and is not empty")]
    #[diagnostic(
        code(hatake::scaffold::already_exists),
        help("Pick another name or target directory, or pass --force to write into it anyway")
    )]
    AlreadyExists { path: PathBuf },

    #[error("permission denied: {0}")]
    #[diagnostic(
        code(hatake::scaffold::permission_denied),
        help("Choose a target directory you can write to")
    )]
    PermissionDenied(#[source] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Plan(#[from] PlanError),
}
impl ScaffoldError {
    fn io(operation: FileOperation, path: &Path, error: std::io::Error) -> Self {
        let error = IoError::new(operation, path.to_path_buf(), error);

        if error.is_permission_denied() {
            ScaffoldError::PermissionDenied(error)
        } else {
            ScaffoldError::Io(error)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    /// Write into a root that already has content.
    pub overwrite: bool,
    pub git: GitSettings,
}

/// Every path written by a scaffold, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedPaths(Vec<PathBuf>);
impl CreatedPaths {
    fn push(&mut self, path: PathBuf) {
        log::debug!("created {}", path.display());
        self.0.push(path);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.0.iter()
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.0.iter().any(|created| created == path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<PathBuf> {
        self.0
    }
}
impl<'a> IntoIterator for &'a CreatedPaths {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Outcome of the optional version-control step. A failure here never undoes the tree.
#[derive(Debug)]
pub enum VersionControl {
    Skipped,
    Committed { commit: String },
    Failed(VersionControlError),
}

#[derive(Debug)]
pub struct Scaffolded {
    pub root: PathBuf,
    pub created: CreatedPaths,
    pub version_control: VersionControl,
}

/// Scaffolds `spec` on disk.
///
/// Validation happens before anything is written, so an invalid name or dependency leaves the
/// filesystem untouched. Once writing starts, the first I/O failure aborts the run and whatever
/// was already created stays in place.
///
/// # Errors
///
/// Returns a [`ScaffoldError`] if:
///
/// - The project name or a dependency fails validation, or a package is pinned twice.
/// - The project root exists, is not empty and `options.overwrite` is not set.
/// - A directory or file cannot be created or written to.
///
/// Version-control failures are not errors; they are reported through
/// [`Scaffolded::version_control`].
pub fn create(spec: &ProjectSpec, options: &ScaffoldOptions) -> Result<Scaffolded, ScaffoldError> {
    let name = ProjectName::parse(&spec.name)?;

    let mut seen = HashSet::new();
    for dependency in &spec.dependencies {
        dependency.validate()?;

        if !seen.insert(dependency.normalized_name()) {
            return Err(ProjectError::InvalidDependency {
                spec: dependency.to_string(),
                reason: "package is pinned more than once",
            }
            .into());
        }
    }

    let plan = DirectoryPlan::build(&name, &spec.dependencies, spec.author.as_deref())?;

    let root = spec.target_dir.join(name.as_str());

    let root_existed = ensure_available(&root, options.overwrite)?;

    let mut created = CreatedPaths::default();

    if !root_existed {
        create_directory(&mut created, &root)?;
    }

    apply_plan(&plan, &root, &mut created)?;

    let version_control = if spec.init_version_control {
        let files: Vec<PathBuf> = plan.files().map(|file| root.join(file)).collect();

        match vcs::init_and_commit(&root, &files, &options.git) {
            Ok(commit) => VersionControl::Committed { commit },
            Err(error) => {
                log::warn!("version control step failed: {}", error);
                VersionControl::Failed(error)
            }
        }
    } else {
        VersionControl::Skipped
    };

    Ok(Scaffolded {
        root,
        created,
        version_control,
    })
}

/// Returns whether `root` already existed. An existing, empty directory is a valid target.
fn ensure_available(root: &Path, overwrite: bool) -> Result<bool, ScaffoldError> {
    if root.exists() && !root.is_dir() {
        return Err(ScaffoldError::AlreadyExists {
            path: root.to_path_buf(),
        });
    }

    let mut entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(error) => return Err(ScaffoldError::io(FileOperation::Read, root, error)),
    };

    if entries.next().is_some() {
        if !overwrite {
            return Err(ScaffoldError::AlreadyExists {
                path: root.to_path_buf(),
            });
        }
        log::warn!("writing into non-empty directory {}", root.display());
    }

    Ok(true)
}

/// Applies directory and file creation operations from a [`DirectoryPlan`].
fn apply_plan(
    plan: &DirectoryPlan,
    root: &Path,
    created: &mut CreatedPaths,
) -> Result<(), ScaffoldError> {
    for entry in &plan.entries {
        let final_path = root.join(entry.path());

        match entry {
            PlanEntry::Directory(_) => create_directory(created, &final_path)?,
            PlanEntry::File { contents, .. } => write_file(created, &final_path, contents)?,
        }
    }

    Ok(())
}

/// Creates `path` (and any missing parents). Directories that already exist are not recorded.
fn create_directory(created: &mut CreatedPaths, path: &Path) -> Result<(), ScaffoldError> {
    if path.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|error| ScaffoldError::io(FileOperation::Mkdir, path, error))?;

    created.push(path.to_path_buf());

    Ok(())
}

fn write_file(created: &mut CreatedPaths, path: &Path, contents: &str) -> Result<(), ScaffoldError> {
    fs::write(path, contents).map_err(|error| ScaffoldError::io(FileOperation::Write, path, error))?;

    created.push(path.to_path_buf());

    Ok(())
}
