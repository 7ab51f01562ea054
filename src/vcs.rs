use git2::{Repository, Signature};
use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum VersionControlError {
    #[error("unable to initialize a git repository at '{path}': {source}")]
    #[diagnostic(code(hatake::vcs::init))]
    Init {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("unable to stage '{path}': {source}")]
    #[diagnostic(code(hatake::vcs::stage))]
    Stage {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("unable to build a commit signature: {source}")]
    #[diagnostic(
        code(hatake::vcs::signature),
        help("Set user.name and user.email in your git config, or [git] name/email in the config file")
    )]
    Signature {
        #[source]
        source: git2::Error,
    },

    #[error("unable to create the initial commit: {source}")]
    #[diagnostic(code(hatake::vcs::commit))]
    Commit {
        #[source]
        source: git2::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    pub commit_message: String,
    /// Used only when the git configuration has no `user.name` / `user.email`.
    pub name: String,
    pub email: String,
}
impl Default for GitSettings {
    fn default() -> Self {
        Self {
            commit_message: "Initial commit".to_string(),
            name: "hatake".to_string(),
            email: "hatake@localhost".to_string(),
        }
    }
}

/// Initializes (or reopens) a repository at `root`, stages `files` and records one commit.
///
/// Paths matched by the project's `.gitignore` are skipped. When the repository already has a
/// `HEAD` the new commit is placed on top of it. Returns the id of the new commit.
pub fn init_and_commit(
    root: &Path,
    files: &[PathBuf],
    settings: &GitSettings,
) -> Result<String, VersionControlError> {
    let repo = Repository::init(root).map_err(|source| VersionControlError::Init {
        path: root.to_path_buf(),
        source,
    })?;

    log::debug!("initialized repository at {}", root.display());

    let mut index = repo.index().map_err(|source| VersionControlError::Stage {
        path: root.to_path_buf(),
        source,
    })?;

    for file in files {
        let relative = file.strip_prefix(root).unwrap_or(file);
        let stage_error = |source: git2::Error| VersionControlError::Stage {
            path: file.clone(),
            source,
        };

        if repo.is_path_ignored(relative).map_err(stage_error)? {
            log::debug!("skipping ignored path {}", relative.display());
            continue;
        }

        index.add_path(relative).map_err(stage_error)?;
    }

    index.write().map_err(|source| VersionControlError::Stage {
        path: root.to_path_buf(),
        source,
    })?;

    let tree = index
        .write_tree()
        .and_then(|tree_id| repo.find_tree(tree_id))
        .map_err(|source| VersionControlError::Commit { source })?;

    let signature = match repo.signature() {
        Ok(signature) => signature,
        Err(error) => {
            log::debug!("no git identity configured ({}), using fallback", error.message());
            Signature::now(&settings.name, &settings.email)
                .map_err(|source| VersionControlError::Signature { source })?
        }
    };

    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let commit = repo
        .commit(
            Some("HEAD"),
            &signature,
            &signature,
            &settings.commit_message,
            &tree,
            &parents,
        )
        .map_err(|source| VersionControlError::Commit { source })?;

    log::info!("created commit {}", commit);

    Ok(commit.to_string())
}
