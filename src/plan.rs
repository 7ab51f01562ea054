use crate::templates::{self, Renderer, TemplateError, ENV_STUB, GITIGNORE};
use crate::project::{Dependency, ProjectName};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directories every project starts with, relative to the project root.
pub const PROJECT_DIRECTORIES: [&str; 6] = [
    "data/raw",
    "data/processed",
    "notebooks",
    "src",
    "results/figures",
    "results/tables",
];

pub const GITKEEP: &str = ".gitkeep";

#[derive(Debug, Error, Diagnostic)]
pub enum PlanError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),

    #[error("project layout has a cycle:\n{cycle}")]
    #[diagnostic(code(hatake::plan::cycle))]
    Cycle { cycle: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEntry {
    Directory(PathBuf),
    File { path: PathBuf, contents: String },
}
impl PlanEntry {
    pub fn path(&self) -> &Path {
        match self {
            PlanEntry::Directory(path) => path,
            PlanEntry::File { path, .. } => path,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, PlanEntry::File { .. })
    }
}

/// Ordered, relative entries to create: directories first (parents before children), then files.
#[derive(Debug, Clone)]
pub struct DirectoryPlan {
    pub entries: Vec<PlanEntry>,
}
impl DirectoryPlan {
    pub fn build(
        name: &ProjectName,
        dependencies: &[Dependency],
        author: Option<&str>,
    ) -> Result<Self, PlanError> {
        let renderer = Renderer::new(name, author)?;

        let mut entries: Vec<PlanEntry> = Vec::new();

        for directory in PROJECT_DIRECTORIES {
            let path = PathBuf::from(directory);
            // intermediate directories such as `data` become entries of their own
            for ancestor in path.ancestors().collect::<Vec<_>>().into_iter().rev() {
                if ancestor.as_os_str().is_empty() {
                    continue;
                }
                let ancestor = PlanEntry::Directory(ancestor.to_path_buf());
                if !entries.contains(&ancestor) {
                    entries.push(ancestor);
                }
            }
        }

        let file = |path: &str, contents: String| PlanEntry::File {
            path: PathBuf::from(path),
            contents,
        };

        entries.push(file("README.md", renderer.readme()?));
        entries.push(file("requirements.txt", templates::requirements(dependencies)));
        entries.push(file(".gitignore", GITIGNORE.to_string()));
        entries.push(file(".env", ENV_STUB.to_string()));
        entries.push(file("src/__init__.py", renderer.package_init()?));

        let markers: Vec<PlanEntry> = entries
            .iter()
            .filter(|entry| !entry.is_file())
            .filter(|directory| {
                !entries
                    .iter()
                    .any(|other| other.path().parent() == Some(directory.path()))
            })
            .map(|directory| PlanEntry::File {
                path: directory.path().join(GITKEEP),
                contents: String::new(),
            })
            .collect();
        entries.extend(markers);

        Self::order(entries)
    }

    /// Sorts entries so that each parent directory precedes its contents, then moves all
    /// directories ahead of all files without disturbing their relative order.
    ///
    /// `build` already emits every parent before its contents, so for the fixed layout the sort
    /// only regroups entries level by level and `PlanError::Cycle` cannot occur. It stays as a
    /// guard on the invariant, not a requirement of the current layout.
    fn order(entries: Vec<PlanEntry>) -> Result<Self, PlanError> {
        let nodes: Vec<PathBuf> = entries.iter().map(|e| e.path().to_path_buf()).collect();
        let edges: Vec<(PathBuf, PathBuf)> = nodes
            .iter()
            .filter_map(|path| {
                let parent = path.parent()?;
                nodes
                    .iter()
                    .any(|node| node == parent)
                    .then(|| (parent.to_path_buf(), path.clone()))
            })
            .collect();

        let sorted = tampopo::sort_graph(&tampopo::Graph { nodes, edges }).map_err(|error| {
            let tampopo::errors::SortError::CycleDetected(edges) = error;
            PlanError::Cycle {
                cycle: edges
                    .iter()
                    .map(|(src, dest)| format!("  {} → {}", src.display(), dest.display()))
                    .collect::<Vec<_>>()
                    .join("\n"),
            }
        })?;

        let mut remaining = entries;
        let mut ordered: Vec<PlanEntry> = Vec::with_capacity(remaining.len());
        for path in sorted {
            if let Some(index) = remaining.iter().position(|entry| entry.path() == path) {
                ordered.push(remaining.swap_remove(index));
            }
        }

        let (directories, files): (Vec<_>, Vec<_>) =
            ordered.into_iter().partition(|entry| !entry.is_file());

        Ok(Self {
            entries: directories.into_iter().chain(files).collect(),
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_file())
            .map(PlanEntry::path)
    }

    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|entry| entry.is_file())
            .map(PlanEntry::path)
    }
}
