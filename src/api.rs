use crate::{
    config::{Config, ConfigError},
    errors::{FileOperation, IoError},
    plan::{DirectoryPlan, PlanError},
    preview::preview_as_tree,
    project::{Dependency, ProjectError, ProjectName, ProjectSpec},
    prompt::{self, PromptError},
    scaffold::{self, ScaffoldError, ScaffoldOptions, Scaffolded, VersionControl},
};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum HatakeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scaffold(#[from] ScaffoldError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),
}

/// What the user asked for. Missing values come from the config file, prompts or defaults.
#[derive(Debug, Clone, Default)]
pub struct ProjectRequest {
    pub name: Option<String>,
    /// Parent directory of the project, defaults to the current working directory.
    pub target_dir: Option<PathBuf>,
    pub dependencies: Vec<Dependency>,
    pub author: Option<String>,
    pub init_version_control: bool,
    pub overwrite: bool,
    /// Skip the preview and confirmation prompt.
    pub assume_yes: bool,
    pub config: Option<PathBuf>,
}

fn resolve(request: &ProjectRequest) -> Result<(ProjectSpec, ScaffoldOptions), HatakeError> {
    let config = Config::load(request.config.as_deref())?;

    let name = match &request.name {
        Some(name) => name.clone(),
        None => prompt::ask_project_name()?,
    };

    let target_dir = match &request.target_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|error| IoError::new(FileOperation::Read, PathBuf::from("."), error))?,
    };

    let dependencies = config.merged_dependencies(&request.dependencies)?;

    let author = request.author.clone().or_else(|| config.author.clone());

    let spec = ProjectSpec::new(name, target_dir)
        .with_version_control(request.init_version_control || config.git.init)
        .with_dependencies(dependencies)
        .with_author(author);

    log::debug!("resolved project spec: {:?}", spec);

    let options = ScaffoldOptions {
        overwrite: request.overwrite,
        git: config.git.settings,
    };

    Ok((spec, options))
}

fn build_plan(spec: &ProjectSpec) -> Result<DirectoryPlan, HatakeError> {
    let name = ProjectName::parse(&spec.name)?;

    Ok(DirectoryPlan::build(
        &name,
        &spec.dependencies,
        spec.author.as_deref(),
    )?)
}

/// Scaffolds a new project from `request`, printing each created path.
///
/// Unless `assume_yes` is set the planned tree is previewed and the user is asked to confirm;
/// declining returns `Ok(None)` without writing anything.
///
/// # Errors
///
/// Returns a [`HatakeError`] if:
///
/// - The config file cannot be read or parsed.
/// - The name or a dependency is invalid.
/// - User prompts fail or are not possible (e.g. no terminal).
/// - The project root already has content and `overwrite` is not set.
/// - A directory or file cannot be created or written to.
pub fn new_project(request: &ProjectRequest) -> Result<Option<Scaffolded>, HatakeError> {
    let (spec, options) = resolve(request)?;

    if !request.assume_yes {
        let plan = build_plan(&spec)?;

        preview_as_tree(&plan, &spec.root());

        if !prompt::confirm_changes()? {
            println!("{}", "cancelled, nothing was written".yellow());
            return Ok(None);
        }
    }

    let scaffolded = scaffold::create(&spec, &options)?;

    for path in &scaffolded.created {
        println!("{} {}", "create".green(), path.display());
    }

    match &scaffolded.version_control {
        VersionControl::Skipped => {}
        VersionControl::Committed { commit } => {
            let short = &commit[..commit.len().min(7)];
            println!("{} initial commit {}", "git".green(), short);
        }
        VersionControl::Failed(error) => {
            eprintln!(
                "{} project created but version control failed: {}",
                "warning".yellow(),
                error
            );
        }
    }

    Ok(Some(scaffolded))
}

/// Prints the tree `request` would create without touching the filesystem.
///
/// # Errors
///
/// Returns a [`HatakeError`] if the config cannot be loaded, the name or a dependency is
/// invalid, or prompting for a missing name fails.
pub fn preview_project(request: &ProjectRequest) -> Result<DirectoryPlan, HatakeError> {
    let (spec, _) = resolve(request)?;

    let plan = build_plan(&spec)?;

    preview_as_tree(&plan, &spec.root());

    Ok(plan)
}
