use crate::project::ProjectName;
use inquire::{validator::Validation, Confirm, CustomUserError, InquireError, Text};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum PromptError {
    #[error("Prompt for '{prompt}' failed: {source}")]
    #[diagnostic(
        code(hatake::prompt::inquire),
        help("Pass the value on the command line (and --yes) when not running in a terminal")
    )]
    Inquire {
        prompt: String,
        #[source]
        source: InquireError,
    },
}

/// Asks for a project name, re-prompting until it is filesystem-safe.
pub fn ask_project_name() -> Result<String, PromptError> {
    Text::new("Project name:")
        .with_help_message("Used as the directory name of the new project")
        .with_validator(|input: &str| -> Result<Validation, CustomUserError> {
            match ProjectName::parse(input) {
                Ok(_) => Ok(Validation::Valid),
                Err(error) => Ok(Validation::Invalid(error.to_string().into())),
            }
        })
        .prompt()
        .map_err(|error| PromptError::Inquire {
            prompt: "Project name".to_string(),
            source: error,
        })
}

/// Returns whether the user wants the previewed changes written to disk.
pub fn confirm_changes() -> Result<bool, PromptError> {
    Confirm::new("Create project?")
        .with_default(false)
        .with_help_message("Press [y] to confirm or [n] to cancel")
        .prompt()
        .map_err(|error| PromptError::Inquire {
            prompt: "Create project".to_string(),
            source: error,
        })
}
