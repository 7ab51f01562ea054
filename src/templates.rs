use crate::project::{Dependency, ProjectName};
use miette::Diagnostic;
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error("Error occurred attempting to initialize tera instance")]
    #[diagnostic(code(hatake::template::tera_instance_initialization))]
    TeraInstanceInitialization {
        #[source]
        source: tera::Error,
    },

    #[error("Error occurred attempting to render template '{template}'")]
    #[diagnostic(code(hatake::template::render))]
    Render {
        template: &'static str,
        #[source]
        source: tera::Error,
    },
}

pub const README_TEMPLATE: &str = "README.md";
pub const PACKAGE_INIT_TEMPLATE: &str = "__init__.py";

/// Rules for `.gitignore`. Data and results stay out of version control, their markers stay in.
pub const GITIGNORE: &str = include_str!("../templates/gitignore");

pub const ENV_STUB: &str = include_str!("../templates/env");

const README_SOURCE: &str = include_str!("../templates/README.md.tera");
const PACKAGE_INIT_SOURCE: &str = include_str!("../templates/__init__.py.tera");

/// Renders the text files of a new project.
pub struct Renderer {
    tera: Tera,
    context: Context,
}
impl Renderer {
    pub fn new(name: &ProjectName, author: Option<&str>) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            (README_TEMPLATE, README_SOURCE),
            (PACKAGE_INIT_TEMPLATE, PACKAGE_INIT_SOURCE),
        ])
        .map_err(|source| TemplateError::TeraInstanceInitialization { source })?;

        let mut context = Context::new();
        context.insert("name", name.as_str());
        // left undefined when absent so the template falls back to its placeholder
        if let Some(author) = author.filter(|author| !author.trim().is_empty()) {
            context.insert("author", author);
        }

        Ok(Self { tera, context })
    }

    pub fn readme(&self) -> Result<String, TemplateError> {
        self.render(README_TEMPLATE)
    }

    pub fn package_init(&self) -> Result<String, TemplateError> {
        self.render(PACKAGE_INIT_TEMPLATE)
    }

    fn render(&self, template: &'static str) -> Result<String, TemplateError> {
        self.tera
            .render(template, &self.context)
            .map_err(|source| TemplateError::Render { template, source })
    }
}

/// One `name==version` line per dependency, in order, with no blank lines.
pub fn requirements(dependencies: &[Dependency]) -> String {
    dependencies
        .iter()
        .map(|dependency| format!("{}\n", dependency))
        .collect()
}
