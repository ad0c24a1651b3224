//! Template rendering for scaffolded artifacts

// Internal imports (std, crate)
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    context::TemplateContext,
    error::{Error, Result},
    xml::escape_attr,
};

use super::{TemplateDir, TemplateKind};

// External imports (alphabetized)
use once_cell::sync::Lazy;
use tera::Tera;

/// Templates compiled into the binary, keyed by their file name
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "widget.part.xml.tera",
        include_str!("../../templates/widget.part.xml.tera"),
    ),
    (
        "widget.xml.tera",
        include_str!("../../templates/widget.xml.tera"),
    ),
    (
        "widget.block.php.tera",
        include_str!("../../templates/widget.block.php.tera"),
    ),
    (
        "widget.template.phtml.tera",
        include_str!("../../templates/widget.template.phtml.tera"),
    ),
    (
        "vhost/apache.conf.tera",
        include_str!("../../templates/vhost/apache.conf.tera"),
    ),
    (
        "vhost/nginx.conf.tera",
        include_str!("../../templates/vhost/nginx.conf.tera"),
    ),
];

/// Suffixes of templates whose output is XML and must be escaped
const ESCAPED_SUFFIXES: &[&str] = &[".xml.tera"];

static BUILTIN: Lazy<std::result::Result<Tera, String>> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.autoescape_on(ESCAPED_SUFFIXES.to_vec());
    tera.set_escape_fn(escape_attr);
    tera.add_raw_templates(BUILTIN_TEMPLATES.iter().copied())
        .map_err(|e| e.to_string())?;
    Ok(tera)
});

/// Where the renderer's templates come from
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Builtin,
    Directory(TemplateDir),
}

/// Renders named templates against a [`TemplateContext`]
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    /// Cached Tera template engine instance
    tera: Arc<Tera>,
    source: TemplateSource,
}

impl TemplateRenderer {
    /// Create a renderer, using a template directory override when one is found
    pub fn new(template_dir: Option<PathBuf>) -> Result<Self> {
        match TemplateDir::discover(template_dir.as_deref())? {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }

    /// Renderer over the templates shipped with the binary
    pub fn builtin() -> Result<Self> {
        let tera = (*BUILTIN)
            .as_ref()
            .map_err(|e| Error::template(format!("Failed to parse built-in templates: {e}")))?
            .clone();
        Ok(Self {
            tera: Arc::new(tera),
            source: TemplateSource::Builtin,
        })
    }

    /// Renderer over every template file below `dir`
    pub fn from_dir(dir: TemplateDir) -> Result<Self> {
        let pattern = format!("{}/**/*", dir.path().display());
        log::debug!("Loading templates from {}", pattern);
        let mut tera = Tera::new(&pattern)?;
        tera.autoescape_on(ESCAPED_SUFFIXES.to_vec());
        tera.set_escape_fn(escape_attr);
        Ok(Self {
            tera: Arc::new(tera),
            source: TemplateSource::Directory(dir),
        })
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Check if a template exists
    pub fn has_template(&self, kind: TemplateKind) -> bool {
        self.tera.get_template(kind.file_name()).is_ok()
    }

    /// Path a template resolves to, for error reporting
    fn resolved_path(&self, kind: TemplateKind) -> PathBuf {
        match &self.source {
            TemplateSource::Builtin => PathBuf::from("<built-in>").join(kind.file_name()),
            TemplateSource::Directory(dir) => dir.template_path(kind),
        }
    }

    /// Render a template.
    ///
    /// Fails with [`Error::TemplateNotFound`] if the template does not exist in
    /// the source and with [`Error::UndefinedVariable`] if the context lacks a
    /// key the template uses.
    pub fn render(&self, kind: TemplateKind, context: &TemplateContext) -> Result<String> {
        let name = kind.file_name();
        if !self.has_template(kind) {
            return Err(Error::TemplateNotFound {
                name: name.to_string(),
                path: self.resolved_path(kind),
            });
        }

        Self::validate_context(name, context, kind.required_context())?;

        log::debug!("Rendering template: {}", name);
        self.tera
            .render(name, &context.to_tera())
            .map_err(|e| {
                log::error!("Template rendering failed for '{}': {}", name, e);
                log::error!(
                    "Available context keys: {:?}",
                    context.keys().collect::<Vec<_>>()
                );
                if let Some(detail) = undefined_variable(&e) {
                    Error::UndefinedVariable {
                        template: name.to_string(),
                        variables: detail,
                    }
                } else {
                    Error::Tera(e)
                }
            })
    }

    /// Validate that all required variables are present in the context
    fn validate_context(template: &str, context: &TemplateContext, required: &[&str]) -> Result<()> {
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|var| !context.contains_key(var))
            .collect();

        if !missing.is_empty() {
            return Err(Error::UndefinedVariable {
                template: template.to_string(),
                variables: missing.join(", "),
            });
        }
        Ok(())
    }
}

/// Find tera's "not found in context" message anywhere in the error chain
fn undefined_variable(error: &tera::Error) -> Option<String> {
    let mut current: Option<&dyn std::error::Error> = Some(error);
    while let Some(err) = current {
        let message = err.to_string();
        if message.contains("not found in context") {
            return Some(message);
        }
        current = err.source();
    }
    None
}
