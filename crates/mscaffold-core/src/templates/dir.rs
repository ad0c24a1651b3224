//! Resolution of user-supplied template directories

use std::io;
use std::path::{Path, PathBuf};

use super::TemplateKind;

/// Environment variable pointing at a template directory
pub const TEMPLATE_DIR_ENV: &str = "MSCAFFOLD_TEMPLATE_DIR";

/// A directory of template files overriding the built-in set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDir {
    path: PathBuf,
}

impl TemplateDir {
    /// Use an explicit directory, which must exist
    pub fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Template directory not found: {}", path.display()),
            ));
        }
        Ok(Self { path })
    }

    /// Find a template directory override.
    ///
    /// An explicit directory wins and must exist. Otherwise the
    /// `MSCAFFOLD_TEMPLATE_DIR` environment variable and `~/.mscaffold/templates`
    /// are checked; `None` means the built-in templates should be used.
    pub fn discover(custom_dir: Option<&Path>) -> io::Result<Option<Self>> {
        if let Some(dir) = custom_dir {
            return Self::new(dir).map(Some);
        }

        if let Ok(dir) = std::env::var(TEMPLATE_DIR_ENV) {
            let path = PathBuf::from(dir);
            if path.is_dir() {
                return Ok(Some(Self { path }));
            }
            log::warn!(
                "{} points to a missing directory: {}",
                TEMPLATE_DIR_ENV,
                path.display()
            );
        }

        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir.join(".mscaffold").join("templates");
            if path.is_dir() {
                return Ok(Some(Self { path }));
            }
        }

        Ok(None)
    }

    /// Path of a template file inside this directory
    pub fn template_path(&self, kind: TemplateKind) -> PathBuf {
        self.path.join(kind.file_name())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a displayable version of the directory path
    pub fn display(&self) -> std::path::Display<'_> {
        self.path.display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_dir_validation() {
        let temp_dir = tempdir().unwrap();
        let found = TemplateDir::discover(Some(temp_dir.path())).unwrap();
        assert_eq!(found.unwrap().path(), temp_dir.path());

        let result = TemplateDir::discover(Some(Path::new("/nonexistent/templates")));
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_template_path() {
        let temp_dir = tempdir().unwrap();
        let dir = TemplateDir::new(temp_dir.path()).unwrap();
        assert_eq!(
            dir.template_path(TemplateKind::ApacheVhost),
            temp_dir.path().join("vhost/apache.conf.tera")
        );
    }
}
