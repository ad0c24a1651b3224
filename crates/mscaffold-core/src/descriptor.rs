//! The logical scaffolding target of a widget and the paths derived from it.
//!
//! # Examples
//!
//! ```
//! use mscaffold_core::descriptor::{CodePool, ScaffoldDescriptor};
//!
//! let descriptor = ScaffoldDescriptor::new(
//!     "acme", "widgets", CodePool::Local, "acme_widgets",
//!     "featured_items", "Featured Items", "base", "default",
//! );
//! assert_eq!(descriptor.vendor_namespace(), "Acme");
//! assert_eq!(descriptor.block_class(), "Acme_Widgets_Block_Widget_Featured_Items");
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::utils::{ucfirst, uscore_to_camel_case, uscore_to_upper_uscore};

/// Source-tree partition a module lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodePool {
    Local,
    Community,
}

impl FromStr for CodePool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(CodePool::Local),
            "community" => Ok(CodePool::Community),
            _ => Err(Error::invalid_argument(format!(
                "Code pool must be \"community\" or \"local\", got \"{s}\""
            ))),
        }
    }
}

impl CodePool {
    /// Returns the directory name of the code pool
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Community => "community",
        }
    }
}

impl fmt::Display for CodePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything that identifies a widget to scaffold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldDescriptor {
    vendor_namespace: String,
    module_name: String,
    code_pool: CodePool,
    module_id: String,
    widget_id: String,
    widget_name: String,
    design_package: String,
    design_theme: String,
}

impl ScaffoldDescriptor {
    /// Vendor namespace and module name get their first letter upper-cased,
    /// everything else is kept verbatim.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vendor_namespace: impl AsRef<str>,
        module_name: impl AsRef<str>,
        code_pool: CodePool,
        module_id: impl Into<String>,
        widget_id: impl Into<String>,
        widget_name: impl Into<String>,
        design_package: impl Into<String>,
        design_theme: impl Into<String>,
    ) -> Self {
        Self {
            vendor_namespace: ucfirst(vendor_namespace.as_ref()),
            module_name: ucfirst(module_name.as_ref()),
            code_pool,
            module_id: module_id.into(),
            widget_id: widget_id.into(),
            widget_name: widget_name.into(),
            design_package: design_package.into(),
            design_theme: design_theme.into(),
        }
    }

    pub fn vendor_namespace(&self) -> &str {
        &self.vendor_namespace
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn code_pool(&self) -> CodePool {
        self.code_pool
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    pub fn widget_name(&self) -> &str {
        &self.widget_name
    }

    pub fn design_package(&self) -> &str {
        &self.design_package
    }

    pub fn design_theme(&self) -> &str {
        &self.design_theme
    }

    /// Fully-qualified block class name
    pub fn block_class(&self) -> String {
        format!(
            "{}_{}_Block_Widget_{}",
            self.vendor_namespace,
            self.module_name,
            uscore_to_upper_uscore(&self.widget_id)
        )
    }

    /// Block alias used in the descriptor's `type` attribute
    pub fn block_type(&self) -> String {
        format!("{}/widget_{}", self.module_id, self.widget_id)
    }

    /// Resolve the on-disk layout below an application root
    pub fn paths(&self, root: &Path) -> WidgetPaths {
        let module_dir = root
            .join("app")
            .join("code")
            .join(self.code_pool.as_str())
            .join(&self.vendor_namespace)
            .join(&self.module_name);
        let design_dir = root
            .join("app")
            .join("design")
            .join("frontend")
            .join(&self.design_package)
            .join(&self.design_theme);
        let block_dir = module_dir.join("Block").join("Widget");
        let template_dir = design_dir
            .join("template")
            .join(&self.module_id)
            .join("widget");
        WidgetPaths {
            block_file: block_dir.join(format!("{}.php", uscore_to_camel_case(&self.widget_id))),
            template_file: template_dir.join(format!("{}.phtml", self.widget_id)),
            descriptor_file: module_dir.join("etc").join("widget.xml"),
            module_dir,
            design_dir,
            block_dir,
            template_dir,
        }
    }
}

/// Files and directories touched when scaffolding one widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetPaths {
    pub module_dir: PathBuf,
    pub design_dir: PathBuf,
    pub block_dir: PathBuf,
    pub template_dir: PathBuf,
    pub block_file: PathBuf,
    pub template_file: PathBuf,
    pub descriptor_file: PathBuf,
}

impl WidgetPaths {
    /// Directory holding the widget descriptor
    pub fn etc_dir(&self) -> PathBuf {
        self.module_dir.join("etc")
    }

    /// Fail unless the module and design theme were created beforehand
    pub fn check_prerequisites(&self) -> Result<()> {
        if !self.module_dir.is_dir() {
            return Err(Error::MissingPrerequisite {
                what: "module",
                path: self.module_dir.clone(),
            });
        }
        if !self.design_dir.is_dir() {
            return Err(Error::MissingPrerequisite {
                what: "theme",
                path: self.design_dir.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn descriptor() -> ScaffoldDescriptor {
        ScaffoldDescriptor::new(
            "Acme",
            "Widgets",
            CodePool::Local,
            "acme_widgets",
            "featured_items",
            "Featured Items",
            "base",
            "default",
        )
    }

    #[test]
    fn test_code_pool_from_str() {
        assert_eq!("local".parse::<CodePool>().unwrap(), CodePool::Local);
        assert_eq!("community".parse::<CodePool>().unwrap(), CodePool::Community);

        let err = "core".parse::<CodePool>().unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("core"));
        // Case sensitive, like the directory names.
        assert!("Local".parse::<CodePool>().is_err());
    }

    #[test]
    fn test_derived_names() {
        let d = ScaffoldDescriptor::new(
            "acme",
            "widgets",
            CodePool::Community,
            "acme_widgets",
            "featured_items",
            "Featured Items",
            "base",
            "default",
        );
        assert_eq!(d.vendor_namespace(), "Acme");
        assert_eq!(d.module_name(), "Widgets");
        assert_eq!(d.block_class(), "Acme_Widgets_Block_Widget_Featured_Items");
        assert_eq!(d.block_type(), "acme_widgets/widget_featured_items");
    }

    #[test]
    fn test_paths() {
        let paths = descriptor().paths(Path::new("/srv/shop"));
        assert_eq!(
            paths.module_dir,
            PathBuf::from("/srv/shop/app/code/local/Acme/Widgets")
        );
        assert_eq!(
            paths.block_file,
            PathBuf::from("/srv/shop/app/code/local/Acme/Widgets/Block/Widget/FeaturedItems.php")
        );
        assert_eq!(
            paths.template_file,
            PathBuf::from(
                "/srv/shop/app/design/frontend/base/default/template/acme_widgets/widget/featured_items.phtml"
            )
        );
        assert_eq!(
            paths.descriptor_file,
            PathBuf::from("/srv/shop/app/code/local/Acme/Widgets/etc/widget.xml")
        );
    }

    #[test]
    fn test_check_prerequisites() {
        let root = tempfile::tempdir().unwrap();
        let paths = descriptor().paths(root.path());

        match paths.check_prerequisites() {
            Err(Error::MissingPrerequisite { what, path }) => {
                assert_eq!(what, "module");
                assert_eq!(path, paths.module_dir);
            }
            other => panic!("expected missing module, got {other:?}"),
        }

        fs::create_dir_all(&paths.module_dir).unwrap();
        assert!(matches!(
            paths.check_prerequisites(),
            Err(Error::MissingPrerequisite { what: "theme", .. })
        ));

        fs::create_dir_all(&paths.design_dir).unwrap();
        assert!(paths.check_prerequisites().is_ok());
    }
}
