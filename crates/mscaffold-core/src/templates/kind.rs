//! Named templates known to the scaffolder.
//!
//! Each [`TemplateKind`] resolves to a file name relative to the template
//! source and declares the context keys it needs.
//!
//! # Examples
//!
//! ```
//! use mscaffold_core::templates::TemplateKind;
//!
//! let kind = TemplateKind::DescriptorFragment;
//! assert_eq!(kind.file_name(), "widget.part.xml.tera");
//! assert_eq!(kind.to_string(), "descriptor_fragment");
//! ```

// Internal imports (std, crate)
use std::fmt;

/// Templates used by the widget and vhost generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// A `<widgets>` document holding only the new widget entry, merged into an existing descriptor
    DescriptorFragment,
    /// A complete descriptor file, written when none exists yet
    FullDescriptor,
    /// The widget block class
    BlockArtifact,
    /// The widget's display template
    TemplateArtifact,
    /// Apache virtual host
    ApacheVhost,
    /// nginx server block
    NginxVhost,
}

impl TemplateKind {
    /// Returns the template identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DescriptorFragment => "descriptor_fragment",
            Self::FullDescriptor => "full_descriptor",
            Self::BlockArtifact => "block_artifact",
            Self::TemplateArtifact => "template_artifact",
            Self::ApacheVhost => "apache_vhost",
            Self::NginxVhost => "nginx_vhost",
        }
    }

    /// Template file name, relative to the template directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::DescriptorFragment => "widget.part.xml.tera",
            Self::FullDescriptor => "widget.xml.tera",
            Self::BlockArtifact => "widget.block.php.tera",
            Self::TemplateArtifact => "widget.template.phtml.tera",
            Self::ApacheVhost => "vhost/apache.conf.tera",
            Self::NginxVhost => "vhost/nginx.conf.tera",
        }
    }

    /// Context keys that must be present before rendering
    pub fn required_context(&self) -> &'static [&'static str] {
        match self {
            Self::DescriptorFragment | Self::FullDescriptor => &[
                "widgetId",
                "widgetName",
                "moduleId",
                "blockType",
                "description",
                "widgetParameters",
            ],
            Self::BlockArtifact => &[
                "blockClass",
                "widgetTemplateFilename",
                "widgetName",
                "authorName",
                "authorEmail",
                "description",
            ],
            Self::TemplateArtifact => &["blockClass", "widgetName", "widgetId"],
            Self::ApacheVhost | Self::NginxVhost => {
                &["documentRoot", "websites", "serverAdmin", "devMode"]
            }
        }
    }

    /// Returns an iterator over all template kinds
    pub fn all() -> impl Iterator<Item = Self> {
        use TemplateKind::*;
        [
            DescriptorFragment,
            FullDescriptor,
            BlockArtifact,
            TemplateArtifact,
            ApacheVhost,
            NginxVhost,
        ]
        .iter()
        .copied()
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
