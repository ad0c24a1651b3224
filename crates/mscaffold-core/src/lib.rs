//! mscaffold Core Library
//!
//! This library scaffolds widgets into an existing shop application tree:
//! block classes, display templates and the module's widget descriptor. It
//! also renders webserver virtual hosts for the configured websites.

pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod parameters;
pub mod scaffold;
pub mod templates;
pub mod utils;
pub mod vhost;
pub mod widget;
pub mod xml;

pub use crate::{
    config::{Config, WebsiteConfig},
    context::{AuthorInfo, TemplateContext},
    descriptor::{CodePool, ScaffoldDescriptor, WidgetPaths},
    error::{Error, Result},
    parameters::{normalize_parameters, WidgetParameter, WidgetParameters},
    templates::{TemplateDir, TemplateKind, TemplateRenderer},
    vhost::{VhostGenerator, VhostOptions},
    widget::{ScaffoldEvent, ScaffoldState, WidgetRequest, WidgetScaffolder},
    xml::{ExtendMode, MergeReport},
};
