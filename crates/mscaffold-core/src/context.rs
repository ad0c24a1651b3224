//! Template context construction.
//!
//! A [`TemplateContext`] is an insertion-ordered, read-only mapping from a
//! camelCase identifier to a JSON value. It is assembled once through
//! [`TemplateContextBuilder`] and then handed to the renderer.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::descriptor::ScaffoldDescriptor;
use crate::error::Result;
use crate::parameters::WidgetParameters;

/// Immutable template context
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    values: IndexMap<String, JsonValue>,
}

impl TemplateContext {
    pub fn builder() -> TemplateContextBuilder {
        TemplateContextBuilder::default()
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build the tera context used for rendering
    pub fn to_tera(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (k, v) in &self.values {
            context.insert(k, v);
        }
        context
    }
}

/// Accumulates values before freezing them into a [`TemplateContext`]
#[derive(Debug, Default)]
pub struct TemplateContextBuilder {
    values: IndexMap<String, JsonValue>,
}

impl TemplateContextBuilder {
    /// Insert any serializable value; a repeated key replaces the earlier value
    pub fn insert<T: Serialize + ?Sized>(mut self, key: impl Into<String>, value: &T) -> Result<Self> {
        self.values.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Insert an optional string, stored as `null` when absent
    pub fn insert_opt(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        let value = value.map_or(JsonValue::Null, |v| JsonValue::String(v.to_string()));
        self.values.insert(key.into(), value);
        self
    }

    pub fn build(self) -> TemplateContext {
        TemplateContext {
            values: self.values,
        }
    }
}

/// Free-form docblock options supplied alongside a widget
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorInfo {
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub description: Option<String>,
}

/// Assemble the context every widget template is rendered with
pub fn widget_context(
    descriptor: &ScaffoldDescriptor,
    parameters: &WidgetParameters,
    template_filename: &str,
    author: &AuthorInfo,
) -> Result<TemplateContext> {
    let context = TemplateContext::builder()
        .insert("vendorNamespace", descriptor.vendor_namespace())?
        .insert("moduleName", descriptor.module_name())?
        .insert("codePool", descriptor.code_pool().as_str())?
        .insert("moduleId", descriptor.module_id())?
        .insert("widgetId", descriptor.widget_id())?
        .insert("widgetName", descriptor.widget_name())?
        .insert("widgetParameters", parameters)?
        .insert("widgetTemplateFilename", template_filename)?
        .insert_opt("authorName", author.author_name.as_deref())
        .insert_opt("authorEmail", author.author_email.as_deref())
        .insert_opt("description", author.description.as_deref())
        .insert("blockClass", &descriptor.block_class())?
        .insert("blockType", &descriptor.block_type())?
        .build();
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CodePool;
    use crate::parameters::normalize_parameters;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_insertion_order() {
        let context = TemplateContext::builder()
            .insert("zeta", "z")
            .unwrap()
            .insert("alpha", &1)
            .unwrap()
            .insert_opt("missing", None)
            .build();

        assert_eq!(context.keys().collect::<Vec<_>>(), ["zeta", "alpha", "missing"]);
        assert_eq!(context.get("alpha"), Some(&json!(1)));
        assert_eq!(context.get("missing"), Some(&JsonValue::Null));
        assert!(!context.contains_key("other"));
    }

    #[test]
    fn test_widget_context() {
        let descriptor = ScaffoldDescriptor::new(
            "Acme",
            "Widgets",
            CodePool::Local,
            "acme_widgets",
            "featured_items",
            "Featured Items",
            "base",
            "default",
        );
        let parameters = normalize_parameters(["id=title,label=Title"]).unwrap();
        let author = AuthorInfo {
            author_name: Some("Jane".to_string()),
            ..Default::default()
        };

        let context = widget_context(&descriptor, &parameters, "/tmp/x.phtml", &author).unwrap();

        assert_eq!(context.get("blockClass"), Some(&json!("Acme_Widgets_Block_Widget_Featured_Items")));
        assert_eq!(context.get("authorName"), Some(&json!("Jane")));
        assert_eq!(context.get("authorEmail"), Some(&JsonValue::Null));
        assert_eq!(
            context.get("widgetParameters"),
            Some(&json!([{ "key": "title", "id": "title", "fields": { "id": "title", "label": "Title" } }]))
        );
        assert_eq!(context.keys().next(), Some("vendorNamespace"));
    }

    #[test]
    fn test_to_tera() {
        let context = TemplateContext::builder()
            .insert("name", "World")
            .unwrap()
            .build();
        let rendered = tera::Tera::one_off("Hello {{ name }}!", &context.to_tera(), false).unwrap();
        assert_eq!(rendered, "Hello World!");
    }
}
