//! Webserver virtual host generation.
//!
//! The websites come from [`Config::websites`]; the generator only renders the
//! Apache or nginx template with them and does not check the result against
//! any webserver syntax.

use std::path::Path;

use serde::Serialize;

use crate::config::{Config, WebsiteConfig};
use crate::context::TemplateContext;
use crate::error::{Error, Result};
use crate::templates::{TemplateKind, TemplateRenderer};
use crate::utils::kebab_to_lower_camel_case;

/// Website code of the backend, dropped when other websites exist
pub const ADMIN_WEBSITE_CODE: &str = "admin";

/// Default value of `--server-admin`
pub const DEFAULT_SERVER_ADMIN: &str = "webmaster@localhost";

/// Command options that end up in the template context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VhostOptions {
    pub nginx: bool,
    pub dev_mode: bool,
    pub server_admin: String,
}

impl Default for VhostOptions {
    fn default() -> Self {
        Self {
            nginx: false,
            dev_mode: false,
            server_admin: DEFAULT_SERVER_ADMIN.to_string(),
        }
    }
}

impl VhostOptions {
    fn template_kind(&self) -> TemplateKind {
        if self.nginx {
            TemplateKind::NginxVhost
        } else {
            TemplateKind::ApacheVhost
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebsiteView<'a> {
    code: &'a str,
    base_url: &'a str,
    host_name: &'a str,
}

/// Websites to emit: the admin website is skipped when it comes first among several
fn served_websites(websites: &[WebsiteConfig]) -> &[WebsiteConfig] {
    match websites {
        [first, rest @ ..] if !rest.is_empty() && first.code == ADMIN_WEBSITE_CODE => rest,
        all => all,
    }
}

/// Renders virtual host configuration for the configured websites
#[derive(Debug, Clone)]
pub struct VhostGenerator<'a> {
    renderer: &'a TemplateRenderer,
}

impl<'a> VhostGenerator<'a> {
    pub fn new(renderer: &'a TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Build the template context; option names are exposed in camelCase
    pub fn context(
        &self,
        config: &Config,
        document_root: &Path,
        options: &VhostOptions,
    ) -> Result<TemplateContext> {
        let websites = served_websites(&config.websites);
        if websites.is_empty() {
            return Err(Error::config(
                "No websites configured; add a `websites` list to the configuration file",
            ));
        }

        let views = websites
            .iter()
            .map(|site| {
                let host_name = site.host_name().ok_or_else(|| {
                    Error::config(format!(
                        "Base URL of website '{}' has no host: {}",
                        site.code, site.base_url
                    ))
                })?;
                Ok(WebsiteView {
                    code: &site.code,
                    base_url: site.base_url.as_str(),
                    host_name,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let context = TemplateContext::builder()
            .insert(kebab_to_lower_camel_case("nginx"), &options.nginx)?
            .insert(kebab_to_lower_camel_case("dev-mode"), &options.dev_mode)?
            .insert(kebab_to_lower_camel_case("server-admin"), &options.server_admin)?
            .insert("documentRoot", &document_root.display().to_string())?
            .insert("websites", &views)?
            .build();
        Ok(context)
    }

    /// Render the Apache (default) or nginx configuration
    pub fn generate(
        &self,
        config: &Config,
        document_root: &Path,
        options: &VhostOptions,
    ) -> Result<String> {
        let context = self.context(config, document_root, options)?;
        let kind = options.template_kind();
        log::debug!("Generating {} for {}", kind, document_root.display());
        self.renderer.render(kind, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;

    fn website(code: &str, url: &str) -> WebsiteConfig {
        WebsiteConfig::new(code, Url::parse(url).unwrap())
    }

    fn config(websites: Vec<WebsiteConfig>) -> Config {
        Config {
            websites,
            ..Default::default()
        }
    }

    #[test]
    fn test_admin_skipped_only_when_first_of_many() {
        let admin = website("admin", "http://admin.test/");
        let base = website("base", "http://shop.test/");

        let sites = [admin.clone(), base.clone()];
        assert_eq!(served_websites(&sites), &[base.clone()]);

        let only_admin = [admin.clone()];
        assert_eq!(served_websites(&only_admin), &[admin.clone()]);

        let admin_last = [base.clone(), admin.clone()];
        assert_eq!(served_websites(&admin_last).len(), 2);
    }

    #[test]
    fn test_context_keys() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let generator = VhostGenerator::new(&renderer);
        let ctx = generator
            .context(
                &config(vec![website("base", "http://shop.test:8080/")]),
                Path::new("/var/www/shop"),
                &VhostOptions::default(),
            )
            .unwrap();

        assert_eq!(
            ctx.keys().collect::<Vec<_>>(),
            ["nginx", "devMode", "serverAdmin", "documentRoot", "websites"]
        );
        assert_eq!(ctx.get("serverAdmin"), Some(&json!("webmaster@localhost")));
        assert_eq!(
            ctx.get("websites"),
            Some(&json!([{ "code": "base", "baseUrl": "http://shop.test:8080/", "hostName": "shop.test" }]))
        );
    }

    #[test]
    fn test_generate_apache() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let out = VhostGenerator::new(&renderer)
            .generate(
                &config(vec![
                    website("admin", "http://admin.test/"),
                    website("base", "http://shop.test/"),
                    website("outlet", "http://outlet.test/"),
                ]),
                Path::new("/var/www/shop"),
                &VhostOptions {
                    dev_mode: true,
                    server_admin: "ops@shop.test".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(out.matches("<VirtualHost *:80>").count(), 2);
        assert!(out.contains("ServerName shop.test"));
        assert!(out.contains("ServerName outlet.test"));
        assert!(!out.contains("admin.test"));
        assert!(out.contains("ServerAdmin ops@shop.test"));
        assert!(out.contains("DocumentRoot \"/var/www/shop\""));
        assert!(out.contains("MAGE_IS_DEVELOPER_MODE"));
    }

    #[test]
    fn test_generate_nginx() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let out = VhostGenerator::new(&renderer)
            .generate(
                &config(vec![website("base", "http://shop.test/")]),
                Path::new("/var/www/shop"),
                &VhostOptions {
                    nginx: true,
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(out.contains("server_name shop.test;"));
        assert!(out.contains("root /var/www/shop;"));
        assert!(!out.contains("MAGE_IS_DEVELOPER_MODE"));
    }

    #[test]
    fn test_requires_websites() {
        let renderer = TemplateRenderer::builtin().unwrap();
        let result = VhostGenerator::new(&renderer).generate(
            &Config::default(),
            Path::new("/var/www"),
            &VhostOptions::default(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
