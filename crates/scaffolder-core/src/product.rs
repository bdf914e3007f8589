//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a product binary implements to point the
//! shared scaffolding pipeline at its own template organization, registry,
//! bundled resources and post-setup instructions.

use crate::runtime::PackageManager;
use crate::templates::registry::TemplateChoice;

/// A file bundled into the binary and copied into every generated `src/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticResource {
    /// File name inside the generated `src` directory
    pub file_name: &'static str,
    pub contents: &'static str,
}

/// Identity used for the initial commit of a new repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: &'static str,
    pub email: &'static str,
    pub commit_message: &'static str,
}

/// Configuration trait for different CLI products
///
/// Each product implements this trait to define:
/// - Product identity (name, display name)
/// - Where template archives and the template listing come from
/// - Files bundled into every generated project
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Organization assumed for bare template names
    fn default_org(&self) -> &'static str;

    /// Base URL archives are downloaded from (`<base>/<org>/<repo>/archive/<tag>.zip`)
    fn default_archive_url(&self) -> &'static str;

    /// Environment variable name for overriding the archive URL
    fn archive_url_env(&self) -> &'static str;

    /// URL returning the JSON list of official template repositories
    fn default_registry_url(&self) -> &'static str;

    /// Environment variable name for overriding the registry URL
    fn registry_url_env(&self) -> &'static str;

    /// File name of the template listing cache under `~/.cache`
    fn cache_file_name(&self) -> &'static str;

    /// Choices offered when neither the registry nor the cache is usable
    fn fallback_templates(&self) -> Vec<TemplateChoice>;

    /// Template references containing this marker get no static resources
    fn resourceless_marker(&self) -> &'static str;

    /// Files copied into `src/` of every generated project
    fn static_resources(&self) -> Vec<StaticResource>;

    fn git_identity(&self) -> GitIdentity;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dest: &str, package_manager: PackageManager) -> Vec<String>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Minimal product used by unit tests across the crate
    #[derive(Clone)]
    pub struct TestProduct;

    impl ProductConfig for TestProduct {
        fn name(&self) -> &'static str {
            "test"
        }

        fn display_name(&self) -> &'static str {
            "Test"
        }

        fn default_org(&self) -> &'static str {
            "default-org"
        }

        fn default_archive_url(&self) -> &'static str {
            "https://archives.invalid"
        }

        fn archive_url_env(&self) -> &'static str {
            "SCAFFOLDER_TEST_ARCHIVE_URL"
        }

        fn default_registry_url(&self) -> &'static str {
            "https://registry.invalid/repos"
        }

        fn registry_url_env(&self) -> &'static str {
            "SCAFFOLDER_TEST_REGISTRY_URL"
        }

        fn cache_file_name(&self) -> &'static str {
            "scaffolder-test-templates.json"
        }

        fn fallback_templates(&self) -> Vec<TemplateChoice> {
            vec![TemplateChoice::new(
                "default-org/simple",
                "simple",
                "A simple template",
            )]
        }

        fn resourceless_marker(&self) -> &'static str {
            "widget"
        }

        fn static_resources(&self) -> Vec<StaticResource> {
            vec![
                StaticResource {
                    file_name: "template.html",
                    contents: "<html></html>\n",
                },
                StaticResource {
                    file_name: "sw.js",
                    contents: "// service worker\n",
                },
            ]
        }

        fn git_identity(&self) -> GitIdentity {
            GitIdentity {
                name: "Test CLI",
                email: "test-cli@users.noreply.invalid",
                commit_message: "initial commit from Test CLI",
            }
        }

        fn next_steps(&self, dest: &str, package_manager: PackageManager) -> Vec<String> {
            vec![
                format!("cd {}", dest),
                format!("{} dev", package_manager.run_prefix()),
            ]
        }

        fn cli_description(&self) -> &'static str {
            "Test scaffolder"
        }
    }
}
