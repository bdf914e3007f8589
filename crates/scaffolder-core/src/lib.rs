//! Scaffolder Core - Shared library for project scaffolding CLIs
//!
//! This library turns a remote template repository into a ready-to-use
//! project directory. It is designed to be driven by product binaries that
//! share the same pipeline but differ in template organization, bundled
//! resources and instructions.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Name validation, template resolution, archive fetching,
//!   filtered extraction, placeholder substitution, manifest patching, tool probing
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and the `pipeline` that runs
//!   the stages in order and reports through a `Reporter`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use scaffolder_core::{pipeline, runtime, templates, RecordingReporter};
//!
//! let fetcher = templates::ArchiveFetcher::from_config(&MyConfig)?;
//! let capabilities = runtime::Capabilities::probe(runtime::PackageManager::from_env());
//! let request = pipeline::ScaffoldRequest::new("simple", "my-app", None, &cwd, None);
//! let mut reporter = RecordingReporter::default();
//! pipeline::create_project(&MyConfig, &fetcher, &capabilities, &request, &mut reporter).await?;
//! ```

pub mod config;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod product;
pub mod report;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::{CreateError, NameViolations};
pub use pipeline::{create_project, ScaffoldOutcome, ScaffoldRequest};
pub use product::{GitIdentity, ProductConfig, StaticResource};
pub use report::{Level, Notice, RecordingReporter, Reporter, Stage};
pub use runtime::{Capabilities, Capability, PackageManager};
pub use templates::{ArchiveFetcher, TemplateChoice, TemplateReference, TemplateRegistry};

#[cfg(feature = "tui")]
pub use tui::{list, run};
