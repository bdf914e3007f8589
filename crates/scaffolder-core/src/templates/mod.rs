//! Template resolution, fetching and materialization
//!
//! This module provides:
//! - Template references and destination resolution
//! - The official template listing and its cache
//! - Archive fetching from remote URLs or local directories
//! - Filtered extraction, placeholder substitution and manifest patching
//! - Installation of bundled static resources

pub mod copier;
pub mod extractor;
pub mod fetcher;
pub mod manifest;
pub mod reference;
pub mod registry;
pub mod substitution;

pub use copier::install_static_resources;
pub use extractor::{extract_template, ExtractedFileSet, STRIP_COMPONENTS};
pub use fetcher::{ArchiveFetcher, FetchError, TemplateArchive, TemplateSource};
pub use manifest::{patch_manifests, patch_package_json, patch_pwa_manifest};
pub use reference::{resolve_destination, resolve_template, TemplateReference};
pub use registry::{ChoiceListing, ChoiceSource, RepoListing, TemplateChoice, TemplateRegistry};
pub use substitution::{substitute_files, SubstitutionDictionary};
