//! Tool detection and post-scaffold hooks
//!
//! This module provides:
//! - Package manager selection and `$PATH` probing for external tools
//! - The install and git hooks run after the project files exist

pub mod check;
pub mod hooks;

pub use check::{Capabilities, Capability, PackageManager};
