//! Project materialization pipeline
//!
//! `Start -> Resolved -> Fetched -> Extracted -> Substituted -> Patched ->
//! ResourcesInstalled -> HooksRun -> Done`. Every stage may divert to a
//! single failure; nothing is retried. Preconditions that need no network
//! (destination, name, package manager) are checked before anything on disk
//! changes.

use crate::error::{CreateError, Result};
use crate::naming::validate_name;
use crate::product::ProductConfig;
use crate::report::{Notice, Reporter, Stage};
use crate::runtime::{hooks, Capabilities, Capability, PackageManager};
use crate::templates::{
    extract_template, install_static_resources, patch_manifests, resolve_destination,
    resolve_template, substitute_files, ArchiveFetcher, SubstitutionDictionary,
    TemplateReference, STRIP_COMPONENTS,
};
use chrono::Datelike;
use std::path::{Path, PathBuf};

/// Validated intent to create one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    /// Template as typed (`name`, `org/repo`, `org/repo#tag`)
    pub template: String,
    /// Destination as typed, used in next-step instructions
    pub dest: String,
    /// Absolute destination directory
    pub target: PathBuf,
    pub app_name: String,
    pub force: bool,
    /// The user confirmed overwriting an existing destination
    pub overwrite_confirmed: bool,
    pub install: bool,
    pub git: bool,
    pub verbose: bool,
    /// Value of `{{ now-year }}`
    pub year: i32,
}

impl ScaffoldRequest {
    /// Build a request, resolving `dest` against `cwd` and `process_dir`
    ///
    /// The application name defaults to the last component of `dest`.
    pub fn new(
        template: &str,
        dest: &str,
        name: Option<&str>,
        process_dir: &Path,
        cwd: Option<&Path>,
    ) -> Self {
        let app_name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => crate::templates::reference::default_app_name(dest),
        };
        Self {
            template: template.to_string(),
            dest: dest.to_string(),
            target: resolve_destination(process_dir, cwd, Path::new(dest)),
            app_name,
            force: false,
            overwrite_confirmed: false,
            install: true,
            git: true,
            verbose: false,
            year: chrono::Local::now().year(),
        }
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct ScaffoldOutcome {
    pub reference: TemplateReference,
    pub target: PathBuf,
    /// Files scanned for placeholders
    pub substituted_files: usize,
    pub resources_written: Vec<PathBuf>,
    pub next_steps: Vec<String>,
}

/// Checks that must pass before the destination is touched
pub fn preflight(request: &ScaffoldRequest, capabilities: &Capabilities) -> Result<Vec<Notice>> {
    if request.target.is_dir() {
        if !request.force {
            return Err(CreateError::DestinationExists(request.target.clone()));
        }
        if !request.overwrite_confirmed {
            return Err(CreateError::OverwriteDeclined(request.target.clone()));
        }
    }

    validate_name(&request.app_name).map_err(CreateError::InvalidName)?;

    let mut notices = Vec::new();
    if request.target.is_dir() {
        notices.push(Notice::info("Initializing project in the current directory!"));
    }
    if request.install && capabilities.package_manager_binary == Capability::Absent {
        return Err(CreateError::ToolNotFound(
            capabilities.package_manager.binary().to_string(),
        ));
    }
    Ok(notices)
}

/// Run the whole pipeline for one request
pub async fn create_project<C: ProductConfig, R: Reporter>(
    config: &C,
    fetcher: &ArchiveFetcher,
    capabilities: &Capabilities,
    request: &ScaffoldRequest,
    reporter: &mut R,
) -> Result<ScaffoldOutcome> {
    let emit = |reporter: &mut R, notices: Vec<Notice>| {
        for notice in notices {
            reporter.notice(notice);
        }
    };
    let package_manager: PackageManager = capabilities.package_manager;

    reporter.stage(Stage::Start);
    let notices = preflight(request, capabilities)?;
    emit(reporter, notices);

    let (reference, assumed) = resolve_template(&request.template, config.default_org());
    emit(reporter, assumed.into_iter().collect());
    reporter.stage(Stage::Resolved);

    let archive = fetcher.fetch(&reference).await?;
    reporter.stage(Stage::Fetched);

    let extracted = extract_template(&archive, &request.target, STRIP_COMPONENTS)?;
    drop(archive);
    reporter.stage(Stage::Extracted);

    let dict = SubstitutionDictionary::standard(package_manager, request.year, &request.app_name);
    let substituted_files = substitute_files(&extracted.eligible, &dict).await?;
    reporter.stage(Stage::Substituted);

    let notices = patch_manifests(&request.target, &request.app_name).await?;
    emit(reporter, notices);
    reporter.stage(Stage::Patched);

    let resources_written = install_static_resources(
        &request.target,
        &reference,
        config.resourceless_marker(),
        &config.static_resources(),
        request.force,
    )
    .await?;
    reporter.stage(Stage::ResourcesInstalled);

    if request.install {
        let notices = hooks::install(
            &request.target,
            package_manager,
            &capabilities.package_manager_binary,
        )
        .await?;
        emit(reporter, notices);
    }
    if request.git {
        let notices =
            hooks::init_git(&request.target, &capabilities.git, &config.git_identity()).await;
        emit(reporter, notices);
    }
    reporter.stage(Stage::HooksRun);

    let outcome = ScaffoldOutcome {
        reference,
        target: request.target.clone(),
        substituted_files,
        resources_written,
        next_steps: config.next_steps(&request.dest, package_manager),
    };
    reporter.stage(Stage::Done);

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capabilities(pm: Capability) -> Capabilities {
        Capabilities {
            package_manager: PackageManager::Npm,
            package_manager_binary: pm,
            git: Capability::Absent,
        }
    }

    #[test]
    fn test_request_defaults() {
        let request = ScaffoldRequest::new(
            "simple",
            "apps/my-app",
            None,
            Path::new("/work"),
            None,
        );
        assert_eq!(request.target, PathBuf::from("/work/apps/my-app"));
        assert_eq!(request.app_name, "my-app");
        assert!(request.install);
        assert!(request.git);
        assert!(!request.force);

        let named = ScaffoldRequest::new("simple", "x", Some("My App"), Path::new("/work"), None);
        assert_eq!(named.app_name, "My App");
    }

    #[test]
    fn test_preflight_rejects_existing_destination() {
        let dir = tempfile::TempDir::new().unwrap();
        let request = ScaffoldRequest::new("simple", ".", None, dir.path(), None);

        let err = preflight(&request, &capabilities(Capability::Absent)).unwrap_err();
        assert!(matches!(err, CreateError::DestinationExists(_)));

        let forced = ScaffoldRequest {
            force: true,
            ..request.clone()
        };
        let err = preflight(&forced, &capabilities(Capability::Absent)).unwrap_err();
        assert!(matches!(err, CreateError::OverwriteDeclined(_)));
    }

    #[test]
    fn test_preflight_confirmed_overwrite_passes() {
        let dir = tempfile::TempDir::new().unwrap();
        let request = ScaffoldRequest {
            force: true,
            overwrite_confirmed: true,
            install: false,
            ..ScaffoldRequest::new("simple", ".", Some("app"), dir.path(), None)
        };

        let notices = preflight(&request, &capabilities(Capability::Absent)).unwrap();
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn test_preflight_rejects_invalid_name() {
        let request = ScaffoldRequest::new(
            "simple",
            "new-app",
            Some(".bad"),
            Path::new("/nonexistent-root-for-tests"),
            None,
        );
        let err = preflight(&request, &capabilities(Capability::Absent)).unwrap_err();
        assert!(matches!(err, CreateError::InvalidName(_)));
    }

    #[test]
    fn test_preflight_requires_package_manager_only_for_install() {
        let request = ScaffoldRequest::new(
            "simple",
            "new-app",
            None,
            Path::new("/nonexistent-root-for-tests"),
            None,
        );
        let err = preflight(&request, &capabilities(Capability::Absent)).unwrap_err();
        assert!(matches!(err, CreateError::ToolNotFound(ref t) if t == "npm"));

        let no_install = ScaffoldRequest {
            install: false,
            ..request.clone()
        };
        assert!(preflight(&no_install, &capabilities(Capability::Absent)).is_ok());
        assert!(preflight(
            &request,
            &capabilities(Capability::ProbeFailed("boom".to_string()))
        )
        .is_ok());
    }
}
