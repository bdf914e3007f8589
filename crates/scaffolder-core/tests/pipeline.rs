//! End-to-end pipeline runs against a local template directory

use scaffolder_core::templates::TemplateChoice;
use scaffolder_core::{
    create_project, ArchiveFetcher, Capabilities, Capability, CreateError, GitIdentity,
    PackageManager, ProductConfig, RecordingReporter, ScaffoldOutcome, ScaffoldRequest, Stage,
    StaticResource,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Clone)]
struct FixtureProduct;

impl ProductConfig for FixtureProduct {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn display_name(&self) -> &'static str {
        "Fixture"
    }

    fn default_org(&self) -> &'static str {
        "fixtures"
    }

    fn default_archive_url(&self) -> &'static str {
        "https://archives.invalid"
    }

    fn archive_url_env(&self) -> &'static str {
        "FIXTURE_ARCHIVE_URL"
    }

    fn default_registry_url(&self) -> &'static str {
        "https://registry.invalid/repos"
    }

    fn registry_url_env(&self) -> &'static str {
        "FIXTURE_REGISTRY_URL"
    }

    fn cache_file_name(&self) -> &'static str {
        "fixture-templates.json"
    }

    fn fallback_templates(&self) -> Vec<TemplateChoice> {
        Vec::new()
    }

    fn resourceless_marker(&self) -> &'static str {
        "widget"
    }

    fn static_resources(&self) -> Vec<StaticResource> {
        vec![
            StaticResource {
                file_name: "template.html",
                contents: "<!DOCTYPE html>\n",
            },
            StaticResource {
                file_name: "sw.js",
                contents: "setupRouting();\n",
            },
        ]
    }

    fn git_identity(&self) -> GitIdentity {
        GitIdentity {
            name: "Fixture CLI",
            email: "fixture@users.noreply.invalid",
            commit_message: "initial commit",
        }
    }

    fn next_steps(&self, dest: &str, package_manager: PackageManager) -> Vec<String> {
        vec![
            format!("cd {}", dest),
            format!("{} dev", package_manager.run_prefix()),
        ]
    }

    fn cli_description(&self) -> &'static str {
        "Fixture scaffolder"
    }
}

const BROKEN_JSON_MANIFEST: &str = r#"{"name": "template", "short_name": "template"}"#;

/// Templates laid out as `<root>/fixtures/<repo>/...`
struct Fixture {
    templates: TempDir,
    work: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            templates: TempDir::new().unwrap(),
            work: TempDir::new().unwrap(),
        };

        fixture.write(
            "simple/template/package.json",
            r#"{"name": "template", "private": true, "scripts": {"dev": "preact watch"}}"#,
        );
        fixture.write(
            "simple/template/src/index.js",
            "// {{ name }} (c) {{now-year}}\n// run: {{ pkg-run }} dev\n",
        );
        fixture.write(
            "simple/template/src/manifest.json",
            r#"{"name": "template", "short_name": "template", "start_url": "/"}"#,
        );
        fixture.write("simple/template/src/assets/logo.png", "{{ name }}");
        fixture.write("simple/README.md", "Repository readme {{ name }}");

        fixture.write(
            "widget/template/package.json",
            r#"{"name": "template", "version": "0.0.0"}"#,
        );
        fixture.write("widget/template/src/index.js", "export default {};\n");

        fixture.write("bare/template/src/index.js", "// {{ name }}\n");

        fixture.write("broken/README.md", "no template here");

        fixture.write("broken-json/template/package.json", "{ not json");
        fixture.write("broken-json/template/src/manifest.json", BROKEN_JSON_MANIFEST);

        fixture
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.templates.path().join("fixtures").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn fetcher(&self) -> ArchiveFetcher {
        ArchiveFetcher::from_local(self.templates.path().to_path_buf(), "fixture")
    }

    fn request(&self, template: &str, dest: &str, name: Option<&str>) -> ScaffoldRequest {
        ScaffoldRequest {
            install: false,
            git: false,
            year: 2024,
            ..ScaffoldRequest::new(template, dest, name, self.work.path(), None)
        }
    }

    fn target(&self, dest: &str) -> PathBuf {
        self.work.path().join(dest)
    }

    async fn run(
        &self,
        request: &ScaffoldRequest,
    ) -> (Result<ScaffoldOutcome, CreateError>, RecordingReporter) {
        let mut reporter = RecordingReporter::default();
        let result = create_project(
            &FixtureProduct,
            &self.fetcher(),
            &capabilities(),
            request,
            &mut reporter,
        )
        .await;
        (result, reporter)
    }
}

fn capabilities() -> Capabilities {
    Capabilities {
        package_manager: PackageManager::Npm,
        package_manager_binary: Capability::Absent,
        git: Capability::Absent,
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_simple_template_with_spaced_name() {
    let fixture = Fixture::new();
    let request = fixture.request("simple", "My App", None);

    let (result, reporter) = fixture.run(&request).await;
    let outcome = result.unwrap();
    let target = fixture.target("My App");

    assert_eq!(outcome.target, target);
    assert_eq!(outcome.reference.to_string(), "fixtures/simple");
    assert_eq!(read_json(&target.join("package.json"))["name"], "my_app");

    let manifest = read_json(&target.join("src/manifest.json"));
    assert_eq!(manifest["name"], "My App");
    assert_eq!(manifest["short_name"], "My App");
    assert_eq!(manifest["start_url"], "/");

    assert_eq!(
        fs::read_to_string(target.join("src/index.js")).unwrap(),
        "// My App (c) 2024\n// run: npm run dev\n"
    );
    // Media files are copied verbatim
    assert_eq!(
        fs::read_to_string(target.join("src/assets/logo.png")).unwrap(),
        "{{ name }}"
    );
    // Nothing outside `template/` is extracted
    assert!(!target.join("README.md").exists());

    assert_eq!(
        fs::read_to_string(target.join("src/template.html")).unwrap(),
        "<!DOCTYPE html>\n"
    );
    assert!(target.join("src/sw.js").is_file());
    assert_eq!(outcome.resources_written.len(), 2);

    assert_eq!(outcome.next_steps, vec!["cd My App", "npm run dev"]);
    assert_eq!(
        reporter.stages,
        vec![
            Stage::Start,
            Stage::Resolved,
            Stage::Fetched,
            Stage::Extracted,
            Stage::Substituted,
            Stage::Patched,
            Stage::ResourcesInstalled,
            Stage::HooksRun,
            Stage::Done,
        ]
    );
    assert!(reporter
        .notices
        .iter()
        .any(|n| n.message == "Assuming you meant fixtures/simple..."));
    assert_eq!(reporter.warnings().count(), 0);
}

#[tokio::test]
async fn test_widget_template_gets_no_static_resources() {
    let fixture = Fixture::new();
    let request = fixture.request("fixtures/widget", "my-widget", None);

    let (result, reporter) = fixture.run(&request).await;
    let outcome = result.unwrap();
    let target = fixture.target("my-widget");

    assert!(outcome.resources_written.is_empty());
    assert!(!target.join("src/template.html").exists());
    assert!(!target.join("src/sw.js").exists());
    // No PWA manifest is fine
    assert_eq!(read_json(&target.join("package.json"))["name"], "my-widget");
    assert_eq!(reporter.warnings().count(), 0);
}

#[tokio::test]
async fn test_existing_destination_without_force_changes_nothing() {
    let fixture = Fixture::new();
    let target = fixture.target("taken");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("keep.txt"), "mine").unwrap();

    let request = fixture.request("simple", "taken", None);
    let (result, reporter) = fixture.run(&request).await;

    assert!(matches!(result, Err(CreateError::DestinationExists(ref p)) if p == &target));
    assert_eq!(reporter.stages, vec![Stage::Start]);
    assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "mine");
    assert!(!target.join("src").exists());
    assert!(!target.join("package.json").exists());
}

#[tokio::test]
async fn test_forced_overwrite_needs_confirmation() {
    let fixture = Fixture::new();
    let target = fixture.target("taken");
    fs::create_dir_all(&target).unwrap();

    let mut request = fixture.request("simple", "taken", None);
    request.force = true;
    let (result, _) = fixture.run(&request).await;
    assert!(matches!(result, Err(CreateError::OverwriteDeclined(_))));
    assert!(!target.join("src").exists());

    request.overwrite_confirmed = true;
    let (result, reporter) = fixture.run(&request).await;
    result.unwrap();
    assert!(target.join("src/index.js").is_file());
    assert!(reporter
        .notices
        .iter()
        .any(|n| n.message == "Initializing project in the current directory!"));
}

#[tokio::test]
async fn test_archive_without_template_directory() {
    let fixture = Fixture::new();
    let request = fixture.request("broken", "broken-app", None);

    let (result, reporter) = fixture.run(&request).await;

    match result {
        Err(CreateError::NoTemplateDirectory(reference)) => {
            assert_eq!(reference, "fixtures/broken")
        }
        other => panic!("expected NoTemplateDirectory, got {:?}", other.map(|o| o.target)),
    }
    assert!(!reporter.stages.contains(&Stage::Patched));
    assert!(!fixture.target("broken-app").join("package.json").exists());
}

#[tokio::test]
async fn test_invalid_package_json_stops_before_resources() {
    let fixture = Fixture::new();
    let request = fixture.request("broken-json", "json-app", None);

    let (result, reporter) = fixture.run(&request).await;

    assert!(matches!(
        result,
        Err(CreateError::ManifestParse { ref path, .. }) if path.ends_with("package.json")
    ));
    assert_eq!(reporter.stages.last(), Some(&Stage::Substituted));
    assert!(!reporter.stages.contains(&Stage::Patched));

    let target = fixture.target("json-app");
    assert_eq!(
        fs::read_to_string(target.join("src/manifest.json")).unwrap(),
        BROKEN_JSON_MANIFEST
    );
    assert!(!target.join("src/template.html").exists());
    assert!(!target.join("src/sw.js").exists());
}

#[tokio::test]
async fn test_unknown_repository_is_not_found() {
    let fixture = Fixture::new();
    let request = fixture.request("fixtures/missing", "missing-app", None);

    let (result, _) = fixture.run(&request).await;

    assert!(matches!(result, Err(CreateError::FetchNotFound(ref r)) if r == "fixtures/missing"));
    assert!(!fixture.target("missing-app").exists());
}

#[tokio::test]
async fn test_long_name_warns_about_short_name() {
    let fixture = Fixture::new();
    let request = fixture.request("simple", "long", Some("A Rather Long App Name"));

    let (result, reporter) = fixture.run(&request).await;
    result.unwrap();

    let target = fixture.target("long");
    assert_eq!(
        read_json(&target.join("package.json"))["name"],
        "a_rather_long_app_name"
    );
    assert_eq!(
        read_json(&target.join("src/manifest.json"))["short_name"],
        "A Rather Long App Name"
    );
    assert_eq!(
        reporter.warnings().collect::<Vec<_>>(),
        vec!["Your `short_name` should be fewer than 12 characters."]
    );
}

#[tokio::test]
async fn test_missing_package_json_is_a_warning() {
    let fixture = Fixture::new();
    let request = fixture.request("bare", "bare-app", None);

    let (result, reporter) = fixture.run(&request).await;
    result.unwrap();

    assert_eq!(
        fs::read_to_string(fixture.target("bare-app").join("src/index.js")).unwrap(),
        "// bare-app\n"
    );
    assert_eq!(
        reporter.warnings().collect::<Vec<_>>(),
        vec!["Could not locate `package.json` file!"]
    );
}

#[tokio::test]
async fn test_invalid_name_writes_nothing() {
    let fixture = Fixture::new();
    let request = fixture.request("simple", "fine-dir", Some(".hidden"));

    let (result, _) = fixture.run(&request).await;

    let Err(CreateError::InvalidName(violations)) = result else {
        panic!("expected an invalid name");
    };
    assert!(!violations.reasons.is_empty());
    assert!(!fixture.target("fine-dir").exists());
}

#[tokio::test]
async fn test_missing_package_manager_fails_before_extraction() {
    let fixture = Fixture::new();
    let request = ScaffoldRequest {
        install: true,
        ..fixture.request("simple", "needs-npm", None)
    };

    let (result, _) = fixture.run(&request).await;

    assert!(matches!(result, Err(CreateError::ToolNotFound(ref tool)) if tool == "npm"));
    assert!(!fixture.target("needs-npm").exists());
}
