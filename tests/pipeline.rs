//! End-to-end pipeline tests over a scripted command runner.
//!
//! No real subprocesses run here: the fake runner fabricates the files the
//! external tools would produce, which lets the tests assert the full
//! artifact layout and the exact sequence of tool invocations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use wheelsmith::BuildError;
use wheelsmith::bundler::{
    BumpKind, CommandOutput, CommandRunner, CommandSpec, Error as StageError, Pipeline, Settings,
    SettingsBuilder,
};
use wheelsmith::cli::RuntimeConfig;

fn quiet() -> RuntimeConfig {
    RuntimeConfig::new(false, true)
}

/// Lays out a minimal project tree with an agreeing version marker.
fn scaffold_project(dir: &Path, manifest_version: &str, init_version: &str) {
    fs::write(
        dir.join("pyproject.toml"),
        format!(
            "[project]\nname = \"mcp-feedback-enhanced\"\nversion = \"{}\"\ndependencies = [\"a==1.0\", \"b==2.0\"]\n",
            manifest_version
        ),
    )
    .unwrap();

    let pkg = dir.join("src").join("mcp_feedback_enhanced");
    fs::create_dir_all(&pkg).unwrap();
    fs::write(
        pkg.join("__init__.py"),
        format!("__version__ = \"{}\"\n", init_version),
    )
    .unwrap();
}

/// Scripted [`CommandRunner`] that records every invocation and fabricates
/// the files the real tools would have produced.
struct FakeRunner {
    calls: Mutex<Vec<String>>,
    /// Wheel filename the fake build backend writes into `dist/`
    project_wheel: String,
    /// Package specs whose `pip download` exits non-zero
    fail_downloads: Vec<String>,
    /// Version the fake bump tool rewrites the version files to
    bump_to: Option<String>,
}

impl FakeRunner {
    fn new(project_wheel: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            project_wheel: project_wheel.to_string(),
            fail_downloads: Vec::new(),
            bump_to: None,
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn handle(&self, spec: &CommandSpec) -> CommandOutput {
        let line = spec.display();
        self.calls.lock().unwrap().push(line.clone());

        if line.contains("-m build --wheel") {
            let dist = spec.cwd().join("dist");
            fs::create_dir_all(&dist).unwrap();
            fs::write(dist.join(&self.project_wheel), b"wheel-bytes").unwrap();
        } else if line.contains("bump-my-version bump") {
            let to = self.bump_to.as_deref().expect("bump not scripted");
            scaffold_project(spec.cwd(), to, to);
        } else if line.contains("-m pip download") {
            let argv = spec.argv();
            let dest_idx = argv.iter().position(|a| a == "--dest").unwrap();
            let dest = PathBuf::from(&argv[dest_idx + 1]);
            let package = argv.last().unwrap().as_str();

            if self.fail_downloads.iter().any(|p| p == package) {
                return CommandOutput {
                    status: Some(1),
                    ..Default::default()
                };
            }

            fs::create_dir_all(&dest).unwrap();
            if package == "." {
                fs::write(dest.join(&self.project_wheel), b"x").unwrap();
                // A transitive download that collides with the direct "a"
                fs::write(dest.join("a-0.9-py3-none-any.whl"), b"x").unwrap();
            } else {
                let name = package.split("==").next().unwrap();
                let version = package.split("==").nth(1).unwrap_or("0.0");
                fs::write(
                    dest.join(format!("{}-{}-py3-none-any.whl", name, version)),
                    b"x",
                )
                .unwrap();
            }
        }

        CommandOutput {
            status: Some(0),
            ..Default::default()
        }
    }
}

impl CommandRunner for FakeRunner {
    async fn run_captured(
        &self,
        spec: &CommandSpec,
    ) -> wheelsmith::bundler::Result<CommandOutput> {
        Ok(self.handle(spec))
    }

    async fn run_streamed(
        &self,
        spec: &CommandSpec,
    ) -> wheelsmith::bundler::Result<CommandOutput> {
        Ok(self.handle(spec))
    }
}

fn settings(project: &Path, output: &Path, bump: Option<BumpKind>) -> Settings {
    SettingsBuilder::new()
        .project_dir(project)
        .output_dir(output)
        .include_deps(true)
        .bump(bump)
        .build()
        .unwrap()
}

fn archive_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn no_bump_run_produces_the_full_artifact_layout() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("proj");
    let output = dir.path().join("out");
    fs::create_dir_all(&project).unwrap();
    scaffold_project(&project, "1.0.0", "1.0.0");

    let runner = FakeRunner::new("mcp_feedback_enhanced-1.0.0-py3-none-any.whl");
    let pipeline = Pipeline::with_runner(settings(&project, &output, None), runner);
    pipeline.run(&quiet()).await.unwrap();

    assert!(
        output
            .join("mcp_feedback_enhanced-1.0.0-py3-none-any.whl")
            .exists()
    );
    assert!(output.join("mcp_feedback_enhanced-latest.whl").exists());

    let install = fs::read_to_string(output.join("install.sh")).unwrap();
    assert!(install.contains("mcp_feedback_enhanced-1.0.0-py3-none-any.whl"));
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(output.join("install.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o755, 0o755);
    }

    // One archive per normalized package name survives deduplication.
    let names = archive_names(&output.join("dependencies"));
    let a_archives = names.iter().filter(|n| n.starts_with("a-")).count();
    assert_eq!(a_archives, 1);
    assert!(names.iter().any(|n| n.starts_with("b-")));
    assert!(
        names
            .iter()
            .any(|n| n.starts_with("mcp_feedback_enhanced-"))
    );
}

#[tokio::test]
async fn download_targets_cover_the_project_and_each_dependency() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("proj");
    let output = dir.path().join("out");
    fs::create_dir_all(&project).unwrap();
    scaffold_project(&project, "1.0.0", "1.0.0");

    let runner = FakeRunner::new("mcp_feedback_enhanced-1.0.0-py3-none-any.whl");
    let pipeline = Pipeline::with_runner(settings(&project, &output, None), runner);
    pipeline.run(&quiet()).await.unwrap();

    let downloads: Vec<String> = pipeline
        .runner()
        .calls()
        .into_iter()
        .filter(|c| c.contains("-m pip download"))
        .collect();
    assert_eq!(downloads.len(), 3);
    assert!(downloads[0].ends_with(" ."));
    assert!(downloads[1].ends_with("a==1.0"));
    assert!(downloads[2].ends_with("b==2.0"));
}

#[tokio::test]
async fn bump_mode_aborts_on_inconsistency_before_invoking_the_bump_tool() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("proj");
    let output = dir.path().join("out");
    fs::create_dir_all(&project).unwrap();
    scaffold_project(&project, "1.0.0", "9.9.9");

    let runner = FakeRunner::new("unused.whl");
    let pipeline = Pipeline::with_runner(settings(&project, &output, Some(BumpKind::Patch)), runner);
    let err = pipeline.run(&quiet()).await.unwrap_err();

    assert!(matches!(
        err,
        BuildError::Stage(StageError::VersionMismatch { .. })
    ));
    assert!(
        pipeline
            .runner()
            .calls()
            .iter()
            .all(|c| !c.contains("bump-my-version"))
    );
    assert!(!output.exists());
}

#[tokio::test]
async fn no_bump_mode_builds_through_an_inconsistent_version_set() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("proj");
    let output = dir.path().join("out");
    fs::create_dir_all(&project).unwrap();
    scaffold_project(&project, "1.0.0", "9.9.9");

    let runner = FakeRunner::new("mcp_feedback_enhanced-1.0.0-py3-none-any.whl");
    let pipeline = Pipeline::with_runner(settings(&project, &output, None), runner);
    pipeline.run(&quiet()).await.unwrap();

    assert!(
        output
            .join("mcp_feedback_enhanced-1.0.0-py3-none-any.whl")
            .exists()
    );
}

#[tokio::test]
async fn bump_mode_rebuilds_against_the_new_version() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("proj");
    let output = dir.path().join("out");
    fs::create_dir_all(&project).unwrap();
    scaffold_project(&project, "1.0.0", "1.0.0");

    let mut runner = FakeRunner::new("mcp_feedback_enhanced-1.0.1-py3-none-any.whl");
    runner.bump_to = Some("1.0.1".to_string());
    let pipeline = Pipeline::with_runner(settings(&project, &output, Some(BumpKind::Patch)), runner);
    pipeline.run(&quiet()).await.unwrap();

    assert!(
        output
            .join("mcp_feedback_enhanced-1.0.1-py3-none-any.whl")
            .exists()
    );
    let install = fs::read_to_string(output.join("install.sh")).unwrap();
    assert!(install.contains("1.0.1"));
}

#[tokio::test]
async fn individual_download_failures_do_not_abort_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("proj");
    let output = dir.path().join("out");
    fs::create_dir_all(&project).unwrap();
    scaffold_project(&project, "1.0.0", "1.0.0");

    let mut runner = FakeRunner::new("mcp_feedback_enhanced-1.0.0-py3-none-any.whl");
    runner.fail_downloads = vec!["b==2.0".to_string()];
    let pipeline = Pipeline::with_runner(settings(&project, &output, None), runner);
    pipeline.run(&quiet()).await.unwrap();

    let names = archive_names(&output.join("dependencies"));
    assert!(names.iter().any(|n| n.starts_with("a-")));
    assert!(!names.iter().any(|n| n.starts_with("b-")));
}
