//! Integration tests for the s2e-project binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

const CGC_IMAGE: &str = "cgc_debian-9.2.1-i386";
const LINUX_IMAGE: &str = "debian-9.2.1-x86_64";

/// A throwaway S2E environment with two images and a CGC binary.
struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("install/share/decree-recipes")).unwrap();
        write_image(
            root,
            CGC_IMAGE,
            r#"{"os": {"name": "cgc", "arch": "i386", "binary_formats": ["decree"]}}"#,
        );
        write_image(
            root,
            LINUX_IMAGE,
            r#"{"os": {"name": "linux", "arch": "x86_64", "binary_formats": ["elf"]}}"#,
        );
        fs::write(root.join("CADET_00001"), b"\x7fCGC\x01\x01\x01\x43\x01\x4d").unwrap();
        fs::write(root.join("config.toml"), "").unwrap();

        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn target(&self) -> PathBuf {
        self.root().join("CADET_00001")
    }

    fn project(&self, name: &str) -> PathBuf {
        self.root().join("projects").join(name)
    }

    /// The binary, isolated from the caller's environment and config.
    fn cmd(&self) -> Command {
        let mut cmd = cargo::cargo_bin_cmd!("s2e-project");
        cmd.env_remove("S2EDIR")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(self.root().join("config.toml"))
            .arg("--env-dir")
            .arg(self.root());
        cmd
    }
}

fn write_image(env: &Path, name: &str, json: &str) {
    let dir = env.join("images").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("image.json"), json).unwrap();
}

// ── help / version ───────────────────────────────────────────────────────────

#[test]
fn help_flag() {
    cargo::cargo_bin_cmd!("s2e-project")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Create S2E analysis projects"))
        .stdout(predicate::str::contains("images"));
}

#[test]
fn version_flag() {
    cargo::cargo_bin_cmd!("s2e-project")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn new_command_help() {
    cargo::cargo_bin_cmd!("s2e-project")
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--image"))
        .stdout(predicate::str::contains("--no-seeds"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn missing_subcommand_is_usage_error() {
    cargo::cargo_bin_cmd!("s2e-project").assert().code(2);
}

// ── new ──────────────────────────────────────────────────────────────────────

#[cfg(unix)]
#[test]
fn new_creates_cgc_project() {
    let env = Env::new();

    env.cmd()
        .arg("new")
        .arg(env.target())
        .args(["--image", CGC_IMAGE, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project created at"))
        .stdout(predicate::str::contains("Seed Files"));

    let project = env.project("CADET_00001");
    assert!(project.join("bootstrap.sh").is_file());
    assert!(project.join("s2e-config.lua").is_file());
    assert!(project.join("seeds").is_dir());
    assert!(
        fs::symlink_metadata(project.join("recipes"))
            .unwrap()
            .file_type()
            .is_symlink()
    );
}

#[cfg(unix)]
#[test]
fn new_picks_compatible_image_by_default() {
    let env = Env::new();

    env.cmd()
        .args(["--output-format", "json", "new"])
        .arg(env.target())
        .args(["--name", "auto"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("\"image\": \"{CGC_IMAGE}\"")))
        .stdout(predicate::str::contains("\"created\": true"));

    assert!(env.project("auto").join("project.json").is_file());
}

#[test]
fn new_with_elf_image_fails_without_writing() {
    let env = Env::new();

    env.cmd()
        .arg("new")
        .arg(env.target())
        .args(["--image", LINUX_IMAGE, "--yes"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains(
            "Please use a CGC image for this binary",
        ));

    assert!(!env.root().join("projects").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let env = Env::new();

    env.cmd()
        .arg("new")
        .arg(env.target())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains(CGC_IMAGE));

    assert!(!env.root().join("projects").exists());
}

#[test]
fn no_seeds_is_overridden_with_warning() {
    let env = Env::new();

    env.cmd()
        .arg("new")
        .arg(env.target())
        .args(["--no-seeds", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ignoring --no-seeds"));
}

#[cfg(unix)]
#[test]
fn existing_project_requires_force() {
    let env = Env::new();
    let create = |extra: &[&str]| {
        let mut cmd = env.cmd();
        cmd.arg("new").arg(env.target()).arg("--yes").args(extra);
        cmd.assert()
    };

    create(&[]).success();
    create(&[])
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
    create(&["--force"]).success();
}

#[test]
fn missing_target_is_not_found() {
    let env = Env::new();

    env.cmd()
        .arg("new")
        .arg(env.root().join("nope"))
        .arg("--yes")
        .assert()
        .code(3);
}

#[test]
fn unknown_image_is_not_found() {
    let env = Env::new();

    env.cmd()
        .arg("new")
        .arg(env.target())
        .args(["--image", "windows-7sp1ent-x86_64", "--yes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("windows-7sp1ent-x86_64"));
}

#[test]
fn missing_environment_is_reported() {
    let env = Env::new();

    cargo::cargo_bin_cmd!("s2e-project")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(env.root().join("config.toml"))
        .arg("--env-dir")
        .arg(env.root().join("absent"))
        .arg("images")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("S2E environment not found"));
}

// ── images ───────────────────────────────────────────────────────────────────

#[test]
fn images_table_lists_both_images() {
    let env = Env::new();

    env.cmd()
        .arg("images")
        .assert()
        .success()
        .stdout(predicate::str::contains("IMAGE"))
        .stdout(predicate::str::contains(CGC_IMAGE))
        .stdout(predicate::str::contains(LINUX_IMAGE));
}

#[test]
fn images_json() {
    let env = Env::new();

    let output = env
        .cmd()
        .args(["images", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let images: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(images[0]["name"], CGC_IMAGE);
    assert_eq!(images[0]["os"]["binary_formats"], serde_json::json!(["decree"]));
    assert_eq!(images[1]["name"], LINUX_IMAGE);
}

#[test]
fn images_list_reads_s2edir() {
    let env = Env::new();

    cargo::cargo_bin_cmd!("s2e-project")
        .env("S2EDIR", env.root())
        .arg("--config")
        .arg(env.root().join("config.toml"))
        .args(["images", "--format", "list"])
        .assert()
        .success()
        .stdout(format!("{CGC_IMAGE}\n{LINUX_IMAGE}\n"));
}

// ── config / init / completions ──────────────────────────────────────────────

#[test]
fn init_then_config_get() {
    let env = Env::new();
    let config = env.root().join("fresh/config.toml");

    cargo::cargo_bin_cmd!("s2e-project")
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success();
    assert!(config.is_file());

    cargo::cargo_bin_cmd!("s2e-project")
        .env_remove("S2E_PROJECT__OUTPUT__FORMAT")
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "output.format"])
        .assert()
        .success()
        .stdout("auto\n");
}

#[test]
fn config_env_override() {
    let env = Env::new();

    env.cmd()
        .env("S2E_PROJECT__TEMPLATES__LOCAL_PATH", "/srv/templates")
        .args(["config", "get", "templates.local_path"])
        .assert()
        .success()
        .stdout("/srv/templates\n");
}

#[test]
fn config_unknown_key() {
    let env = Env::new();

    env.cmd()
        .args(["config", "get", "defaults.language"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn completions_bash() {
    cargo::cargo_bin_cmd!("s2e-project")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s2e-project"));
}
