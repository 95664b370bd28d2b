//! Common test utilities for charmbundle integration tests

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Bundle shipped under `tests/common/fixtures`
#[allow(dead_code)]
pub const OPENSTACK_OVN: &str = "openstack-ovn.yaml";

/// Overlay shipped under `tests/common/fixtures`
#[allow(dead_code)]
pub const HA_OVERLAY: &str = "ha-overlay.yaml";

/// Path to a fixture file
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("common")
        .join("fixtures")
        .join(name)
}

/// Command for the built binary, isolated from user configuration
#[allow(dead_code)]
pub fn charmbundle_cmd(workspace: &TestWorkspace) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_charmbundle"));
    cmd.current_dir(&workspace.path)
        .env_remove("CHARMBUNDLE_CONFIG")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", workspace.path.join(".config"))
        .env("HOME", &workspace.path)
        .env("NO_COLOR", "1");
    cmd
}

/// A scratch directory for integration tests
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Copy a fixture into the workspace under `target`
    #[allow(dead_code)]
    pub fn copy_fixture(&self, fixture_name: &str, target: &str) -> PathBuf {
        let content =
            std::fs::read_to_string(fixture_path(fixture_name)).expect("Failed to read fixture");
        self.write_file(target, &content)
    }
}
