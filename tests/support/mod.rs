use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Isolated data and config directories for one test
pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.data_dir().join(format!("{slot}.json"))
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.config_path();
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_slot(&self, slot: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.slot_path(slot);
        fs::create_dir_all(self.data_dir())?;
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_slot(&self, slot: &str) -> Option<Value> {
        let raw = fs::read_to_string(self.slot_path(slot)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    /// `tick` pointed at this test's directories
    pub fn cmd(&self) -> Command {
        let mut cmd = tick_cmd();
        cmd.env("TICK_CONFIG", self.config_path())
            .env("TICK_DATA_DIR", self.data_dir());
        cmd
    }

    /// Run a command with `--json` and return the `data` payload
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .output()
            .expect("run tick");
        assert!(
            output.status.success(),
            "tick {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let envelope: Value = serde_json::from_slice(&output.stdout).expect("json envelope");
        assert_eq!(envelope["schema_version"], "tick.v1");
        assert_eq!(envelope["status"], "success");
        envelope["data"].clone()
    }
}

pub fn tick_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tick").expect("binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Task texts in stored order
pub fn texts(slot: &Value) -> Vec<String> {
    slot.as_array()
        .expect("slot array")
        .iter()
        .map(|task| task["text"].as_str().unwrap_or_default().to_string())
        .collect()
}
