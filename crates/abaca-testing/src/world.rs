//! TestWorld pattern for declarative CLI test setup.
//!
//! Each world owns a temp directory holding a `data/` folder of
//! `<endpoint>.json` list files and a `config.toml`, and runs the `abaca`
//! binary against them with a clean environment.

use abaca_types::EntityKind;
use anyhow::Result;
use assert_cmd::Command;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated CLI test environment.
///
/// # Example
/// ```no_run
/// use abaca_testing::{TestWorld, fixtures};
/// use abaca_types::EntityKind;
///
/// let world = TestWorld::new()
///     .with_list(EntityKind::Seedlings, &fixtures::seedlings(12, 5))
///     .unwrap();
///
/// let result = world.run(&["view", "seedlings", "--file", "data"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            temp_dir,
            data_dir,
            env_vars: HashMap::new(),
        }
    }

    /// Directory holding `<endpoint>.json` list files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config.toml")
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write a list file for the entity as a bare JSON array
    pub fn with_list(self, entity: EntityKind, items: &[Value]) -> Result<Self> {
        self.write_list(entity, &Value::Array(items.to_vec()))?;
        Ok(self)
    }

    /// Write any JSON body (array or envelope) as the entity's list file
    pub fn write_list(&self, entity: EntityKind, body: &Value) -> Result<PathBuf> {
        let path = self.data_dir.join(format!("{}.json", entity.endpoint()));
        std::fs::write(&path, serde_json::to_string_pretty(body)?)?;
        Ok(path)
    }

    pub fn with_config(self, toml: &str) -> Result<Self> {
        std::fs::write(self.config_path(), toml)?;
        Ok(self)
    }

    /// Point a CLI command at this world: config file, working directory
    /// and environment. `ABACA_*` variables from the caller are cleared.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--config").arg(self.config_path());
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("ABACA_PATH")
            .env_remove("ABACA_TOKEN")
            .env_remove("ABACA_ROLE")
            .env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run the `abaca` binary with the given arguments.
    ///
    /// Relative paths in `args` resolve against the world's temp directory.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("abaca")
            .map_err(|e| anyhow::anyhow!("Failed to find abaca binary: {}", e))?;
        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
