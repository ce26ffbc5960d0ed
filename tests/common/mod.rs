/// Common test utilities for earnclock integration tests
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tempfile::TempDir;

/// An isolated earnclock home directory
#[allow(dead_code)]
pub struct TestHome {
    pub temp_dir: TempDir,
    pub home: PathBuf,
}

impl TestHome {
    /// Create an empty home in a temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let home = temp_dir.path().join("earnclock");

        TestHome { temp_dir, home }
    }

    /// Get the home path
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.home
    }

    /// Run ec with this home
    pub fn ec(&self, args: &[&str]) -> CommandResult {
        let output = Command::new(env!("CARGO_BIN_EXE_ec"))
            .args(args)
            .env("EARNCLOCK_HOME", &self.home)
            .env("NO_COLOR", "1")
            .env_remove("EARNCLOCK_LOG")
            .output()
            .expect("Failed to execute ec command");

        CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            exit_code: output.status.code(),
        }
    }

    /// Start ec in the background with piped output
    #[allow(dead_code)]
    pub fn spawn_ec(&self, args: &[&str]) -> Child {
        Command::new(env!("CARGO_BIN_EXE_ec"))
            .args(args)
            .env("EARNCLOCK_HOME", &self.home)
            .env("NO_COLOR", "1")
            .env_remove("EARNCLOCK_LOG")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn ec command")
    }

    /// Write a config file
    #[allow(dead_code)]
    pub fn create_config(&self, content: &str) {
        std::fs::create_dir_all(&self.home).expect("Failed to create home");
        std::fs::write(self.home.join("config.yml"), content)
            .expect("Failed to write config file");
    }

    /// Check if a session has been saved
    #[allow(dead_code)]
    pub fn session_exists(&self) -> bool {
        self.home.join("session.json").exists()
    }
}

/// Result of running a command
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: Option<i32>,
}

impl CommandResult {
    /// Assert the command succeeded
    pub fn assert_success(&self) {
        if !self.success {
            panic!(
                "Command failed:\nstdout: {}\nstderr: {}\nexit code: {:?}",
                self.stdout, self.stderr, self.exit_code
            );
        }
    }

    /// Assert the command failed
    #[allow(dead_code)]
    pub fn assert_failure(&self) {
        if self.success {
            panic!(
                "Command succeeded when it should have failed:\nstdout: {}\nstderr: {}",
                self.stdout, self.stderr
            );
        }
    }

    /// Assert stdout contains text
    #[allow(dead_code)]
    pub fn assert_stdout_contains(&self, text: &str) {
        assert!(
            self.stdout.contains(text),
            "stdout does not contain '{}'\nstdout: {}",
            text,
            self.stdout
        );
    }

    /// Assert stderr contains text
    #[allow(dead_code)]
    pub fn assert_stderr_contains(&self, text: &str) {
        assert!(
            self.stderr.contains(text),
            "stderr does not contain '{}'\nstderr: {}",
            text,
            self.stderr
        );
    }

    /// Parse the last non-empty stdout line as JSON
    #[allow(dead_code)]
    pub fn last_json(&self) -> serde_json::Value {
        let line = self
            .stdout
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .expect("no output");
        serde_json::from_str(line).expect("last line is not JSON")
    }

    /// Parse all of stdout as one JSON document
    #[allow(dead_code)]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).expect("stdout is not JSON")
    }
}
