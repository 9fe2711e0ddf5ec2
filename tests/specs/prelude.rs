//! Shared helpers for CLI specs

pub use predicates::prelude::*;

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch ticket store
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A store holding `count` fresh tickets, ids 1..=count
    pub fn with_tickets(count: usize) -> Self {
        let project = Self::empty();
        for _ in 0..count {
            project.tg().args(["create"]).passes();
        }
        project
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    pub fn write_config(&self, content: &str) {
        std::fs::write(self.path().join("tg.toml"), content).unwrap();
    }

    /// Start `tg` in the background without waiting for it
    pub fn spawn_tg(&self, args: &[&str]) -> std::process::Child {
        std::process::Command::new(assert_cmd::cargo::cargo_bin("tg"))
            .arg("--store")
            .arg(self.path())
            .args(args)
            .env_remove("RUST_LOG")
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .unwrap()
    }

    /// `tg` pointed at this store
    pub fn tg(&self) -> Cli {
        let mut cmd = Command::cargo_bin("tg").unwrap();
        cmd.arg("--store").arg(self.path()).env_remove("RUST_LOG");
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn passes(mut self) -> Run {
        Run(self.cmd.assert().success())
    }

    pub fn fails(mut self) -> Run {
        Run(self.cmd.assert().failure())
    }

    pub fn exits_with(mut self, code: i32) -> Run {
        Run(self.cmd.assert().code(code))
    }
}

pub struct Run(assert_cmd::assert::Assert);

impl Run {
    pub fn stdout_has(self, text: &str) -> Self {
        Run(self.0.stdout(predicate::str::contains(text)))
    }

    pub fn stdout_is(self, text: &str) -> Self {
        let output = String::from_utf8_lossy(&self.0.get_output().stdout).to_string();
        similar_asserts::assert_eq!(output, text);
        self
    }

    pub fn stderr_has(self, text: &str) -> Self {
        Run(self.0.stderr(predicate::str::contains(text)))
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.get_output().stdout).to_string()
    }
}
