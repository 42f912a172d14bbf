//! Shared fixture for the black-box specs.
//!
//! A `Project` is a temporary base directory with its own socket
//! directory, so concurrent tests never share a session namespace.

#![allow(dead_code)]

use predicates::prelude::PredicateBooleanExt;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct Project {
    temp: tempfile::TempDir,
}

impl Project {
    /// New empty base directory with an isolated socket dir.
    pub fn empty() -> Self {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("jobs")).unwrap();
        std::fs::create_dir_all(temp.path().join(".sockets")).unwrap();
        Self { temp }
    }

    pub fn base(&self) -> &Path {
        self.temp.path()
    }

    pub fn socket_dir(&self) -> PathBuf {
        self.temp.path().join(".sockets")
    }

    /// Write a file under the base dir, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.temp.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
        self
    }

    /// Define a job whose `script.sh` runs `body` under /bin/sh.
    pub fn job(&self, name: &str, body: &str) -> &Self {
        self.job_with_spec(name, "script = \"script.sh\"\n", body)
    }

    /// Define a job with explicit `job.toml` contents (e.g. param defaults).
    pub fn job_with_spec(&self, name: &str, spec: &str, body: &str) -> &Self {
        let dir = self.temp.path().join("jobs").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("job.toml"), spec).unwrap();

        let script = dir.join("script.sh");
        std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        make_executable(&script);
        self
    }

    /// Invocation of one of the five tools inside this base dir.
    pub fn tool(&self, name: &str) -> Spec {
        let mut cmd = assert_cmd::Command::cargo_bin(name).unwrap();
        cmd.env("STINT_BASE_DIR", self.base())
            .env("STINT_SOCKET_DIR", self.socket_dir())
            .timeout(Duration::from_secs(30));
        Spec { cmd }
    }

    /// `startjob <job>`
    pub fn startjob(&self, job: &str) -> Spec {
        let mut spec = self.tool("startjob");
        spec.cmd.arg(job);
        spec
    }

    /// Contents of a job's build ledger, if allocated yet.
    pub fn ledger(&self, job: &str) -> Option<String> {
        std::fs::read_to_string(self.temp.path().join("jobs").join(job).join(".next_build")).ok()
    }

    /// Files currently under `sessions/` with the given extension.
    pub fn session_files(&self, ext: &str) -> Vec<PathBuf> {
        let dir = self.temp.path().join("sessions");
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|e| e == ext).unwrap_or(false))
            .collect()
    }

    /// Socket files currently present for this project.
    pub fn sockets(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(self.socket_dir()) else {
            return Vec::new();
        };
        entries.filter_map(|e| e.ok()).map(|e| e.path()).collect()
    }
}

pub fn make_executable(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).unwrap();
    }
}

/// A tool invocation being built up.
pub struct Spec {
    pub cmd: assert_cmd::Command,
}

impl Spec {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn env_remove(mut self, key: &str) -> Self {
        self.cmd.env_remove(key);
        self
    }

    /// Run and require success.
    pub fn passes(mut self) -> Checked {
        Checked {
            assert: self.cmd.assert().success(),
        }
    }

    /// Run and require this exact exit code.
    pub fn fails_with(mut self, code: i32) -> Checked {
        Checked {
            assert: self.cmd.assert().failure().code(code),
        }
    }
}

/// A finished invocation, ready for output assertions.
pub struct Checked {
    assert: assert_cmd::assert::Assert,
}

impl Checked {
    pub fn stdout_has(self, needle: &str) -> Self {
        Self {
            assert: self.assert.stdout(predicates::str::contains(needle)),
        }
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        Self {
            assert: self
                .assert
                .stdout(predicates::str::contains(needle).not()),
        }
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        Self {
            assert: self.assert.stderr(predicates::str::contains(needle)),
        }
    }

    /// Captured stdout, for assertions the combinators cannot express.
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stdout).into_owned()
    }
}
