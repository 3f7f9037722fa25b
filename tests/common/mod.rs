// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

pub const REPORT_FILES: [&str; 4] = [
    "address-read-sort.txt",
    "address-write-sort.txt",
    "source-read-sort.txt",
    "source-write-sort.txt",
];

/// Scratch directory holding a trace file, used as cwd and as HOME so no
/// user or project configuration leaks into the run
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path().join(name))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", name, e))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path().join(name).exists()
    }

    /// Run the binary inside the workspace and return (stdout, stderr, exit code)
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_tracestat"))
            .args(args)
            .current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env("NO_COLOR", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .expect("Failed to execute tracestat");

        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }
}

/// Build a synthetic trace with noise lines mixed in between records
pub fn synthetic_trace(records: usize) -> String {
    let mut out = String::from("==================\nWARNING: tracer started\n");
    for i in 0..records {
        let kind = match i % 5 {
            0 => "read8",
            1 => "write4",
            2 => "atomic_write",
            3 => "read1",
            _ => "write8",
        };
        out.push_str(&format!(
            " > {} {:x} {} {} func_{}\n",
            kind,
            0x7f00_0000u64 + (i as u64 % 37) * 8,
            8,
            i % 6,
            i % 11
        ));
        if i % 13 == 0 {
            out.push_str("SUMMARY: nothing to see\n");
        }
    }
    out
}
