#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const ROOTS: [&str; 4] = ["administrator", "language", "api", "installation"];

/// A translated project tree next to a reference checkout, both carrying
/// every localization root.
pub struct Fixture {
    pub dir: tempfile::TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fx = Self {
            dir: tempfile::tempdir().expect("tempdir"),
        };
        for root in ROOTS {
            fs::create_dir_all(fx.root().join(root)).expect("mkdir translated root");
            fs::create_dir_all(fx.reference_root().join(root)).expect("mkdir reference root");
        }
        fx
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn reference_root(&self) -> PathBuf {
        self.root().join("reference")
    }

    pub fn translated(&self, rel: &str, body: &str) -> &Self {
        write(&self.root().join(rel), body);
        self
    }

    pub fn reference(&self, rel: &str, body: &str) -> &Self {
        write(&self.reference_root().join(rel), body);
        self
    }

    /// Command isolated from user config and the network.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("langsync").expect("langsync built");
        cmd.current_dir(self.root())
            .env("HOME", self.root())
            .env("XDG_CONFIG_HOME", self.root().join(".config"))
            .env("LANGSYNC_GITHUB_API", "http://127.0.0.1:9")
            .env("NO_COLOR", "1")
            .env("RUST_LOG", "warn")
            .arg("--root")
            .arg(self.root());
        cmd
    }

    pub fn cmd_with_reference(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--reference-root").arg(self.reference_root());
        cmd
    }
}

pub fn write(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, body).expect("write");
}

/// Zip `files` under a single top-level folder, like a GitHub tag archive.
pub fn write_archive(path: &Path, top: &str, files: &[(&str, &str)]) {
    let file = fs::File::create(path).expect("create zip");
    let mut zip = zip::ZipWriter::new(file);
    let opts = zip::write::FileOptions::default();
    for (name, body) in files {
        zip.start_file(format!("{top}/{name}"), opts).expect("start file");
        zip.write_all(body.as_bytes()).expect("write entry");
    }
    zip.finish().expect("finish zip");
}

pub fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}
