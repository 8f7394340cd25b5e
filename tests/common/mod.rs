#![allow(dead_code)]

use std::path::{Path, PathBuf};

use newcov::check::CheckOptions;
use newcov::diff::FileDiff;
use tempfile::TempDir;

pub const MODULE: &str = "github.com/example/module";

/// `Foo` is declared on lines 3-6, so its function range is 3-5.
pub const FOO_GO: &str = "package pkg\n\nfunc Foo() int {\n\tx := 1\n\treturn x\n}\n";

/// A Go module on disk. The caller must hold onto the project to keep the
/// temp directory alive.
pub struct GoProject {
    dir: TempDir,
}

impl GoProject {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("go.mod"),
            format!("module {MODULE}\n\ngo 1.21\n"),
        )
        .unwrap();
        GoProject { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write the profile and diff, returning options and a diff source for
    /// `newcov::check::run`.
    pub fn inputs(&self, profile: &str, diff: &str) -> (CheckOptions, FileDiff) {
        let cover = self.write("cover.out", profile);
        let diff = FileDiff {
            path: self.write("changes.diff", diff),
        };
        (CheckOptions::new(cover, self.root()), diff)
    }
}

/// A profile block line for `rel` inside the test module.
pub fn block(rel: &str, start: u32, end: u32, hits: i64) -> String {
    format!("{MODULE}/{rel}:{start}.1,{end}.2 1 {hits}\n")
}

/// A zero-context diff adding `lines` to `rel`, one hunk per line.
pub fn added_lines_diff(rel: &str, lines: &[u32]) -> String {
    let mut out = format!("diff --git a/{rel} b/{rel}\n--- a/{rel}\n+++ b/{rel}\n");
    for line in lines {
        out.push_str(&format!("@@ -{line},0 +{line} @@\n+\tchanged()\n"));
    }
    out
}
