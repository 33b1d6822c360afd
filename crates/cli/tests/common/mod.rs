// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared fixtures for driving `fonttest-check` against fake renderers.

#![allow(dead_code)]
#![allow(deprecated)] // Command::cargo_bin is deprecated but still functional

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Expected rendering shared by every generated test case.
pub const EXPECTED_SVG: &str =
    r#"<svg version="1.1" viewBox="0 -120 1000 1000"><path d="M 100,200 L 300,400 Q 350,450 400,400 Z"/></svg>"#;

/// Renderer stand-in. Behavior is picked by a keyword in the test case id;
/// every invocation is appended to `$FONTTEST_ARGS_LOG` when set.
const FAKE_RENDERER: &str = r#"#!/bin/sh
if [ -n "$FONTTEST_ARGS_LOG" ]; then
  echo "$@" >> "$FONTTEST_ARGS_LOG"
fi
for arg in "$@"; do
  case "$arg" in
    --version) echo "FakeRender 1.0 ($FONTTEST_FAKE_ENGINE)"; exit 0 ;;
    --testcase=*) id="${arg#--testcase=}" ;;
  esac
done
case "$id" in
  *pass*)
    printf '<?xml version="1.0"?>\n<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="0 -120 1000 1000">\n'
    printf '  <path d="M 100,200 L 300,400 Q 350,450 400,400 Z"/>\n</svg>\n' ;;
  *near*) printf '<svg version="1.1" viewBox="0 -120 1000 1000"><path d="M100.4 200L300 399.6Q350 450 400 400Z"/></svg>' ;;
  *mismatch*) printf '<svg version="1.1" viewBox="0 -120 1000 1000"><path d="M 180,200 L 300,400 Q 350,450 400,400 Z"/></svg>' ;;
  *crash*) echo "segmentation fault" >&2; exit 139 ;;
  *hang*) sleep 30 ;;
  *garbage*) printf 'definitely not svg' ;;
  *) exit 0 ;;
esac
"#;

/// A scratch directory with a renderer, a testcases directory and a fonts directory.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("testcases")).unwrap();
        std::fs::create_dir(dir.path().join("fonts")).unwrap();
        let workspace = Self { dir };
        workspace.install_renderer();
        workspace
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn renderer(&self) -> PathBuf {
        self.path().join("fake-renderer")
    }

    pub fn testcases(&self) -> PathBuf {
        self.path().join("testcases")
    }

    fn install_renderer(&self) {
        let path = self.renderer();
        std::fs::write(&path, FAKE_RENDERER).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    /// Write a test file declaring one rendering case per id.
    pub fn write_suite(&self, name: &str, ids: &[&str]) -> PathBuf {
        let cases: String = ids
            .iter()
            .map(|id| {
                format!(
                    "<div class=\"expected\" ft:id=\"{id}\" ft:font=\"Test.ttf\" ft:render=\"abc\">{EXPECTED_SVG}</div>\n\
                     <div class=\"observed\" ft:id=\"{id}\"/>\n\
                     <p class=\"conformance\" ft:id=\"{id}\"/>\n"
                )
            })
            .collect();
        self.write_raw_suite(name, &cases)
    }

    /// Write a test file with the given body markup.
    pub fn write_raw_suite(&self, name: &str, body: &str) -> PathBuf {
        let path = self.testcases().join(name);
        std::fs::write(
            &path,
            format!(
                "<!DOCTYPE html>\n\
                 <html xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:ft=\"https://github.com/OpenType/fonttest\">\n\
                 <head><title>{name}</title></head>\n<body>\n{body}</body>\n</html>\n"
            ),
        )
        .unwrap();
        path
    }

    /// `fonttest-check` preconfigured for this workspace.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("fonttest-check").unwrap();
        cmd.current_dir(self.path())
            .env_remove("FONTTEST_ENGINE")
            .env_remove("FONTTEST_CONFIG")
            .env("FONTTEST_FAKE_ENGINE", "fake")
            .arg("--renderer")
            .arg(self.renderer())
            .arg("--testcases")
            .arg(self.testcases())
            .arg("--fonts")
            .arg(self.path().join("fonts"));
        cmd
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path().join(relative)).unwrap()
    }
}
