//! Executable shell stand-ins for the browser, for tests that exercise the
//! real process boundary. Every stub appends a line to `invocations.log` in
//! its directory each time it runs.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const LOG: &str = "invocations.log";

const ARG_PARSE: &str = r#"out=""
while [ $# -gt 0 ]; do
  case "$1" in
    --print-to-pdf) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
"#;

fn write_stub(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    let log = dir.join(LOG);
    let script = format!("#!/bin/sh\necho \"$*\" >> '{}'\n{ARG_PARSE}{body}\n", log.display());
    std::fs::write(&path, script).with_context(|| format!("write {}", path.display()))?;
    let mut perms = std::fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms)?;
    Ok(path)
}

/// Copies `source` to the `--print-to-pdf` target and exits 0.
pub fn copying_renderer(dir: &Path, source: &Path) -> Result<PathBuf> {
    write_stub(dir, "render-copy.sh", &format!("cp '{}' \"$out\"\nexit 0", source.display()))
}

/// Writes a few bytes to the target, prints `message` on stderr and exits with `code`.
pub fn failing_renderer(dir: &Path, code: i32, message: &str) -> Result<PathBuf> {
    write_stub(
        dir,
        "render-fail.sh",
        &format!("printf 'partial' > \"$out\"\necho '{message}' >&2\nexit {code}"),
    )
}

/// Exits 0 without producing anything.
pub fn silent_renderer(dir: &Path) -> Result<PathBuf> {
    write_stub(dir, "render-silent.sh", "exit 0")
}

pub fn sleeping_renderer(dir: &Path, secs: u64) -> Result<PathBuf> {
    write_stub(dir, "render-sleep.sh", &format!("exec sleep {secs}"))
}

/// Number of times any stub in `dir` has run.
pub fn invocations(dir: &Path) -> usize {
    std::fs::read_to_string(dir.join(LOG)).map(|s| s.lines().count()).unwrap_or(0)
}
