use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use epoa_core::FetchError;

use crate::types::Renderer;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const DETAIL_MAX_CHARS: usize = 240;

/// Headless browser invoked as
/// `<binary> --url <url> --print-to-pdf <output> [--headless] [extra args...]`.
#[derive(Clone, Debug)]
pub struct BrowserRenderer {
    pub binary: String,
    pub headless: bool,
    pub timeout: Duration,
    pub extra_args: Vec<String>,
}

impl BrowserRenderer {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self { binary: binary.into(), headless: true, timeout, extra_args: vec![] }
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn args_for(&self, url: &str, output: &Path) -> Vec<String> {
        let mut args = vec![
            "--url".to_string(),
            url.to_string(),
            "--print-to-pdf".to_string(),
            output.display().to_string(),
        ];
        if self.headless {
            args.push("--headless".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// `<binary> --version`, used by doctor to prove the binary runs.
    pub fn version(&self) -> Result<String> {
        let out = Command::new(&self.binary)
            .arg("--version")
            .output()
            .with_context(|| format!("run {} --version", self.binary))?;
        if !out.status.success() {
            return Err(anyhow!(
                "command failed: {} --version\nstdout:{}\nstderr:{}",
                self.binary,
                String::from_utf8_lossy(&out.stdout),
                String::from_utf8_lossy(&out.stderr)
            ));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }

    fn wait_with_timeout(&self, child: &mut Child) -> Result<ExitStatus, FetchError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if Instant::now() >= deadline => {
                    // Best effort; the process may have exited between the two calls.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(FetchError::Timeout(self.timeout.as_secs()));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(FetchError::Spawn(format!("wait on {}: {e}", self.binary))),
            }
        }
    }
}

impl Renderer for BrowserRenderer {
    fn render(&self, url: &str, output: &Path) -> Result<(), FetchError> {
        let args = self.args_for(url, output);
        tracing::debug!(binary = %self.binary, ?args, "invoking renderer");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FetchError::Spawn(format!("{}: {e}", self.binary)))?;

        // Drain stderr on the side so a chatty browser can't fill the pipe and stall.
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf);
                buf
            })
        });

        // On timeout the reader is left detached: grandchildren may still hold the pipe.
        let status = self.wait_with_timeout(&mut child)?;
        let stderr = stderr_reader.and_then(|h| h.join().ok()).unwrap_or_default();

        if !status.success() {
            return Err(FetchError::ExitStatus { status: status.to_string(), detail: short_detail(&stderr) });
        }

        match std::fs::metadata(output) {
            Ok(m) if m.is_file() && m.len() > 0 => Ok(()),
            _ => Err(FetchError::MissingOutput(output.display().to_string())),
        }
    }

    fn describe(&self) -> String {
        format!("{} (timeout {}s)", self.binary, self.timeout.as_secs())
    }
}

/// Last non-empty stderr line, clipped.
fn short_detail(stderr: &str) -> String {
    let line = stderr.lines().rev().map(str::trim).find(|l| !l.is_empty()).unwrap_or("no output on stderr");
    if line.chars().count() > DETAIL_MAX_CHARS {
        let clipped: String = line.chars().take(DETAIL_MAX_CHARS).collect();
        format!("{clipped}...")
    } else {
        line.to_string()
    }
}
