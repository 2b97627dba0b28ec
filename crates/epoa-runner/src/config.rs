use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use epoa_core::EpoaError;
use epoa_render::BrowserRenderer;
use epoa_scan::{TriggerWordRule, DEFAULT_TRIGGER_WORDS};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub name: String,
    pub evidence_dir: String,
    pub spreadsheet_path: String,
    pub spreadsheet_tab: String,
    pub resume_path: String,
    #[serde(default = "default_trigger_words")]
    pub trigger_words: Vec<String>,
    #[serde(default)]
    pub renderer: RendererConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RendererConfig {
    #[serde(default = "default_binary")]
    pub binary: String,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_extra_args")]
    pub extra_args: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            headless: default_headless(),
            timeout_secs: default_timeout_secs(),
            extra_args: default_extra_args(),
        }
    }
}

fn default_trigger_words() -> Vec<String> {
    DEFAULT_TRIGGER_WORDS.iter().map(|w| w.to_string()).collect()
}

fn default_binary() -> String {
    "google-chrome".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_extra_args() -> Vec<String> {
    vec![
        "--run-all-compositor-stages-before-draw".to_string(),
        "--virtual-time-budget=5000".to_string(),
    ]
}

impl Config {
    pub fn default_for_user(name: &str) -> Self {
        Self {
            name: name.to_string(),
            evidence_dir: "~/Documents/epoa/evidence".to_string(),
            spreadsheet_path: "~/Documents/epoa/roster.yaml".to_string(),
            spreadsheet_tab: "Applications".to_string(),
            resume_path: "~/Documents/epoa/resume.pdf".to_string(),
            trigger_words: default_trigger_words(),
            renderer: RendererConfig::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, EpoaError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| EpoaError::Config(format!("read {}: {e}", path.display())))?;
        let cfg: Config =
            toml::from_str(&s).map_err(|e| EpoaError::Config(format!("parse {}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Everything a run needs to be possible; checked before any row is touched.
    pub fn validate(&self) -> Result<(), EpoaError> {
        if self.name.trim().is_empty() {
            return Err(EpoaError::Config("name must not be empty".into()));
        }
        if self.evidence_dir.trim().is_empty() {
            return Err(EpoaError::Config("evidence_dir must not be empty".into()));
        }
        if self.spreadsheet_tab.trim().is_empty() {
            return Err(EpoaError::Config("spreadsheet_tab must not be empty".into()));
        }
        if self.trigger_words.iter().all(|w| w.trim().is_empty()) {
            return Err(EpoaError::Config("trigger_words must contain at least one word".into()));
        }
        if self.renderer.binary.trim().is_empty() {
            return Err(EpoaError::Config("renderer.binary must not be empty".into()));
        }
        if self.renderer.timeout_secs == 0 {
            return Err(EpoaError::Config("renderer.timeout_secs must be positive".into()));
        }
        let resume = self.resume_path();
        if !resume.is_file() {
            return Err(EpoaError::Config(format!("resume {} is not a file", resume.display())));
        }
        Ok(())
    }

    pub fn evidence_dir(&self) -> PathBuf {
        expand(&self.evidence_dir)
    }

    pub fn spreadsheet_path(&self) -> PathBuf {
        expand(&self.spreadsheet_path)
    }

    pub fn resume_path(&self) -> PathBuf {
        expand(&self.resume_path)
    }

    pub fn trigger_rule(&self) -> TriggerWordRule {
        TriggerWordRule::new(&self.trigger_words)
    }

    pub fn browser_renderer(&self) -> BrowserRenderer {
        BrowserRenderer::new(expand(&self.renderer.binary).display().to_string(), Duration::from_secs(self.renderer.timeout_secs))
            .with_headless(self.renderer.headless)
            .with_extra_args(self.renderer.extra_args.clone())
    }

    pub fn config_path() -> PathBuf {
        expand("~/.config/epoa/epoa.toml")
    }
}

fn expand(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}
