use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vai_tools::backend::default_app_aliases;
use vai_tools::ToolPolicies;
use vai_verifier::settings::default_file_manager_hints;
use vai_verifier::VerifierSettings;

pub const DEFAULT_CONFIG_PATH: &str = "vai.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vision: VisionConfig,
    pub verification: VerificationConfig,
    pub retry: RetryConfig,
    /// Spoken app name to launch command.
    pub apps: BTreeMap<String, String>,
    pub audit_log: PathBuf,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    pub inter_query_delay_ms: u64,
    pub evidence_chars: usize,
    /// 0 disables the overall verification timeout.
    pub timeout_secs: u64,
    pub file_manager_hints: Vec<String>,
}

/// Overrides applied on top of each verified tool's preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: Option<u32>,
    pub settle_ms: Option<u64>,
    pub backoff_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vision: VisionConfig::default(),
            verification: VerificationConfig::default(),
            retry: RetryConfig::default(),
            apps: default_app_aliases().into_iter().collect(),
            audit_log: PathBuf::from("./data/tool_events.jsonl"),
            log_level: "info".to_string(),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        let settings = VerifierSettings::default();
        Self {
            inter_query_delay_ms: 300,
            evidence_chars: settings.evidence_chars,
            timeout_secs: 60,
            file_manager_hints: default_file_manager_hints(),
        }
    }
}

impl Config {
    /// Config file location, `VAI_CONFIG` or `./vai.yaml`.
    pub fn path() -> PathBuf {
        std::env::var("VAI_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load from [`Config::path`], falling back to defaults when the file is absent,
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// `VAI_VISION_ENDPOINT` and `VAI_VISION_MODEL` win over the file.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("VAI_VISION_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            self.vision.base_url = endpoint;
        }
        if let Some(model) = lookup("VAI_VISION_MODEL").filter(|v| !v.trim().is_empty()) {
            self.vision.model = model;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.vision.base_url.trim().is_empty() {
            bail!("vision.base_url cannot be empty");
        }
        if self.vision.model.trim().is_empty() {
            bail!("vision.model cannot be empty");
        }
        if self.verification.evidence_chars == 0 {
            bail!("verification.evidence_chars must be greater than zero");
        }
        Ok(())
    }

    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.vision.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn verifier_settings(&self) -> VerifierSettings {
        let v = &self.verification;
        VerifierSettings {
            inter_query_delay: Duration::from_millis(v.inter_query_delay_ms),
            evidence_chars: v.evidence_chars,
            timeout: (v.timeout_secs > 0).then(|| Duration::from_secs(v.timeout_secs)),
            file_manager_hints: v.file_manager_hints.clone(),
            ..VerifierSettings::default()
        }
    }

    pub fn tool_policies(&self) -> ToolPolicies {
        let overrides = self.retry.clone();
        ToolPolicies::default().map(|mut policy| {
            if let Some(max_retries) = overrides.max_retries {
                policy.max_retries = max_retries;
            }
            if let Some(ms) = overrides.settle_ms {
                policy.settle_delay = Duration::from_millis(ms);
            }
            if let Some(ms) = overrides.backoff_ms {
                policy.backoff = Duration::from_millis(ms);
            }
            policy
        })
    }
}
