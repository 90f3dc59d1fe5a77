use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub llm: Option<LlmConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub groq_api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn groq_api_key(&self) -> Option<String> {
        self.api.as_ref().and_then(|a| a.groq_api_key.clone())
    }

    pub fn base_url(&self) -> Option<String> {
        self.api.as_ref().and_then(|a| a.base_url.clone())
    }

    pub fn model(&self) -> Option<String> {
        self.llm.as_ref().and_then(|l| l.model.clone())
    }

    pub fn temperature(&self) -> Option<f32> {
        self.llm.as_ref().and_then(|l| l.temperature)
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.llm.as_ref().and_then(|l| l.max_tokens)
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.llm.as_ref().and_then(|l| l.timeout_secs)
    }
}

/// Platform config directory path: `<config_dir>/skimmer/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("skimmer").join("config.toml"))
}

/// Load config by cascading CWD `.skimmer.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".skimmer.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        api: Some(ApiConfig {
            groq_api_key: overlay
                .api
                .as_ref()
                .and_then(|a| a.groq_api_key.clone())
                .or_else(|| base.api.as_ref().and_then(|a| a.groq_api_key.clone())),
            base_url: overlay
                .api
                .as_ref()
                .and_then(|a| a.base_url.clone())
                .or_else(|| base.api.as_ref().and_then(|a| a.base_url.clone())),
        }),
        llm: Some(LlmConfig {
            model: overlay
                .llm
                .as_ref()
                .and_then(|l| l.model.clone())
                .or_else(|| base.llm.as_ref().and_then(|l| l.model.clone())),
            temperature: overlay
                .llm
                .as_ref()
                .and_then(|l| l.temperature)
                .or_else(|| base.llm.as_ref().and_then(|l| l.temperature)),
            max_tokens: overlay
                .llm
                .as_ref()
                .and_then(|l| l.max_tokens)
                .or_else(|| base.llm.as_ref().and_then(|l| l.max_tokens)),
            timeout_secs: overlay
                .llm
                .as_ref()
                .and_then(|l| l.timeout_secs)
                .or_else(|| base.llm.as_ref().and_then(|l| l.timeout_secs)),
        }),
    }
}
