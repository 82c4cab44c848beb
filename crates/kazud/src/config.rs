//! Configuration management for kazud.
//!
//! Loads settings from /etc/kazu/config.toml or uses defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/kazu/config.toml";

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama model used by the generative fallback
    #[serde(default = "default_model")]
    pub model: String,

    /// Generation request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    // Fine-tuned persona model served by Ollama
    "kazu_v2".to_string()
}

fn default_llm_timeout() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Speech output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default = "default_voice_enabled")]
    pub enabled: bool,

    /// espeak-ng voice identifier
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Speaking rate in words per minute
    #[serde(default = "default_rate")]
    pub rate: u32,
}

fn default_voice_enabled() -> bool {
    true
}

fn default_voice() -> String {
    "es".to_string()
}

fn default_rate() -> u32 {
    170
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: default_voice_enabled(),
            voice: default_voice(),
            rate: default_rate(),
        }
    }
}

/// Learned-answer store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemoryConfig {
    /// Database path override; default location is used when unset
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Persist every generated answer so future identical questions skip
    /// generation. Off by default: answers are only remembered when this
    /// policy is opted into.
    #[serde(default)]
    pub persist_generated: bool,
}

/// Full daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KazuConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub voice: VoiceConfig,

    #[serde(default)]
    pub memory: MemoryConfig,
}

impl KazuConfig {
    /// Load from the standard path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    /// Load from a specific path, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Invalid config at {:?}: {} - using defaults", path, e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config at {:?}, using defaults", path);
                Self::default()
            }
        }
    }
}
