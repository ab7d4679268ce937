use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::dataset::ColumnPatterns;

/// Environment variable consulted when `llm.llm_key` is left empty
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable consulted when `refine.draft_key` is left empty
pub const DRAFT_API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub columns: ColumnPatterns,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub llm_endpoint: String,
    #[serde(default)]
    pub llm_key: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

/// Two-stage chatbot: a reasoning model drafts, the primary endpoint polishes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineConfig {
    #[serde(default = "default_draft_endpoint")]
    pub draft_endpoint: String,
    #[serde(default)]
    pub draft_key: String,
    #[serde(default = "default_draft_model")]
    pub draft_model: String,
    /// Model asked for the polished reply on the `[llm]` endpoint
    #[serde(default = "default_polish_model")]
    pub polish_model: String,
}

fn default_draft_endpoint() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_draft_model() -> String {
    "deepseek-reasoner".to_string()
}

fn default_polish_model() -> String {
    "gpt-4o".to_string()
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            draft_endpoint: default_draft_endpoint(),
            draft_key: String::new(),
            draft_model: default_draft_model(),
            polish_model: default_polish_model(),
        }
    }
}

impl RefineConfig {
    /// Draft key, falling back to `DEEPSEEK_API_KEY` when the config leaves it empty
    pub fn draft_key(&self) -> Option<String> {
        key_or_env(&self.draft_key, DRAFT_API_KEY_ENV)
    }
}

fn key_or_env(configured: &str, env_var: &str) -> Option<String> {
    if !configured.trim().is_empty() {
        return Some(configured.to_string());
    }
    std::env::var(env_var)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
    /// Directory served at `/` next to the API, if any
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3001
}

const fn default_enable_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Absent unless the two-stage chatbot is wanted
    #[serde(default)]
    pub refine: Option<RefineConfig>,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::IdeaSparkError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Load from an explicit path when given, otherwise the default lookup
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    fn validate(&self) -> crate::Result<()> {
        if self.llm.timeout_secs == 0 {
            return Err(crate::IdeaSparkError::ConfigError(
                "llm.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.llm.llm_endpoint.trim().is_empty() {
            return Err(crate::IdeaSparkError::ConfigError(
                "llm.llm_endpoint must not be empty".to_string(),
            ));
        }
        if let Some(refine) = &self.refine {
            if refine.draft_endpoint.trim().is_empty() {
                return Err(crate::IdeaSparkError::ConfigError(
                    "refine.draft_endpoint must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Get dataset path
    pub fn dataset_path(&self) -> &Path {
        &self.dataset.path
    }

    /// Get dataset column patterns
    pub fn column_patterns(&self) -> &ColumnPatterns {
        &self.dataset.columns
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Get LLM key, falling back to `OPENAI_API_KEY` when the config leaves it empty
    pub fn llm_key(&self) -> Option<String> {
        key_or_env(&self.llm.llm_key, API_KEY_ENV)
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.llm_model
    }

    /// Get LLM request timeout in seconds
    pub fn llm_timeout_secs(&self) -> u64 {
        self.llm.timeout_secs
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig {
                path: PathBuf::from("data/projects_db.csv"),
                columns: ColumnPatterns::default(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            llm: LlmConfig {
                llm_endpoint: default_llm_endpoint(),
                llm_key: String::new(),
                llm_model: default_llm_model(),
                timeout_secs: default_timeout_secs(),
            },
            server: ServerConfig::default(),
            refine: None,
        }
    }
}
