use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdeaSparkError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dataset error: {0}")]
    DatasetError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Prompt template error: missing value for '{0}'")]
    Prompt(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, IdeaSparkError>;
