//! Retrieval-augmented project idea generation
//!
//! This module turns a free-text topic into project suggestions:
//! - Keyword-overlap retrieval against the in-memory dataset
//! - Context assembly from the retrieved past projects
//! - LLM-based idea and execution plan generation
//! - Escaping and wrapping of the generated text for display
//! - An optional two-stage draft-and-polish chatbot
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ideaspark::config::AppConfig;
//! use ideaspark::dataset::Dataset;
//! use ideaspark::llm::LlmService;
//! use ideaspark::rag::IdeaService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let dataset = Arc::new(Dataset::load(config.dataset_path(), config.column_patterns())?);
//!     let llm = Arc::new(LlmService::new(&config)?);
//!     let service = IdeaService::new(dataset, llm);
//!
//!     let html = service.generate_ideas("solar energy").await?;
//!     println!("{html}");
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod display;
pub mod pipeline;
pub mod refine;
pub mod retriever;
pub mod tokenizer;

use serde::Serialize;

pub use context::assemble_context;
pub use pipeline::ChatReply;
pub use pipeline::GenerateOutcome;
pub use pipeline::GenerateRequest;
pub use pipeline::IdeaService;
pub use refine::RefineService;
pub use refine::RefinedReply;
pub use retriever::Retriever;

use crate::models::ProjectRecord;

/// Search result with overlap score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub record: ProjectRecord,
    pub score: usize,
    /// Position of the record in the dataset
    pub position: usize,
    pub match_type: MatchType,
}

/// Why a record made it into the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// At least one query token overlaps the record
    Keyword,
    /// Zero overlap, included to fill the requested count
    Backfill,
}
