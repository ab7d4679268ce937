//! CLI output formatting utilities

use crate::rag::display::to_plain_text;
use crate::rag::MatchType;
use crate::rag::SearchResult;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print ranked past projects
pub fn print_search_results(query: &str, results: &[SearchResult]) {
    println!("🔎 {} similar projects for '{}':", results.len(), query);
    for (idx, result) in results.iter().enumerate() {
        let marker = match result.match_type {
            MatchType::Keyword => format!("score {}", result.score),
            MatchType::Backfill => "backfill".to_string(),
        };
        println!(
            "  {}. {} [{}] ({})",
            idx + 1,
            result.record.title,
            result.record.category,
            marker
        );
        println!("     {}", truncate_str(&result.record.description, 100));
    }
}

/// Print a generated idea or plan block for the terminal
pub fn print_generated(heading: &str, html: &str) {
    println!("🧠 {heading}\n");
    println!("{}", to_plain_text(html));
}

/// Print a configuration summary with the API key masked
pub fn print_config_summary(config: &AppConfig, projects: usize, categories: &[&str]) {
    println!("📋 Configuration details:");
    println!("  Dataset: {}", config.dataset_path().display());
    println!("  Projects loaded: {projects}");
    println!("  Categories: {}", categories.join(", "));
    println!("  LLM endpoint: {}", config.llm_endpoint());
    println!("  LLM model: {}", config.llm_model());
    println!(
        "  LLM key: {}",
        config
            .llm_key()
            .map_or_else(|| "(not set)".to_string(), |key| mask_secret(&key))
    );
    println!("  LLM timeout: {}s", config.llm_timeout_secs());
    println!(
        "  Server: {}:{} (CORS {})",
        config.server.host,
        config.server.port,
        if config.server.enable_cors {
            "enabled"
        } else {
            "disabled"
        }
    );
}

/// Keep the last four characters of a secret
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
