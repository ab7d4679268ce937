//! Context assembly from retrieved past projects

use crate::models::ProjectRecord;
use crate::rag::SearchResult;

/// One line per result, numbered from 1
///
/// Every result is listed in full.
#[must_use]
pub fn assemble_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(idx, result)| format_record(idx + 1, &result.record))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `"<index>. <title> — <description> (Category: <category>)"`
#[must_use]
pub fn format_record(index: usize, record: &ProjectRecord) -> String {
    format!(
        "{index}. {} — {} (Category: {})",
        record.title, record.description, record.category
    )
}
