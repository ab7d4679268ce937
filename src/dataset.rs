//! Past-project dataset loaded once from CSV and shared read-only
//!
//! Columns are resolved by case-insensitive substring match against a
//! [`ColumnPatterns`] declaration. A missing title or description column is a
//! fatal configuration error; the process must not start serving without one.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::errors::IdeaSparkError;
use crate::errors::Result;
use crate::models::ProjectRecord;
use crate::models::DEFAULT_CATEGORY;
use crate::rag::tokenizer::token_set;

/// Header substrings that identify each logical column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPatterns {
    #[serde(default = "default_title_patterns")]
    pub title: Vec<String>,
    #[serde(default = "default_description_patterns")]
    pub description: Vec<String>,
    #[serde(default = "default_category_patterns")]
    pub category: Vec<String>,
}

fn default_title_patterns() -> Vec<String> {
    vec!["title".to_string()]
}

fn default_description_patterns() -> Vec<String> {
    vec!["desc".to_string(), "summary".to_string()]
}

fn default_category_patterns() -> Vec<String> {
    vec!["category".to_string()]
}

impl Default for ColumnPatterns {
    fn default() -> Self {
        Self {
            title: default_title_patterns(),
            description: default_description_patterns(),
            category: default_category_patterns(),
        }
    }
}

/// Header positions picked for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub title: usize,
    pub description: usize,
    pub category: Option<usize>,
}

impl ColumnPatterns {
    /// Pick the first header matching each pattern list
    ///
    /// # Errors
    /// - `DatasetError` when no header matches the title or description patterns
    pub fn resolve<'a, I>(&self, headers: I) -> Result<ResolvedColumns>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<String> = headers.into_iter().map(str::to_lowercase).collect();
        let find = |patterns: &[String]| {
            headers.iter().position(|header| {
                patterns
                    .iter()
                    .any(|pattern| header.contains(&pattern.to_lowercase()))
            })
        };

        match (find(&self.title), find(&self.description)) {
            (Some(title), Some(description)) => Ok(ResolvedColumns {
                title,
                description,
                category: find(&self.category),
            }),
            _ => Err(IdeaSparkError::DatasetError(format!(
                "Could not find title/description columns in CSV headers: {headers:?}"
            ))),
        }
    }
}

/// A record with its precomputed token set
#[derive(Debug, Clone)]
pub struct DatasetEntry {
    pub record: ProjectRecord,
    pub tokens: HashSet<String>,
}

/// Immutable, ordered collection of past projects
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    entries: Vec<DatasetEntry>,
}

impl Dataset {
    /// Load a dataset from a CSV file
    ///
    /// # Errors
    /// - I/O errors opening the file
    /// - Missing title/description columns, blank required cells, malformed CSV
    pub fn load<P: AsRef<Path>>(path: P, patterns: &ColumnPatterns) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            IdeaSparkError::DatasetError(format!("Cannot open {}: {e}", path.display()))
        })?;
        let dataset = Self::from_reader(file, patterns)?;
        info!(
            "Loaded {} past projects from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse CSV text with a header row
    ///
    /// # Errors
    /// - Missing title/description columns, blank required cells, malformed CSV
    pub fn from_reader<R: Read>(reader: R, patterns: &ColumnPatterns) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let columns = patterns.resolve(csv_reader.headers()?.iter())?;
        debug!("Resolved dataset columns: {:?}", columns);

        let mut records = Vec::new();
        for (idx, row) in csv_reader.records().enumerate() {
            let row = row?;
            let cell = |pos: usize| row.get(pos).unwrap_or("").trim();

            let title = cell(columns.title);
            let description = cell(columns.description);
            if title.is_empty() || description.is_empty() {
                return Err(IdeaSparkError::DatasetError(format!(
                    "Row {} has a blank title or description",
                    idx + 1
                )));
            }

            let category = columns
                .category
                .map(cell)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CATEGORY);

            records.push(ProjectRecord::new(title, description, category));
        }

        Ok(Self::from_records(records))
    }

    /// Build a dataset from already-parsed records
    #[must_use]
    pub fn from_records(records: Vec<ProjectRecord>) -> Self {
        let entries = records
            .into_iter()
            .map(|record| {
                let tokens = token_set(&record.searchable_text());
                DatasetEntry { record, tokens }
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in dataset order
    #[must_use]
    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    /// Records in dataset order
    pub fn records(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.entries.iter().map(|entry| &entry.record)
    }

    /// Distinct categories in first-seen order
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records()
            .map(|record| record.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }
}
