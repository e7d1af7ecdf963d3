//! Documents and the CSV loader that produces them

use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;
use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::errors::VecRagError;

/// Per-document metadata, a JSON object
pub type Metadata = serde_json::Map<String, Value>;

/// Metadata equality constraints. The empty filter matches every document.
pub type Filter = serde_json::Map<String, Value>;

/// A unit of text stored in and retrieved from the vector table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Metadata::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Loads one document per CSV row: one column is the page content, every other
/// column becomes metadata
#[derive(Debug, Clone)]
pub struct CsvLoader {
    path: PathBuf,
    page_content_column: String,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>, page_content_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            page_content_column: page_content_column.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row of the file
    ///
    /// # Errors
    /// - The file cannot be opened or is not valid CSV
    /// - The page content column is missing from the header
    pub fn load(&self) -> Result<Vec<Document>> {
        let file = std::fs::File::open(&self.path)?;
        let documents = Self::load_from_reader(file, &self.page_content_column)?;
        debug!(
            "Loaded {} documents from {}",
            documents.len(),
            self.path.display()
        );
        Ok(documents)
    }

    /// Read documents from any CSV source
    pub fn load_from_reader<R: Read>(reader: R, page_content_column: &str) -> Result<Vec<Document>> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let content_index = headers
            .iter()
            .position(|h| h == page_content_column)
            .ok_or_else(|| {
                VecRagError::InvalidInput(format!(
                    "column '{page_content_column}' not found in CSV header"
                ))
            })?;

        let mut documents = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut metadata = Metadata::new();
            let mut page_content = String::new();

            for (idx, (header, cell)) in headers.iter().zip(record.iter()).enumerate() {
                if idx == content_index {
                    page_content = cell.to_string();
                } else {
                    metadata.insert(header.to_string(), cell_value(cell));
                }
            }

            documents.push(Document {
                page_content,
                metadata,
            });
        }

        Ok(documents)
    }
}

/// Type a CSV cell: empty as null, then bool, integer, float, falling back to text
pub fn cell_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed {
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Some(float) = trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
    {
        return Value::Number(float);
    }
    Value::String(raw.to_string())
}
