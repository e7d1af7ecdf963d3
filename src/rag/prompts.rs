//! Prompt templates for RAG

use crate::documents::Document;
use crate::errors::Result;
use crate::errors::VecRagError;

/// Question answering template. The indentation is part of the prompt.
pub const RAG_TEMPLATE: &str =
    "Answer the question based only on the following context:\n    {context}\n\n    Question: {question}\n    ";

/// Separator placed between retrieved documents in the context block
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Template with `{name}` placeholders, substituted in a single pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn from_template(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The fixed question answering template
    pub fn rag() -> Self {
        Self::from_template(RAG_TEMPLATE)
    }

    /// Placeholder names in order of appearance
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else { break };
            let name = &after[..end];
            if !names.contains(&name) {
                names.push(name);
            }
            rest = &after[end + 1..];
        }
        names
    }

    /// Fill every placeholder. Substituted values are never re-scanned.
    ///
    /// # Errors
    /// - `InvalidInput` for a placeholder without a value or an unclosed `{`
    pub fn format(&self, values: &[(&str, &str)]) -> Result<String> {
        let mut output = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('{') {
            output.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after.find('}').ok_or_else(|| {
                VecRagError::InvalidInput("unclosed placeholder in prompt template".to_string())
            })?;
            let name = &after[..end];
            let value = values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| {
                    VecRagError::InvalidInput(format!("missing value for prompt variable '{name}'"))
                })?;
            output.push_str(value);
            rest = &after[end + 1..];
        }

        output.push_str(rest);
        Ok(output)
    }
}

/// Render retrieved documents as the context block
pub fn format_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}
