//! Page data model and the search response envelope

use serde::{Deserialize, Deserializer, Serialize};

/// One document in the remote project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Stable identifier, unique within a project
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Display text, also used as the navigation slug
    pub title: String,

    /// Leading text content of the page
    #[serde(default, deserialize_with = "line_texts")]
    pub lines: Vec<String>,
}

impl Page {
    /// Create a page without any preview lines
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            lines: Vec::new(),
        }
    }

    /// Attach preview lines
    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self
    }

    /// First line of the page, used as a preview
    pub fn subtitle(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or("")
    }
}

/// Response envelope of both remote page operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub pages: Vec<Page>,
}

/// Outcome of parsing a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPayload {
    /// The body carried a well-formed `pages` array
    Pages(SearchResult),
    /// Valid transport, unexpected body shape
    Malformed,
}

impl SearchPayload {
    /// Pages of a well-formed payload
    pub fn into_pages(self) -> Option<Vec<Page>> {
        match self {
            SearchPayload::Pages(result) => Some(result.pages),
            SearchPayload::Malformed => None,
        }
    }
}

/// Parse a response body into a tagged payload. Never fails.
pub fn parse_search_payload(body: &[u8]) -> SearchPayload {
    match serde_json::from_slice::<SearchResult>(body) {
        Ok(result) => SearchPayload::Pages(result),
        Err(e) => {
            tracing::debug!("Malformed search payload: {}", e);
            SearchPayload::Malformed
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

// The page listing returns lines as `{ "text": ... }` objects, search returns plain strings.
fn line_texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Line {
        Text(String),
        Object { text: String },
    }

    let lines = Option::<Vec<Line>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(lines
        .into_iter()
        .map(|line| match line {
            Line::Text(text) | Line::Object { text } => text,
        })
        .collect())
}
