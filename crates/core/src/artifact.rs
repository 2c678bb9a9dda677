//! Artifacts: structured regions classified out of a bot message.
//!
//! Artifacts are never stored on their own. They are always re-derived from
//! the owning message's raw text, so these types are plain values.

use serde::{Deserialize, Serialize};

/// The three shapes the extractor recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Code,
    Table,
    Document,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Table => "table",
            Self::Document => "document",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified sub-region of a message, rendered separately from the prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(rename = "type")]
    pub kind: ArtifactKind,

    /// Language tag for code artifacts ("text" when the fence had none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    pub content: String,

    pub title: String,
}

impl Artifact {
    /// A fenced code block. `tag` is the word right after the opening fence.
    pub fn code(tag: Option<&str>, content: impl Into<String>) -> Self {
        let tag = tag.filter(|t| !t.is_empty());
        Self {
            kind: ArtifactKind::Code,
            language: Some(tag.unwrap_or("text").to_string()),
            content: content.into(),
            title: format!("{} Block", tag.unwrap_or("Code")),
        }
    }

    pub fn table(content: impl Into<String>) -> Self {
        Self {
            kind: ArtifactKind::Table,
            language: None,
            content: content.into(),
            title: "Data Table".into(),
        }
    }

    pub fn document(content: impl Into<String>) -> Self {
        Self {
            kind: ArtifactKind::Document,
            language: None,
            content: content.into(),
            title: "Legal Document".into(),
        }
    }
}

/// Output of one extraction run. Transient: recomputed on every fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub artifacts: Vec<Artifact>,
    pub conversational_content: String,
}

impl ExtractionResult {
    pub fn has_kind(&self, kind: ArtifactKind) -> bool {
        self.artifacts.iter().any(|a| a.kind == kind)
    }

    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.artifacts.iter().filter(|a| a.kind == kind).count()
    }
}
