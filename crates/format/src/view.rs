//! Whole-message views: the remainder plus one view per artifact.

use lexchat_core::{Artifact, ArtifactKind, Message, Role};
use serde::Serialize;

use crate::inline::{Block, format_text};
use crate::table::{TableView, format_table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeView {
    pub language: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactView {
    Code { title: String, code: CodeView },
    Table { title: String, table: TableView },
    Document { title: String, blocks: Vec<Block> },
}

impl ArtifactView {
    pub fn title(&self) -> &str {
        match self {
            Self::Code { title, .. } | Self::Table { title, .. } | Self::Document { title, .. } => {
                title
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub role: Role,
    pub agent: String,
    pub is_streaming: bool,
    pub is_error: bool,
    pub body: Vec<Block>,
    pub artifacts: Vec<ArtifactView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
}

pub fn format_artifact(artifact: &Artifact) -> ArtifactView {
    let title = artifact.title.clone();
    match artifact.kind {
        ArtifactKind::Code => ArtifactView::Code {
            title,
            code: CodeView {
                language: artifact.language.clone().unwrap_or_else(|| "text".into()),
                content: artifact.content.clone(),
            },
        },
        ArtifactKind::Table => ArtifactView::Table {
            title,
            table: format_table(&artifact.content),
        },
        ArtifactKind::Document => ArtifactView::Document {
            title,
            blocks: format_text(&artifact.content),
        },
    }
}

/// Build the renderable view of a message.
///
/// User and error messages are shown verbatim as prose; bot messages use
/// the conversational remainder plus their artifacts.
pub fn format_message(message: &Message) -> MessageView {
    MessageView {
        role: message.role,
        agent: message.agent.clone(),
        is_streaming: message.is_streaming,
        is_error: message.is_error,
        body: format_text(&message.conversational_content),
        artifacts: message.artifacts.iter().map(format_artifact).collect(),
        thinking: message.thinking.clone(),
    }
}
