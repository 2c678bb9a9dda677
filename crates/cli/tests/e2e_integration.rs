//! End-to-end integration tests for the LexChat client pipeline.
//!
//! These tests drive a full session over the in-memory transport: a user
//! send goes out, a scripted reply streams back fragment by fragment, and
//! the reconciled messages are extracted and formatted for display.

use std::sync::Arc;

use lexchat_channels::MemoryTransport;
use lexchat_core::{AgentKind, ArtifactKind, BackendEvent, SessionId, TransportError};
use lexchat_format::{ArtifactView, RenderOptions, format_message, render_text};
use lexchat_session::{CONNECTION_CLOSED, ChatSession};

const PLAIN: RenderOptions = RenderOptions { ansi: false };

// ── Helpers ──────────────────────────────────────────────────────────────

async fn open(agent: AgentKind) -> (Arc<MemoryTransport>, ChatSession) {
    let transport = Arc::new(MemoryTransport::default());
    let session = ChatSession::open(transport.clone(), SessionId::from("e2e"), agent)
        .await
        .unwrap();
    (transport, session)
}

fn fragments(agent: &str, parts: &[&str]) -> Vec<BackendEvent> {
    let mut events: Vec<BackendEvent> = parts
        .iter()
        .map(|p| BackendEvent::fragment(*p).with_agent(agent))
        .collect();
    events.push(BackendEvent::done());
    events
}

// ── E2E: streamed turns ──────────────────────────────────────────────────

#[tokio::test]
async fn e2e_streamed_table_turn() {
    let (transport, mut session) = open(AgentKind::ContractAnalyzer).await;
    transport
        .script_reply(fragments(
            "ContractAnalyzer",
            &["Here is a t", "able:\n\n", "|A|B|\n|-|-|\n|1|2|\n"],
        ))
        .await;

    session.send("Tabulate the clauses").await.unwrap();

    let mut streaming_updates = 0;
    session
        .run_turn(|m| {
            if m.is_streaming {
                streaming_updates += 1;
            }
        })
        .await
        .unwrap();
    assert_eq!(streaming_updates, 3);

    let sent = transport.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].agent_type, AgentKind::ContractAnalyzer);
    assert_eq!(sent[0].session_id, SessionId::from("e2e"));

    let bot = session.messages().last().unwrap();
    assert!(!bot.is_streaming);
    assert_eq!(bot.raw_content, "Here is a table:\n\n|A|B|\n|-|-|\n|1|2|\n");
    assert_eq!(bot.conversational_content, "Here is a table:");

    let view = format_message(bot);
    let ArtifactView::Table { table, .. } = &view.artifacts[0] else {
        panic!("expected a table view");
    };
    assert_eq!(table.header, vec!["A", "B"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(
        render_text(&view, PLAIN),
        "Here is a table:\n\n── Data Table ──\n| A | B |\n|---|---|\n| 1 | 2 |"
    );
}

#[tokio::test]
async fn e2e_code_block_arrives_late() {
    let (transport, mut session) = open(AgentKind::DocumentDrafter).await;
    transport
        .script_reply(fragments(
            "DocumentDrafter",
            &["```js\n", "const x=1;\n", "```"],
        ))
        .await;
    session.send("Give me a snippet").await.unwrap();

    let mut artifact_counts = Vec::new();
    session
        .run_turn(|m| artifact_counts.push(m.artifacts.len()))
        .await
        .unwrap();

    // The fence only becomes a code block once it closes.
    assert_eq!(artifact_counts, vec![0, 0, 1, 1]);

    let bot = session.messages().last().unwrap();
    assert_eq!(bot.artifacts[0].kind, ArtifactKind::Code);
    assert_eq!(bot.artifacts[0].language.as_deref(), Some("js"));
    assert_eq!(bot.artifacts[0].content, "const x=1;");
    assert_eq!(bot.conversational_content, "I've created the code for you.");
}

#[tokio::test]
async fn e2e_document_turn() {
    let (transport, mut session) = open(AgentKind::DocumentDrafter).await;
    let body = format!(
        "Draft follows.\n\nAGREEMENT of non-disclosure\n- **Term**: {}",
        "x".repeat(220)
    );
    transport
        .script_reply(fragments("DocumentDrafter", &[&body]))
        .await;
    session.send("Draft an NDA").await.unwrap();
    session.run_turn(|_| {}).await.unwrap();

    let bot = session.messages().last().unwrap();
    assert_eq!(bot.artifacts.len(), 1);
    assert_eq!(bot.artifacts[0].kind, ArtifactKind::Document);
    assert_eq!(bot.conversational_content, "Draft follows.");
}

#[tokio::test]
async fn e2e_two_turns_keep_separate_messages() {
    let (transport, mut session) = open(AgentKind::LegalAdvisor).await;

    transport
        .script_reply(fragments("LegalAdvisor", &["First ", "answer."]))
        .await;
    session.send("one").await.unwrap();
    session.run_turn(|_| {}).await.unwrap();

    transport
        .script_reply(fragments("LegalAdvisor", &["Second answer."]))
        .await;
    session.send("two").await.unwrap();
    session.run_turn(|_| {}).await.unwrap();

    let contents: Vec<&str> = session
        .messages()
        .iter()
        .map(|m| m.raw_content.as_str())
        .collect();
    assert_eq!(contents, vec!["one", "First answer.", "two", "Second answer."]);
}

// ── E2E: failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_backend_error_ends_turn() {
    let (transport, mut session) = open(AgentKind::Team).await;
    transport
        .script_reply(vec![
            BackendEvent::fragment("Consulting the team").with_agent("Legal Team"),
            BackendEvent::error("Agent not initialized"),
        ])
        .await;
    session.send("Is this compliant?").await.unwrap();
    session.run_turn(|_| {}).await.unwrap();

    let messages = session.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[1].is_streaming, "interrupted message is left as it was");
    assert!(messages[2].is_error);
    assert_eq!(messages[2].agent, "Legal Team");

    // The session accepts a new send afterwards.
    assert!(!session.is_turn_open());
    transport
        .script_reply(fragments("Legal Team", &["Retry ok."]))
        .await;
    session.send("retry").await.unwrap();
    session.run_turn(|_| {}).await.unwrap();
    assert_eq!(session.messages().last().unwrap().raw_content, "Retry ok.");
}

#[tokio::test]
async fn e2e_stream_error_and_hang_up() {
    let (transport, mut session) = open(AgentKind::Researcher).await;
    session.send("find precedent").await.unwrap();
    transport.push_event(BackendEvent::fragment("Searching")).await.unwrap();
    transport
        .push_error(TransportError::StreamInterrupted("peer reset".into()))
        .await
        .unwrap();
    session.run_turn(|_| {}).await.unwrap();
    assert!(session.messages().last().unwrap().is_error);

    session.send("again").await.unwrap();
    transport.hang_up().await;
    session.run_turn(|_| {}).await.unwrap();
    assert_eq!(
        session.messages().last().unwrap().conversational_content,
        CONNECTION_CLOSED
    );
}

#[tokio::test]
async fn e2e_new_session_discards_in_flight() {
    let (transport, mut session) = open(AgentKind::LegalAdvisor).await;
    session.send("long question").await.unwrap();
    transport.push_event(BackendEvent::fragment("partial")).await.unwrap();
    session.next_event().await.unwrap();

    session.replace(SessionId::from("fresh")).await.unwrap();
    assert!(session.messages().is_empty());
    assert_eq!(
        transport.connected_session().await,
        Some(SessionId::from("fresh"))
    );

    transport
        .script_reply(fragments("LegalAdvisor", &["clean slate"]))
        .await;
    session.send("hello again").await.unwrap();
    session.run_turn(|_| {}).await.unwrap();
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.messages()[1].raw_content, "clean slate");
}

#[tokio::test]
async fn e2e_messages_serialize_for_export() {
    let (transport, mut session) = open(AgentKind::ComplianceAdvisor).await;
    transport
        .script_reply(vec![
            BackendEvent::fragment("|Rule|Status|\n|GDPR|ok|")
                .with_agent("ComplianceAdvisor")
                .with_timestamp("2024-05-01T12:30:00.5"),
            BackendEvent::done(),
        ])
        .await;
    session.send("check").await.unwrap();
    session.run_turn(|_| {}).await.unwrap();

    let messages = session.close().await.unwrap();
    let json = serde_json::to_value(&messages).unwrap();
    assert_eq!(json[1]["artifacts"][0]["type"], "table");
    assert_eq!(json[1]["agent"], "ComplianceAdvisor");

    let ts = messages[1].timestamp;
    assert_eq!(ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true), "2024-05-01T12:30:00.500Z");
}
