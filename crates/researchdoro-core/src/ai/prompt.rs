//! Prompt construction and response parsing shared by every backend.

use indoc::{formatdoc, indoc};
use serde::{Deserialize, Serialize};

use super::context::ResearchContext;

/// Recent queries included in the context block.
const CONTEXT_QUERIES: usize = 3;
const MAX_INSIGHTS: usize = 5;
const MIN_INSIGHT_LEN: usize = 10;
const BULLET_MARKERS: &[char] = &['•', '-', '*'];

const QUICK_QUERY_PREAMBLE: &str = indoc! {"
    You are a research assistant embedded in a Pomodoro focus timer.
    Answer the researcher's question concisely and accurately in a few short paragraphs.
    If the question is ambiguous, state your assumption before answering."};

const CHAT_PREAMBLE: &str = indoc! {"
    You are a research assistant embedded in a Pomodoro focus timer.
    Hold a focused conversation with the researcher about their work.
    Keep replies brief so they fit inside a short break."};

const ANALYSIS_PREAMBLE: &str = indoc! {"
    You are a productivity coach for researchers.
    Analyze the focus session described by the user and give concrete, encouraging feedback
    on pacing, breaks and progress toward the stated goal."};

const INSIGHTS_PREAMBLE: &str = indoc! {"
    You are a productivity analyst for researchers.
    Reply with 3 to 5 actionable insights, one per line, each starting with \"- \".
    Do not add any other text."};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Metrics of one focus session, serialized into the analysis prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub total_minutes: u64,
    pub completed_pomodoros: u64,
    pub breaks_taken: u64,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Vendor-neutral request: a system instruction plus ordered turns.
///
/// Backends map this onto their own envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

/// Up to three lines describing the research context, or `None` when
/// nothing is set.
pub fn context_block(context: Option<&ResearchContext>) -> Option<String> {
    let ctx = context?;
    let mut lines = Vec::new();
    if let Some(topic) = ctx.current_topic.as_deref().filter(|t| !t.is_empty()) {
        lines.push(format!("Current topic: {topic}"));
    }
    if !ctx.focus_areas.is_empty() {
        lines.push(format!("Focus areas: {}", ctx.focus_areas.join(", ")));
    }
    if !ctx.recent_queries.is_empty() {
        let recent: Vec<&str> = ctx
            .recent_queries
            .iter()
            .take(CONTEXT_QUERIES)
            .map(String::as_str)
            .collect();
        lines.push(format!("Recent queries: {}", recent.join("; ")));
    }
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn system_prompt(preamble: &str, context: Option<&ResearchContext>) -> String {
    match context_block(context) {
        Some(block) => format!("{preamble}\n\nResearch context:\n{block}"),
        None => preamble.to_string(),
    }
}

pub fn quick_query(query: &str, context: Option<&ResearchContext>) -> Conversation {
    Conversation {
        system: system_prompt(QUICK_QUERY_PREAMBLE, context),
        messages: vec![ChatMessage::user(query)],
    }
}

pub fn chat(messages: &[ChatMessage], context: Option<&ResearchContext>) -> Conversation {
    Conversation {
        system: system_prompt(CHAT_PREAMBLE, context),
        messages: messages.to_vec(),
    }
}

pub fn analyze_session(data: &SessionData, context: Option<&ResearchContext>) -> Conversation {
    let goal = data.goal.as_deref().unwrap_or("not set");
    let notes = if data.notes.is_empty() {
        "none".to_string()
    } else {
        data.notes.join("; ")
    };
    let body = formatdoc! {"
        Please analyze this focus session:
        Total focus time: {total} minutes
        Completed pomodoros: {completed}
        Breaks taken: {breaks}
        Session goal: {goal}
        Notes: {notes}",
        total = data.total_minutes,
        completed = data.completed_pomodoros,
        breaks = data.breaks_taken,
    };
    Conversation {
        system: system_prompt(ANALYSIS_PREAMBLE, context),
        messages: vec![ChatMessage::user(body)],
    }
}

pub fn generate_insights(data: &serde_json::Value, context: Option<&ResearchContext>) -> Conversation {
    let rendered = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    Conversation {
        system: system_prompt(INSIGHTS_PREAMBLE, context),
        messages: vec![ChatMessage::user(format!(
            "Generate insights from this productivity data:\n{rendered}"
        ))],
    }
}

/// Minimal round trip used to verify credentials and endpoint.
pub fn connection_probe() -> Conversation {
    Conversation {
        system: "Reply with the single word OK.".into(),
        messages: vec![ChatMessage::user("ping")],
    }
}

/// Extract bullet-point insights from a free-text reply.
///
/// Keeps lines containing a bullet marker, with leading markers and
/// emphasis stripped, preserving order. Separators (`---`, `* * *`) and
/// headings ending in `:` are dropped. A reply with no bullets falls back to
/// its lines of at least ten characters. At most five insights are returned.
pub fn parse_insights(text: &str) -> Vec<String> {
    let bulleted: Vec<String> = text
        .lines()
        .filter(|line| line.contains(BULLET_MARKERS))
        .map(strip_decoration)
        .filter(|line| is_insight(line))
        .take(MAX_INSIGHTS)
        .collect();
    if !bulleted.is_empty() {
        return bulleted;
    }
    text.lines()
        .map(strip_decoration)
        .filter(|line| is_insight(line) && line.chars().count() >= MIN_INSIGHT_LEN)
        .take(MAX_INSIGHTS)
        .collect()
}

fn strip_decoration(line: &str) -> String {
    line.trim_start_matches(|c: char| c.is_whitespace() || BULLET_MARKERS.contains(&c) || c == '_')
        .trim_end_matches(|c: char| c.is_whitespace() || c == '*' || c == '_')
        .to_string()
}

fn is_insight(line: &str) -> bool {
    line.chars().any(char::is_alphanumeric) && !line.ends_with(':')
}
