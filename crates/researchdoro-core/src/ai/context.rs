//! Research context shared across provider calls.

use serde::{Deserialize, Serialize};

pub const MAX_RECENT_QUERIES: usize = 10;
pub const MAX_SESSION_NOTES: usize = 20;

/// Topic, notes and query history injected into prompts.
///
/// Lists are most-recent-first. The gateway only reads it; callers pass a
/// reference per call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchContext {
    #[serde(default)]
    pub current_topic: Option<String>,
    #[serde(default)]
    pub recent_queries: Vec<String>,
    #[serde(default)]
    pub session_notes: Vec<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

impl ResearchContext {
    pub fn with_topic(topic: impl Into<String>) -> Self {
        let mut ctx = Self::default();
        ctx.set_topic(topic);
        ctx
    }

    /// A blank topic clears it.
    pub fn set_topic(&mut self, topic: impl Into<String>) {
        let topic = topic.into();
        let topic = topic.trim();
        self.current_topic = (!topic.is_empty()).then(|| topic.to_string());
    }

    /// Push a query to the front; a repeat moves to the front.
    pub fn record_query(&mut self, query: &str) {
        push_front_bounded(&mut self.recent_queries, query, MAX_RECENT_QUERIES, true);
    }

    pub fn add_note(&mut self, note: &str) {
        push_front_bounded(&mut self.session_notes, note, MAX_SESSION_NOTES, false);
    }

    /// Returns false if the area was blank or already present.
    pub fn add_focus_area(&mut self, area: &str) -> bool {
        let area = area.trim();
        if area.is_empty() || self.focus_areas.iter().any(|a| a.eq_ignore_ascii_case(area)) {
            return false;
        }
        self.focus_areas.push(area.to_string());
        true
    }

    pub fn remove_focus_area(&mut self, area: &str) -> bool {
        let before = self.focus_areas.len();
        self.focus_areas.retain(|a| !a.eq_ignore_ascii_case(area.trim()));
        before != self.focus_areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_topic.is_none()
            && self.recent_queries.is_empty()
            && self.session_notes.is_empty()
            && self.focus_areas.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn push_front_bounded(list: &mut Vec<String>, item: &str, max: usize, dedup: bool) {
    let item = item.trim();
    if item.is_empty() {
        return;
    }
    if dedup {
        list.retain(|existing| existing != item);
    }
    list.insert(0, item.to_string());
    list.truncate(max);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_are_most_recent_first_and_bounded() {
        let mut ctx = ResearchContext::default();
        for i in 0..15 {
            ctx.record_query(&format!("query {i}"));
        }
        assert_eq!(ctx.recent_queries.len(), MAX_RECENT_QUERIES);
        assert_eq!(ctx.recent_queries[0], "query 14");
        assert_eq!(ctx.recent_queries[9], "query 5");
    }

    #[test]
    fn repeated_query_moves_to_front() {
        let mut ctx = ResearchContext::default();
        ctx.record_query("a");
        ctx.record_query("b");
        ctx.record_query("a");
        assert_eq!(ctx.recent_queries, vec!["a", "b"]);
    }

    #[test]
    fn notes_keep_duplicates() {
        let mut ctx = ResearchContext::default();
        ctx.add_note("read paper");
        ctx.add_note("read paper");
        assert_eq!(ctx.session_notes.len(), 2);
    }

    #[test]
    fn focus_areas_are_set_like() {
        let mut ctx = ResearchContext::default();
        assert!(ctx.add_focus_area("Genomics"));
        assert!(!ctx.add_focus_area("genomics"));
        assert!(!ctx.add_focus_area("  "));
        assert!(ctx.add_focus_area("Statistics"));
        assert_eq!(ctx.focus_areas, vec!["Genomics", "Statistics"]);
        assert!(ctx.remove_focus_area("GENOMICS"));
        assert_eq!(ctx.focus_areas, vec!["Statistics"]);
    }

    #[test]
    fn blank_topic_clears() {
        let mut ctx = ResearchContext::with_topic("CRISPR");
        assert!(!ctx.is_empty());
        ctx.set_topic("  ");
        assert!(ctx.is_empty());
    }
}
