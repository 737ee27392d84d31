//! Bounded, most-recent-first digest of past prompt/response pairs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

pub const MEMORY_CAP: usize = 20;
pub const PROMPT_PREVIEW_CHARS: usize = 60;
pub const RESPONSE_PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryEntry {
    pub id: Uuid,
    pub prompt: String,
    pub response: String,
    pub model_name: String,
    pub estimated_tokens: usize,
    pub timestamp: DateTime<Utc>,
}

impl MemoryEntry {
    pub fn new(prompt: &str, response: &str, model_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: preview(prompt, PROMPT_PREVIEW_CHARS),
            response: preview(response, RESPONSE_PREVIEW_CHARS),
            model_name: model_name.to_uppercase(),
            estimated_tokens: estimate_tokens(response),
            timestamp: Utc::now(),
        }
    }
}

/// First `max_chars` characters, with `...` appended only when something was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Rough token estimate: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

#[derive(Debug, Clone)]
pub struct MemoryLog {
    entries: VecDeque<MemoryEntry>,
    cap: usize,
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::with_cap(MEMORY_CAP)
    }
}

impl MemoryLog {
    pub fn with_cap(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            entries: VecDeque::with_capacity(cap + 1),
            cap,
        }
    }

    /// Insert at the front, evicting the oldest entry once over the cap.
    pub fn insert(&mut self, entry: MemoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.cap);
    }

    pub fn get(&self, id: Uuid) -> Option<&MemoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}
