// src/services/chat_log.rs
use std::collections::VecDeque;

use chrono::{DateTime, Local};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Assistant,
    Error,
}

#[derive(Clone, Debug)]
pub struct ChatEntry {
    pub kind: EntryKind,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ChatEntry {
    pub fn is_error(&self) -> bool {
        self.kind == EntryKind::Error
    }

    /// Wall-clock time as shown next to the entry.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Display-only log, newest entry first.
#[derive(Clone, Debug, Default)]
pub struct ChatLog {
    entries: VecDeque<ChatEntry>,
    capacity: Option<usize>,
    appended: u64,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that drops its oldest entries beyond `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: Some(capacity.max(1)),
            appended: 0,
        }
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) -> usize {
        self.prepend(EntryKind::Assistant, text.into())
    }

    pub fn push_error(&mut self, text: impl Into<String>) -> usize {
        self.prepend(EntryKind::Error, text.into())
    }

    fn prepend(&mut self, kind: EntryKind, text: String) -> usize {
        self.entries.push_front(ChatEntry {
            kind,
            text,
            timestamp: Local::now(),
        });
        self.appended += 1;
        if let Some(cap) = self.capacity {
            self.entries.truncate(cap);
        }
        self.entries.len()
    }

    pub fn latest(&self) -> Option<&ChatEntry> {
        self.entries.front()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChatEntry> {
        self.entries.iter()
    }

    /// Entries ever added, including evicted ones.
    pub fn appended(&self) -> u64 {
        self.appended
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
