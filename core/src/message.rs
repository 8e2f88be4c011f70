//! Message log: newest first, unbounded.
//!
//! Truncating to the last few entries is a display concern; see
//! `MessageLog::recent` and `EngineConfig::message_display_limit`.

use crate::types::Tick;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    #[default]
    Plain,
    Primary,
    Success,
    Secondary,
    Danger,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillKind {
    #[default]
    Plain,
    LightMode,
    DarkMode,
    Filled,
}

/// A request for the host to pop a toast alongside a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Toast {
    pub title:         String,
    pub alert:         AlertKind,
    pub fill:          FillKind,
    pub dismissible:   bool,
    pub time_shown_ms: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Message {
    content: String,
    time:    Tick,
    #[serde(skip_serializing_if = "Option::is_none")]
    toast:   Option<Toast>,
}

impl Message {
    pub fn new(content: impl Into<String>, time: Tick, toast: Option<Toast>) -> Self {
        Self { content: content.into(), time, toast }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn time(&self) -> Tick {
        self.time
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct MessageLog {
    entries: VecDeque<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend; the newest message is always first.
    pub fn push(&mut self, message: Message) {
        self.entries.push_front(message);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Message> {
        self.entries.front()
    }

    /// All messages, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }

    /// The newest `count` messages, newest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &Message> {
        self.entries.iter().take(count)
    }
}
