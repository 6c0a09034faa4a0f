use chrono::{DateTime, Local};
use log::info;
use std::collections::VecDeque;
use std::fmt;

/// One status-bar line
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub at: DateTime<Local>,
    pub text: String,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.text)
    }
}

/// Bounded history of status messages, newest last
#[derive(Debug, Clone)]
pub struct StatusLog {
    messages: VecDeque<StatusMessage>,
    capacity: usize,
}

impl StatusLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity.min(256)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!("{}", text);
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(StatusMessage {
            at: Local::now(),
            text,
        });
    }

    pub fn latest(&self) -> Option<&StatusMessage> {
        self.messages.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.text.contains(needle))
    }
}
