//! Interactive chat session state.
//!
//! A `ChatSession` is created when a chat starts, passed explicitly
//! to every question asked in it, and dropped when the chat ends.
//! Nothing here is global.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One question/answer exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,

    /// Index the answer was retrieved from
    pub index: String,

    pub asked_at: DateTime<Utc>,
}

/// Chat history for one interactive session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,

    /// Index questions are asked against
    pub index: String,

    pub started_at: DateTime<Utc>,

    exchanges: Vec<Exchange>,
}

impl ChatSession {
    /// Start a new session against `index`
    pub fn new(index: impl Into<String>) -> Self {
        let started_at = Utc::now();
        Self {
            id: format!("chat-{}", started_at.format("%Y%m%d%H%M%S")),
            index: index.into(),
            started_at,
            exchanges: Vec::new(),
        }
    }

    /// Record an answered question
    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.exchanges.push(Exchange {
            question: question.into(),
            answer: answer.into(),
            index: self.index.clone(),
            asked_at: Utc::now(),
        });
    }

    /// Exchanges, most recent first
    pub fn history(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }
}
