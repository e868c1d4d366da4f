use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PatternSet;

/// Bookkeeping of fetch cycles, published alongside the patterns.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PollStatus {
    pub cycles: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

impl PollStatus {
    pub fn is_stale(&self) -> bool {
        self.consecutive_failures > 0
    }
}

/// What the renderer sees: the latest pattern set plus poll status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub patterns: Arc<PatternSet>,
    pub status: PollStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Elevated,
    Normal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkCard {
    pub company: String,
    pub badge: Badge,
    pub ticket_count: u32,
    pub first_reported: String,
    pub most_recent: String,
    pub recent_tickets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserCard {
    pub user: String,
    pub issue_type: String,
    pub badge: Badge,
    pub ticket_count: u32,
    pub first_ticket: String,
    pub latest_ticket: String,
    pub ticket_history: Vec<String>,
}

/// A column is either its cards or the single empty-state placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum CardList<T> {
    Cards(Vec<T>),
    Placeholder(String),
}

impl<T> CardList<T> {
    pub fn from_cards(cards: Vec<T>, placeholder: &str) -> Self {
        if cards.is_empty() {
            CardList::Placeholder(placeholder.to_string())
        } else {
            CardList::Cards(cards)
        }
    }

    pub fn cards(&self) -> &[T] {
        match self {
            CardList::Cards(cards) => cards.as_slice(),
            CardList::Placeholder(_) => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            CardList::Cards(_) => None,
            CardList::Placeholder(text) => Some(text.as_str()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column<T> {
    pub heading: String,
    pub items: CardList<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub updated_at: String,
    pub stale_notice: Option<String>,
    pub network: Column<NetworkCard>,
    pub users: Column<UserCard>,
    pub refresh_secs: u64,
}
