use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root payload of `GET /api/patterns`.
///
/// Both lists are required on the wire; the default value is the
/// "nothing fetched yet" state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PatternSet {
    pub company_network_patterns: Vec<NetworkPattern>,
    pub user_repeat_patterns: Vec<UserPattern>,
}

impl PatternSet {
    pub fn is_empty(&self) -> bool {
        self.company_network_patterns.is_empty() && self.user_repeat_patterns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkPattern {
    pub company: String,
    pub alert_level: AlertLevel,
    pub ticket_count: u32,
    pub first_occurrence: String,
    pub last_occurrence: String,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPattern {
    pub user: String,
    pub issue_type: String,
    pub ticket_count: u32,
    pub first_occurrence: String,
    pub last_occurrence: String,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub summary: String,
    // Everything else the backend sends (id, dateEntered, board, ...) rides along untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ticket {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            extra: Map::new(),
        }
    }
}

/// Severity string reported by the backend ("high", "medium", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertLevel(pub String);

impl AlertLevel {
    pub fn is_high(&self) -> bool {
        self.0.trim().eq_ignore_ascii_case("high")
    }

    pub fn label(&self) -> String {
        self.0.trim().to_uppercase()
    }
}

impl From<&str> for AlertLevel {
    fn from(level: &str) -> Self {
        Self(level.to_string())
    }
}
