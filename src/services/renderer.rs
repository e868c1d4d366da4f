use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, TimeZone};

use crate::models::{
    Badge, BadgeTone, CardList, Column, DashboardSettings, DashboardSnapshot, DashboardView,
    NetworkCard, NetworkPattern, UserCard, UserPattern,
};

pub const DASHBOARD_TITLE: &str = "Pattern Detection Dashboard";
pub const NETWORK_HEADING: &str = "Company Network Issues";
pub const USER_HEADING: &str = "Repeated User Issues";
pub const NO_NETWORK_ISSUES: &str = "No network issues detected";
pub const NO_USER_PATTERNS: &str = "No user patterns detected";

const MAX_RECENT_TICKETS: usize = 3;
const USER_ELEVATED_THRESHOLD: u32 = 3;
const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub show_stale_indicator: bool,
    pub refresh_secs: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        DashboardSettings::default().into()
    }
}

impl From<&DashboardSettings> for RenderOptions {
    fn from(settings: &DashboardSettings) -> Self {
        Self {
            show_stale_indicator: settings.show_stale_indicator,
            refresh_secs: settings.refresh_interval_secs,
        }
    }
}

impl From<DashboardSettings> for RenderOptions {
    fn from(settings: DashboardSettings) -> Self {
        (&settings).into()
    }
}

/// Build the view for `snapshot`. Timestamps are shown in `rendered_at`'s zone.
pub fn render_dashboard<Tz>(
    snapshot: &DashboardSnapshot,
    rendered_at: &DateTime<Tz>,
    options: &RenderOptions,
) -> DashboardView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tz = rendered_at.timezone();
    let patterns = &snapshot.patterns;

    let network_cards = patterns
        .company_network_patterns
        .iter()
        .map(|p| network_card(p, &tz))
        .collect();
    let user_cards = patterns
        .user_repeat_patterns
        .iter()
        .map(|p| user_card(p, &tz))
        .collect();

    DashboardView {
        title: DASHBOARD_TITLE.to_string(),
        updated_at: rendered_at.format(DISPLAY_FORMAT).to_string(),
        stale_notice: stale_notice(snapshot, &tz, options),
        network: Column {
            heading: NETWORK_HEADING.to_string(),
            items: CardList::from_cards(network_cards, NO_NETWORK_ISSUES),
        },
        users: Column {
            heading: USER_HEADING.to_string(),
            items: CardList::from_cards(user_cards, NO_USER_PATTERNS),
        },
        refresh_secs: options.refresh_secs,
    }
}

fn network_card<Tz>(pattern: &NetworkPattern, tz: &Tz) -> NetworkCard
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tone = if pattern.alert_level.is_high() {
        BadgeTone::Elevated
    } else {
        BadgeTone::Normal
    };

    NetworkCard {
        company: pattern.company.clone(),
        badge: Badge {
            label: pattern.alert_level.label(),
            tone,
        },
        ticket_count: pattern.ticket_count,
        first_reported: format_timestamp(&pattern.first_occurrence, tz),
        most_recent: format_timestamp(&pattern.last_occurrence, tz),
        recent_tickets: pattern
            .tickets
            .iter()
            .take(MAX_RECENT_TICKETS)
            .map(|t| t.summary.clone())
            .collect(),
    }
}

fn user_card<Tz>(pattern: &UserPattern, tz: &Tz) -> UserCard
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tone = if pattern.ticket_count >= USER_ELEVATED_THRESHOLD {
        BadgeTone::Elevated
    } else {
        BadgeTone::Normal
    };

    UserCard {
        user: pattern.user.clone(),
        issue_type: pattern.issue_type.clone(),
        badge: Badge {
            label: format!("{} Tickets", pattern.ticket_count),
            tone,
        },
        ticket_count: pattern.ticket_count,
        first_ticket: format_timestamp(&pattern.first_occurrence, tz),
        latest_ticket: format_timestamp(&pattern.last_occurrence, tz),
        ticket_history: pattern.tickets.iter().map(|t| t.summary.clone()).collect(),
    }
}

fn stale_notice<Tz>(snapshot: &DashboardSnapshot, tz: &Tz, options: &RenderOptions) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let status = &snapshot.status;
    if !options.show_stale_indicator || !status.is_stale() {
        return None;
    }

    let attempts = match status.consecutive_failures {
        1 => "the last refresh".to_string(),
        n => format!("the last {} refreshes", n),
    };
    Some(match status.last_success {
        Some(at) => format!(
            "Data may be stale: {} failed. Showing data from {}.",
            attempts,
            at.with_timezone(tz).format(DISPLAY_FORMAT)
        ),
        None => format!(
            "Data may be stale: {} failed and no pattern data has been loaded yet.",
            attempts
        ),
    })
}

/// Format a backend timestamp for display.
///
/// RFC 3339 values are converted into `tz`; values without an offset are
/// taken as wall-clock time in `tz`. Anything unparseable is shown as sent.
pub fn format_timestamp<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string();
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            if let Some(local) = tz.from_local_datetime(&naive).earliest() {
                return local.format(DISPLAY_FORMAT).to_string();
            }
        }
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertLevel, PatternSet, PollStatus, Ticket};
    use chrono::{FixedOffset, Utc};
    use std::sync::Arc;

    fn render_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 3, 12, 30, 0).unwrap()
    }

    fn network(company: &str, level: &str, summaries: &[&str]) -> NetworkPattern {
        NetworkPattern {
            company: company.to_string(),
            alert_level: AlertLevel::from(level),
            ticket_count: summaries.len() as u32,
            first_occurrence: "2024-01-01T00:00:00Z".to_string(),
            last_occurrence: "2024-01-03T00:00:00Z".to_string(),
            tickets: summaries.iter().map(|s| Ticket::new(*s)).collect(),
        }
    }

    fn user(name: &str, ticket_count: u32, summaries: &[&str]) -> UserPattern {
        UserPattern {
            user: name.to_string(),
            issue_type: "Printer".to_string(),
            ticket_count,
            first_occurrence: "2024-01-01T08:00:00Z".to_string(),
            last_occurrence: "2024-01-02T17:45:00Z".to_string(),
            tickets: summaries.iter().map(|s| Ticket::new(*s)).collect(),
        }
    }

    fn snapshot_of(patterns: PatternSet) -> DashboardSnapshot {
        DashboardSnapshot {
            patterns: Arc::new(patterns),
            status: PollStatus::default(),
        }
    }

    fn render(snapshot: &DashboardSnapshot) -> DashboardView {
        render_dashboard(snapshot, &render_time(), &RenderOptions::default())
    }

    #[test]
    fn initial_state_shows_both_placeholders() {
        let view = render(&DashboardSnapshot::default());

        assert_eq!(view.title, DASHBOARD_TITLE);
        assert_eq!(view.network.heading, NETWORK_HEADING);
        assert_eq!(view.users.heading, USER_HEADING);
        assert_eq!(view.network.items.placeholder(), Some(NO_NETWORK_ISSUES));
        assert_eq!(view.users.items.placeholder(), Some(NO_USER_PATTERNS));
        assert!(view.stale_notice.is_none());
    }

    #[test]
    fn one_card_per_record() {
        let snapshot = snapshot_of(PatternSet {
            company_network_patterns: vec![
                network("Acme", "high", &["A"]),
                network("Globex", "medium", &["B"]),
            ],
            user_repeat_patterns: vec![
                user("jdoe", 3, &["x"]),
                user("asmith", 2, &["y"]),
                user("bwayne", 4, &["z"]),
            ],
        });

        let view = render(&snapshot);

        assert_eq!(view.network.items.cards().len(), 2);
        assert_eq!(view.users.items.cards().len(), 3);
        assert!(view.network.items.placeholder().is_none());
        assert!(view.users.items.placeholder().is_none());
    }

    #[test]
    fn example_scenario_after_first_fetch() {
        let mut acme = network("Acme", "high", &["A", "B", "C", "D"]);
        acme.ticket_count = 5;
        let snapshot = snapshot_of(PatternSet {
            company_network_patterns: vec![acme],
            user_repeat_patterns: vec![],
        });

        let view = render(&snapshot);

        let cards = view.network.items.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].company, "Acme");
        assert_eq!(cards[0].badge.label, "HIGH");
        assert_eq!(cards[0].badge.tone, BadgeTone::Elevated);
        assert_eq!(cards[0].ticket_count, 5);
        assert_eq!(cards[0].recent_tickets, vec!["A", "B", "C"]);
        assert_eq!(view.users.items.placeholder(), Some(NO_USER_PATTERNS));
    }

    #[test]
    fn non_high_level_uses_normal_badge() {
        let snapshot = snapshot_of(PatternSet {
            company_network_patterns: vec![network("Globex", "medium", &[])],
            user_repeat_patterns: vec![],
        });

        let view = render(&snapshot);
        let badge = &view.network.items.cards()[0].badge;
        assert_eq!(badge.label, "MEDIUM");
        assert_eq!(badge.tone, BadgeTone::Normal);
    }

    #[test]
    fn user_badge_threshold_is_three() {
        let snapshot = snapshot_of(PatternSet {
            company_network_patterns: vec![],
            user_repeat_patterns: vec![user("jdoe", 3, &[]), user("asmith", 2, &[])],
        });

        let view = render(&snapshot);
        let cards = view.users.items.cards();
        assert_eq!(cards[0].badge.tone, BadgeTone::Elevated);
        assert_eq!(cards[0].badge.label, "3 Tickets");
        assert_eq!(cards[1].badge.tone, BadgeTone::Normal);
        assert_eq!(cards[1].badge.label, "2 Tickets");
    }

    #[test]
    fn user_cards_show_every_ticket_in_order() {
        let summaries = ["one", "two", "three", "four", "five"];
        let snapshot = snapshot_of(PatternSet {
            company_network_patterns: vec![],
            user_repeat_patterns: vec![user("jdoe", 5, &summaries)],
        });

        let view = render(&snapshot);
        assert_eq!(view.users.items.cards()[0].ticket_history, summaries);
    }

    #[test]
    fn identical_payloads_render_identically() {
        let patterns = PatternSet {
            company_network_patterns: vec![network("Acme", "high", &["A", "B"])],
            user_repeat_patterns: vec![user("jdoe", 4, &["x"])],
        };
        let first = render(&snapshot_of(patterns.clone()));
        let second = render(&snapshot_of(patterns));

        assert_eq!(first, second);
    }

    #[test]
    fn updated_label_tracks_render_time() {
        let snapshot = DashboardSnapshot::default();
        let later = render_time() + chrono::Duration::minutes(5);

        let a = render_dashboard(&snapshot, &render_time(), &RenderOptions::default());
        let b = render_dashboard(&snapshot, &later, &RenderOptions::default());

        assert_eq!(a.updated_at, "1/3/2024, 12:30:00 PM");
        assert_eq!(b.updated_at, "1/3/2024, 12:35:00 PM");
        assert_eq!(a.network, b.network);
    }

    #[test]
    fn stale_notice_after_failed_cycle() {
        let mut snapshot = DashboardSnapshot::default();
        snapshot.status.consecutive_failures = 2;
        snapshot.status.last_success = Some(Utc.with_ymd_and_hms(2024, 1, 3, 11, 0, 0).unwrap());

        let view = render(&snapshot);
        assert_eq!(
            view.stale_notice.as_deref(),
            Some("Data may be stale: the last 2 refreshes failed. Showing data from 1/3/2024, 11:00:00 AM.")
        );

        let quiet = render_dashboard(
            &snapshot,
            &render_time(),
            &RenderOptions {
                show_stale_indicator: false,
                refresh_secs: 300,
            },
        );
        assert!(quiet.stale_notice.is_none());
    }

    #[test]
    fn stale_notice_before_any_success() {
        let mut snapshot = DashboardSnapshot::default();
        snapshot.status.consecutive_failures = 1;

        let notice = render(&snapshot).stale_notice.unwrap();
        assert!(notice.contains("the last refresh failed"));
        assert!(notice.contains("no pattern data has been loaded yet"));
    }

    #[test]
    fn timestamps_follow_render_zone() {
        let utc = format_timestamp("2024-01-01T00:00:00Z", &Utc);
        assert_eq!(utc, "1/1/2024, 12:00:00 AM");

        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let shifted = format_timestamp("2024-01-01T00:00:00Z", &minus_five);
        assert_eq!(shifted, "12/31/2023, 7:00:00 PM");
    }

    #[test]
    fn naive_timestamps_are_wall_clock() {
        assert_eq!(
            format_timestamp("2024-01-02T15:04:05.123456", &Utc),
            "1/2/2024, 3:04:05 PM"
        );
        assert_eq!(
            format_timestamp("2024-01-02 09:00:00", &Utc),
            "1/2/2024, 9:00:00 AM"
        );
    }

    #[test]
    fn unparseable_timestamp_is_passed_through() {
        assert_eq!(format_timestamp("yesterday-ish", &Utc), "yesterday-ish");
    }
}
