//! HTML rendition of [`DashboardView`].

use std::fmt::{self, Write};

use crate::models::{Badge, BadgeTone, CardList, DashboardView, NetworkCard, UserCard};
use crate::utils::escape_html as esc;

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; background: #f9fafb; color: #111827; }
.page { max-width: 80rem; margin: 0 auto; padding: 2rem; }
.header { display: flex; align-items: center; justify-content: space-between; margin-bottom: 2rem; }
.header h1 { font-size: 1.875rem; font-weight: 700; margin: 0; }
.muted { color: #6b7280; font-size: 0.875rem; }
.stale { background: #fef3c7; color: #92400e; border-radius: 0.5rem; padding: 0.75rem 1rem; margin-bottom: 1.5rem; font-size: 0.875rem; }
.grid { display: grid; grid-template-columns: 1fr; gap: 2rem; }
@media (min-width: 1024px) { .grid { grid-template-columns: 1fr 1fr; } }
.column h2 { font-size: 1.25rem; font-weight: 600; margin: 0 0 1.5rem; }
.card { background: #fff; border: 1px solid #e5e7eb; border-radius: 0.5rem; box-shadow: 0 1px 2px rgba(0,0,0,0.05); padding: 1.5rem; margin-bottom: 1rem; }
.card.placeholder { text-align: center; color: #6b7280; }
.card-head { display: flex; align-items: center; justify-content: space-between; margin-bottom: 1rem; }
.card-head h3 { font-size: 1.125rem; font-weight: 600; margin: 0; }
.badge { padding: 0.25rem 0.75rem; border-radius: 9999px; font-size: 0.875rem; }
.badge.elevated { background: #fee2e2; color: #991b1b; }
.badge.normal { background: #fef9c3; color: #854d0e; }
.detail { color: #4b5563; font-size: 0.875rem; margin: 0.25rem 0; }
.tickets h4 { font-weight: 500; margin: 1rem 0 0.5rem; }
.ticket { color: #4b5563; font-size: 0.875rem; padding-left: 1rem; border-left: 2px solid #e5e7eb; margin-bottom: 0.5rem; }
"#;

pub fn render_page(view: &DashboardView) -> Result<String, fmt::Error> {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    writeln!(html, "<meta http-equiv=\"refresh\" content=\"{}\">", view.refresh_secs)?;
    writeln!(html, "<title>{}</title>", esc(&view.title))?;
    writeln!(html, "<style>{}</style>\n</head>\n<body>", STYLE)?;

    html.push_str("<div class=\"page\">\n<div class=\"header\">\n");
    writeln!(html, "<h1>{}</h1>", esc(&view.title))?;
    writeln!(html, "<div class=\"muted\">Updated: {}</div>\n</div>", esc(&view.updated_at))?;

    if let Some(notice) = &view.stale_notice {
        writeln!(html, "<div class=\"stale\" role=\"status\">{}</div>", esc(notice))?;
    }

    html.push_str("<div class=\"grid\">\n");
    push_column(&mut html, "network", &view.network.heading, &view.network.items, push_network_card)?;
    push_column(&mut html, "users", &view.users.heading, &view.users.items, push_user_card)?;
    html.push_str("</div>\n</div>\n</body>\n</html>\n");

    Ok(html)
}

fn push_column<T>(
    html: &mut String,
    id: &str,
    heading: &str,
    items: &CardList<T>,
    push_card: fn(&mut String, &T) -> fmt::Result,
) -> fmt::Result {
    writeln!(html, "<section class=\"column\" id=\"{}\">", id)?;
    writeln!(html, "<h2>{}</h2>", esc(heading))?;
    match items {
        CardList::Cards(cards) => {
            for card in cards {
                push_card(html, card)?;
            }
        }
        CardList::Placeholder(text) => {
            writeln!(html, "<div class=\"card placeholder\">{}</div>", esc(text))?;
        }
    }
    html.push_str("</section>\n");
    Ok(())
}

fn push_badge(html: &mut String, badge: &Badge) -> fmt::Result {
    let tone = match badge.tone {
        BadgeTone::Elevated => "elevated",
        BadgeTone::Normal => "normal",
    };
    writeln!(html, "<span class=\"badge {}\">{}</span>", tone, esc(&badge.label))
}

fn push_tickets(html: &mut String, heading: &str, summaries: &[String]) -> fmt::Result {
    writeln!(html, "<div class=\"tickets\">\n<h4>{}</h4>", heading)?;
    for summary in summaries {
        writeln!(html, "<div class=\"ticket\">{}</div>", esc(summary))?;
    }
    html.push_str("</div>\n");
    Ok(())
}

fn push_network_card(html: &mut String, card: &NetworkCard) -> fmt::Result {
    html.push_str("<div class=\"card network-card\">\n<div class=\"card-head\">\n<div>\n");
    writeln!(html, "<h3>{}</h3>", esc(&card.company))?;
    html.push_str("<p class=\"muted\">Network Issues Detected</p>\n</div>\n");
    push_badge(html, &card.badge)?;
    html.push_str("</div>\n");

    writeln!(
        html,
        "<p><strong>{}</strong> network-related tickets in the last 3 days</p>",
        card.ticket_count
    )?;
    writeln!(html, "<p class=\"detail\">First reported: {}</p>", esc(&card.first_reported))?;
    writeln!(html, "<p class=\"detail\">Most recent: {}</p>", esc(&card.most_recent))?;
    push_tickets(html, "Recent Tickets:", &card.recent_tickets)?;
    html.push_str("</div>\n");
    Ok(())
}

fn push_user_card(html: &mut String, card: &UserCard) -> fmt::Result {
    html.push_str("<div class=\"card user-card\">\n<div class=\"card-head\">\n<div>\n");
    writeln!(html, "<h3>{}</h3>", esc(&card.user))?;
    writeln!(html, "<p class=\"muted\">Repeated {} Issues</p>\n</div>", esc(&card.issue_type))?;
    push_badge(html, &card.badge)?;
    html.push_str("</div>\n");

    writeln!(
        html,
        "<p>Submitted <strong>{}</strong> tickets about <strong>{}</strong> in the last 3 days</p>",
        card.ticket_count,
        esc(&card.issue_type)
    )?;
    writeln!(html, "<p class=\"detail\">First ticket: {}</p>", esc(&card.first_ticket))?;
    writeln!(html, "<p class=\"detail\">Latest ticket: {}</p>", esc(&card.latest_ticket))?;
    push_tickets(html, "Ticket History:", &card.ticket_history)?;
    html.push_str("</div>\n");
    Ok(())
}
