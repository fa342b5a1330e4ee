//! Chronological activity feed from the event store

use chrono_tz::Tz;
use std::fmt::Write;

use crate::db::StoredEvent;

/// Characters of a payload id shown in the feed
const SHORT_ID_LEN: usize = 7;

/// Render events (oldest first) grouped under one `## MM/DD/YYYY` heading per local day
pub fn render_activity_feed(events: &[StoredEvent], timezone: Tz) -> String {
    let mut md = String::new();
    let mut current_day: Option<String> = None;

    for event in events {
        let local = event.created_at.with_timezone(&timezone);
        let day = local.format("%m/%d/%Y").to_string();
        if current_day.as_deref() != Some(day.as_str()) {
            let _ = write!(md, "\n## {}\n\n", day);
            current_day = Some(day);
        }

        let mut summary: Vec<String> = Vec::new();
        if let Some(action) = event.action.as_deref().filter(|a| !a.is_empty()) {
            summary.push(action.to_string());
        }
        summary.push(event.event.clone());
        if let Some(link) = payload_link(event) {
            summary.push(link);
        }

        let _ = writeln!(md, "- **{}** {}", local.format("%I:%M%p"), event.display_name);
        let _ = writeln!(md, "  - :wrench: {} (:memo:{})", summary.join(" "), event.repo);
        let _ = writeln!(
            md,
            "  - :page_facing_up: {}",
            event.title.as_deref().unwrap_or_default()
        );
    }

    md
}

/// Shortened payload id linked to the event url
fn payload_link(event: &StoredEvent) -> Option<String> {
    let id = event.payload_id.as_deref().filter(|id| !id.is_empty())?;
    let short: String = id.chars().take(SHORT_ID_LEN).collect();
    Some(format!(
        "[{}]({})",
        short,
        event.url.as_deref().unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn stored(hour: u32, day: u32, payload_id: Option<&str>, action: Option<&str>) -> StoredEvent {
        StoredEvent {
            event_id: 1,
            user_id: 1,
            display_name: "Mona Lisa".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, day, hour, 5, 0).unwrap(),
            source: "GitHub".to_string(),
            source_id: "e1".to_string(),
            repo: "api".to_string(),
            event: "Push".to_string(),
            payload_id: payload_id.map(str::to_string),
            action: action.map(str::to_string),
            url: Some("https://github.com/acme/api/commits/abc1234def".to_string()),
            title: Some("refs/heads/main: Fix login".to_string()),
        }
    }

    #[test]
    fn test_feed_in_utc() {
        let md = render_activity_feed(&[stored(14, 2, Some("abc1234def"), None)], Tz::UTC);
        assert_eq!(
            md,
            "\n## 05/02/2024\n\n\
             - **02:05PM** Mona Lisa\n\
             \x20 - :wrench: Push [abc1234](https://github.com/acme/api/commits/abc1234def) (:memo:api)\n\
             \x20 - :page_facing_up: refs/heads/main: Fix login\n"
        );
    }

    #[test]
    fn test_days_follow_timezone() {
        // 03:05 UTC on the 3rd is still the 2nd in Los Angeles
        let events = [
            stored(20, 2, None, Some("Opened")),
            stored(3, 3, None, Some("Closed")),
            stored(16, 3, None, None),
        ];
        let md = render_activity_feed(&events, chrono_tz::America::Los_Angeles);

        let headings: Vec<&str> = md.lines().filter(|l| l.starts_with("## ")).collect();
        assert_eq!(headings, vec!["## 05/02/2024", "## 05/03/2024"]);
        assert!(md.contains("- **08:05PM** Mona Lisa"));
        assert!(md.contains(":wrench: Closed Push (:memo:api)"));
    }
}
