//! HTML message body for the chat API (`parse_mode: "HTML"`).

use chrono::{DateTime, Utc};

use crate::event::NotificationEvent;

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Icon for a status wire name, `📋` for anything unknown.
#[must_use]
pub fn status_icon(status: &str) -> &'static str {
    match status {
        "uncategorized" => "🔍",
        "pending" => "⏳",
        "in-progress" => "🔄",
        "completed" => "✅",
        _ => "📋",
    }
}

/// Build the message text for `event`, stamped with `at`.
#[must_use]
pub fn format_message(event: &NotificationEvent, at: DateTime<Utc>) -> String {
    let mut lines = vec![
        format!(
            "{} <b>Request updated</b>",
            status_icon(event.status.as_str())
        ),
        String::new(),
        format!("<b>Protocol:</b> {}", escape_html(&event.protocol)),
        format!("<b>Title:</b> {}", escape_html(&event.title)),
        format!("<b>Status:</b> {}", event.status.label()),
        format!("<b>Action:</b> {}", event.action),
    ];
    if let Some(actor) = event.actor.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("<b>By:</b> {}", escape_html(actor)));
    }
    lines.push(String::new());
    lines.push(format!(
        "<i>Kanban board - {} UTC</i>",
        at.format(TIMESTAMP_FORMAT)
    ));
    lines.join("\n")
}

/// Escape the characters the chat API's HTML mode treats as markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NotifyAction;
    use chrono::TimeZone;
    use kb_core::enums::RequestStatus;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn event(actor: Option<&str>) -> NotificationEvent {
        NotificationEvent {
            protocol: "2025000042".into(),
            title: "Printer <3rd floor> & scanner".into(),
            status: RequestStatus::InProgress,
            actor: actor.map(str::to_string),
            action: NotifyAction::StatusChanged,
        }
    }

    #[test]
    fn full_message_layout() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap();
        let text = format_message(&event(Some("Maria")), at);
        assert_eq!(
            text,
            "🔄 <b>Request updated</b>\n\
             \n\
             <b>Protocol:</b> 2025000042\n\
             <b>Title:</b> Printer &lt;3rd floor&gt; &amp; scanner\n\
             <b>Status:</b> IN PROGRESS\n\
             <b>Action:</b> status changed\n\
             <b>By:</b> Maria\n\
             \n\
             <i>Kanban board - 07/03/2025 14:05:09 UTC</i>"
        );
    }

    #[test]
    fn actor_line_omitted_when_absent() {
        let text = format_message(&event(None), Utc::now());
        assert!(!text.contains("<b>By:</b>"));
    }

    #[rstest]
    #[case("uncategorized", "🔍")]
    #[case("pending", "⏳")]
    #[case("in-progress", "🔄")]
    #[case("completed", "✅")]
    #[case("archived", "📋")]
    fn icons_per_status(#[case] status: &str, #[case] icon: &str) {
        assert_eq!(status_icon(status), icon);
    }
}
