//! Terminal rendering for eventlog types.

use eventlog_client::{Notification, Notifier, Severity};
use eventlog_core::event::{Event, EventDetail};
use eventlog_core::protocol::to_iso_string;
use eventlog_core::success::Success;
use eventlog_core::validation::Violations;
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Success {
    fn render(&self) -> String {
        match self {
            Success::True => "success".green().to_string(),
            Success::False => "failure".red().to_string(),
            Success::Unknown => "not recorded".dimmed().to_string(),
        }
    }
}

impl Render for Violations {
    fn render(&self) -> String {
        self.iter()
            .map(|v| format!("  {} {}", format!("{}:", v.path).bold(), v.message.red()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut lines = vec![format!("{} {}", self.title.bold(), format!("#{}", self.id).dimmed())];

        let when = match self.end_date_time {
            Some(end) => format!("{} → {}", to_iso_string(&self.start_date_time), to_iso_string(&end)),
            None => to_iso_string(&self.start_date_time),
        };
        lines.push(format!("  When:     {when}"));

        let optional = [
            ("Where:   ", &self.place),
            ("URL:     ", &self.url),
            ("Members: ", &self.member),
            ("Memo:    ", &self.memo),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                lines.push(format!("  {label} {value}"));
            }
        }

        lines.push(format!("  Outcome:  {}", self.success.render()));

        if let Some(diary) = &self.diary {
            lines.push(String::new());
            lines.extend(diary.lines().map(|l| format!("  {l}")));
        }

        lines.join("\n")
    }
}

impl Render for EventDetail {
    fn render(&self) -> String {
        let mut out = self.event.render();
        if !self.event_photos.is_empty() {
            out.push_str(&format!("\n\n  {}", "Photos".bold()));
            for photo in &self.event_photos {
                out.push_str(&format!(
                    "\n    {} {}",
                    photo.original_file_name,
                    format!("({})", photo.file_key).dimmed()
                ));
            }
        }
        out
    }
}

/// Prints notifications as coloured lines.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => println!("  {}", notification.text.green()),
            Severity::Error => eprintln!("  {}", notification.text.red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use eventlog_core::event::{EventPhoto, RecordId};
    use eventlog_core::form::{EventForm, TITLE_REQUIRED};

    fn event() -> Event {
        Event {
            id: RecordId::new("3"),
            title: "Trip".to_string(),
            start_date_time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            end_date_time: None,
            place: Some("Kyoto".to_string()),
            url: None,
            member: None,
            memo: None,
            diary: Some("day one\nday two".to_string()),
            success: Success::True,
        }
    }

    #[test]
    fn test_event_lists_only_present_fields() {
        let out = event().render();
        assert!(out.contains("Trip"));
        assert!(out.contains("2024-01-01T09:00:00.000Z"));
        assert!(out.contains("Kyoto"));
        assert!(!out.contains("URL:"));
        assert!(out.contains("  day two"));
    }

    #[test]
    fn test_detail_lists_photos() {
        let detail = EventDetail {
            event: event(),
            event_photos: vec![EventPhoto {
                id: RecordId::new("1"),
                file_key: "uploads/k1".to_string(),
                original_file_name: "summit.jpg".to_string(),
            }],
        };
        let out = detail.render();
        assert!(out.contains("summit.jpg"));
        assert!(out.contains("uploads/k1"));
    }

    #[test]
    fn test_violations_one_line_per_field() {
        let form = EventForm::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let out = form.validate().unwrap_err().render();
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("title:"));
        assert!(out.contains(TITLE_REQUIRED));
    }
}
