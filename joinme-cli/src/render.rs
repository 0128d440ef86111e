//! Terminal rendering for JoinMe types.

use chrono::{DateTime, Local, Utc};
use joinme_core::{Event, EventLifecycle, Group, Visibility};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventLifecycle {
    fn render(&self) -> String {
        let label = format!("{:<8}", self.to_string());
        match self {
            EventLifecycle::Upcoming => label.green().to_string(),
            EventLifecycle::Ongoing => label.yellow().to_string(),
            EventLifecycle::Expired => label.dimmed().to_string(),
        }
    }
}

impl Render for Group {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            self.name.bold(),
            format!("({} {})", self.member_ids.len(), pluralize("member", self.member_ids.len()))
                .dimmed(),
            format!("[{}]", self.id).dimmed()
        )
    }
}

/// One line per event, tagged with its state at `now`.
pub fn render_event_line(event: &Event, now: DateTime<Utc>) -> String {
    let seats = format!("{}/{}", event.participants.len(), event.max_participants);
    let lock = match event.visibility {
        Visibility::Public => "",
        Visibility::Private => " (private)",
    };

    format!(
        "  {} {} {}{} {} {}",
        event.lifecycle(now).render(),
        format_start(event.date),
        event.title,
        lock,
        seats.dimmed(),
        format!("[{}]", event.id).dimmed()
    )
}

pub fn render_event_details(event: &Event, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", event.title.bold(), event.lifecycle(now).render()),
        format!("  {:?} event, {} minutes", event.event_type, event.duration),
        format!("  Starts {}", format_start(event.date)),
    ];

    if let Some(location) = &event.location {
        lines.push(format!(
            "  At {} ({:.5}, {:.5})",
            location.name, location.latitude, location.longitude
        ));
    }
    if !event.description.is_empty() {
        lines.push(format!("  {}", event.description));
    }

    lines.push(format!(
        "  {} of {} spots taken{}",
        event.participants.len(),
        event.max_participants,
        if event.is_full() { " (full)" } else { "" }
    ));
    lines
}

fn format_start(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%a %b %-d %H:%M").to_string()
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
