use crate::models::Achievement;
use chrono::{DateTime, Datelike, TimeZone};

/// Prepends a new achievement. Blank titles are ignored and return `None`.
pub fn add_note<Tz: TimeZone>(
    notes: &mut Vec<Achievement>,
    title: &str,
    now: &DateTime<Tz>,
) -> Option<Achievement> {
    if title.trim().is_empty() {
        return None;
    }

    let timestamp = now.timestamp_millis();
    let note = Achievement {
        id: unique_id(notes, timestamp),
        title: title.to_string(),
        date: display_date(now),
        timestamp,
    };
    notes.insert(0, note.clone());
    Some(note)
}

/// Removes the note with `id`. Returns whether anything was removed.
pub fn delete_note(notes: &mut Vec<Achievement>, id: &str) -> bool {
    let before = notes.len();
    notes.retain(|note| note.id != id);
    notes.len() != before
}

pub fn display_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format!("{}月{}日", now.month(), now.day())
}

// Ids are the creation millisecond; bumped when two notes land in the same one.
fn unique_id(notes: &[Achievement], timestamp: i64) -> String {
    let mut candidate = timestamp;
    while notes.iter().any(|note| note.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}
