use crate::models::{CheckIn, CheckInRecord, Habit, HabitKind};

/// Whether a slot counts as done for the habit's declared kind.
///
/// A stored value of the other kind never counts.
pub fn is_completed(habit: &Habit, value: Option<&CheckIn>) -> bool {
    match (&habit.kind, value) {
        (HabitKind::Single, Some(CheckIn::Single(done))) => *done,
        (HabitKind::Multi { .. }, Some(CheckIn::Multi(options))) => !options.is_empty(),
        _ => false,
    }
}

pub fn slot<'a>(record: &'a CheckInRecord, date: &str, habit_id: &str) -> Option<&'a CheckIn> {
    record.get(date).and_then(|day| day.get(habit_id))
}

/// Flips a single habit's done flag. Absent or non-boolean values read as
/// not done before the flip. Returns the new flag.
pub fn toggle_habit(record: &mut CheckInRecord, date: &str, habit_id: &str) -> bool {
    let day = record.entry(date.to_string()).or_default();
    let done = !matches!(day.get(habit_id), Some(CheckIn::Single(true)));
    day.insert(habit_id.to_string(), CheckIn::Single(done));
    done
}

/// Adds `option` to the slot's selection if absent, removes it otherwise.
/// Other selected options keep their order. Returns whether the option is
/// now selected.
pub fn toggle_option(record: &mut CheckInRecord, date: &str, habit_id: &str, option: &str) -> bool {
    let day = record.entry(date.to_string()).or_default();
    let mut selected = match day.remove(habit_id) {
        Some(CheckIn::Multi(options)) => options,
        _ => Vec::new(),
    };

    let now_selected = match selected.iter().position(|o| o == option) {
        Some(index) => {
            selected.remove(index);
            false
        }
        None => {
            selected.push(option.to_string());
            true
        }
    };

    day.insert(habit_id.to_string(), CheckIn::Multi(selected));
    now_selected
}

pub fn selected_options<'a>(record: &'a CheckInRecord, date: &str, habit_id: &str) -> &'a [String] {
    match slot(record, date, habit_id) {
        Some(CheckIn::Multi(options)) => options,
        _ => &[],
    }
}
