use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: HabitKind,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HabitKind {
    Single,
    Multi { options: Vec<String> },
}

impl Habit {
    pub fn single(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: HabitKind::Single,
        }
    }

    pub fn multi(id: &str, name: &str, options: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: HabitKind::Multi {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self.kind, HabitKind::Multi { .. })
    }

    pub fn options(&self) -> &[String] {
        match &self.kind {
            HabitKind::Single => &[],
            HabitKind::Multi { options } => options,
        }
    }
}

/// Stored state of one habit on one date.
///
/// Persisted untagged so the stored JSON stays `true`/`false` for single
/// habits and a list of option labels for multi habits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CheckIn {
    Single(bool),
    Multi(Vec<String>),
}

pub type DayCheckIns = BTreeMap<String, CheckIn>;

/// Date key (`YYYY-MM-DD`) to habit id to check-in.
pub type CheckInRecord = BTreeMap<String, DayCheckIns>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub date: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Weekly,
    Monthly,
    Notes,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct WeeklyStats {
    pub rate: u32,
    pub perfect_days: u32,
    pub total_completed: u32,
}

#[derive(Debug, Serialize)]
pub struct HabitRow {
    pub habit_id: String,
    pub name: String,
    pub is_multi: bool,
    pub done: Vec<bool>,
    pub completed: u32,
}

#[derive(Debug, Serialize)]
pub struct WeekView {
    pub offset: i64,
    pub dates: Vec<String>,
    pub rows: Vec<HabitRow>,
    pub stats: WeeklyStats,
}

#[derive(Debug, Serialize)]
pub struct MonthView {
    pub offset: i64,
    pub year: i32,
    pub month: u32,
    pub days: Vec<String>,
    pub rows: Vec<HabitRow>,
}

#[derive(Debug, Serialize)]
pub struct TimerView {
    pub remaining_seconds: u32,
    pub display: String,
    pub running: bool,
    pub alarm_visible: bool,
    pub progress: f64,
}

#[derive(Debug, Serialize)]
pub struct InspirationView {
    pub visible: bool,
    pub loading: bool,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PickerOption {
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct PickerView {
    pub date: String,
    pub habit_id: String,
    pub habit_name: String,
    pub options: Vec<PickerOption>,
}

#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub tab: Tab,
    pub today: String,
    pub week: WeekView,
    pub month: MonthView,
    pub notes: Vec<Achievement>,
    pub timer: TimerView,
    pub inspiration: InspirationView,
    pub picker: Option<PickerView>,
}
