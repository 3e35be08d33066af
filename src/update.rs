//! Application state and the reducer that drives it.
//!
//! Every change goes through [`update`]: user actions, timer ticks and
//! settled inspiration fetches all arrive as [`Event`]s. The reducer only
//! mutates the model and reports [`Effect`]s; running them is the
//! runtime's job (see `state.rs`).

use crate::checkin::{self, toggle_habit, toggle_option};
use crate::models::{Achievement, CheckInRecord, Habit, Tab};
use crate::notes::{add_note, delete_note};
use crate::stats::{activity_summary, parse_date_key};
use crate::timer::{FocusTimer, TickOutcome};
use chrono::{DateTime, Local};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SelectTab { tab: Tab },
    ShiftWeek { delta: i64 },
    ShiftMonth { delta: i64 },
    ResetWeek,
    ResetMonth,
    ToggleHabit { date: String, habit_id: String },
    OpenOptions { date: String, habit_id: String },
    CloseOptions,
    ToggleOption { date: String, habit_id: String, option: String },
    AddNote { title: String },
    DeleteNote { id: String },
    TimerPressed,
    DismissAlarm,
    RequestInspiration,
    DismissInspiration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    User(Action),
    Tick { run: u64 },
    InspirationSettled { text: String },
}

impl From<Action> for Event {
    fn from(action: Action) -> Self {
        Event::User(action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SaveCheckIns,
    SaveNotes,
    StartTicker { run: u64 },
    StopTicker,
    PlayAlert,
    FetchInspiration { summary: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionPicker {
    pub date: String,
    pub habit_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspirationPanel {
    pub visible: bool,
    pub loading: bool,
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppModel {
    pub habits: Vec<Habit>,
    pub tab: Tab,
    pub week_offset: i64,
    pub month_offset: i64,
    pub check_ins: CheckInRecord,
    pub notes: Vec<Achievement>,
    pub timer: FocusTimer,
    pub inspiration: InspirationPanel,
    pub picker: Option<OptionPicker>,
}

impl AppModel {
    pub fn new(habits: Vec<Habit>, check_ins: CheckInRecord, notes: Vec<Achievement>) -> Self {
        Self {
            habits,
            tab: Tab::default(),
            week_offset: 0,
            month_offset: 0,
            check_ins,
            notes,
            timer: FocusTimer::default(),
            inspiration: InspirationPanel::default(),
            picker: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("unknown habit '{0}'")]
    UnknownHabit(String),
    #[error("date must be YYYY-MM-DD, got '{0}'")]
    InvalidDate(String),
    #[error("habit '{0}' has no options")]
    NotMultiHabit(String),
    #[error("habit '{0}' is tracked by options")]
    NotSingleHabit(String),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
}

/// Checks a check-in action against the habit configuration. Other actions
/// always pass.
pub fn validate(habits: &[Habit], action: &Action) -> Result<(), Rejection> {
    let (date, habit_id, wants_multi, option) = match action {
        Action::ToggleHabit { date, habit_id } => (date, habit_id, false, None),
        Action::OpenOptions { date, habit_id } => (date, habit_id, true, None),
        Action::ToggleOption {
            date,
            habit_id,
            option,
        } => (date, habit_id, true, Some(option)),
        _ => return Ok(()),
    };

    if parse_date_key(date).is_none() {
        return Err(Rejection::InvalidDate(date.clone()));
    }
    let habit = crate::habits::find(habits, habit_id).ok_or_else(|| Rejection::UnknownHabit(habit_id.clone()))?;
    match (wants_multi, habit.is_multi()) {
        (true, false) => return Err(Rejection::NotMultiHabit(habit_id.clone())),
        (false, true) => return Err(Rejection::NotSingleHabit(habit_id.clone())),
        _ => {}
    }
    if let Some(option) = option {
        if !habit.options().iter().any(|o| o == option) {
            return Err(Rejection::UnknownOption(option.clone()));
        }
    }
    Ok(())
}

pub fn update(model: &mut AppModel, event: Event, now: DateTime<Local>) -> Vec<Effect> {
    match event {
        Event::User(action) => apply_action(model, action, now),
        Event::Tick { run } => match model.timer.tick(run) {
            TickOutcome::Expired => vec![Effect::StopTicker, Effect::PlayAlert],
            TickOutcome::Counted | TickOutcome::Ignored => Vec::new(),
        },
        Event::InspirationSettled { text } => {
            model.inspiration.loading = false;
            if model.inspiration.visible {
                model.inspiration.text = Some(text);
            }
            Vec::new()
        }
    }
}

fn apply_action(model: &mut AppModel, action: Action, now: DateTime<Local>) -> Vec<Effect> {
    if validate(&model.habits, &action).is_err() {
        return Vec::new();
    }

    match action {
        Action::SelectTab { tab } => {
            model.tab = tab;
            Vec::new()
        }
        Action::ShiftWeek { delta } => {
            model.week_offset = model.week_offset.saturating_add(delta);
            Vec::new()
        }
        Action::ShiftMonth { delta } => {
            model.month_offset = model.month_offset.saturating_add(delta);
            Vec::new()
        }
        Action::ResetWeek => {
            model.week_offset = 0;
            Vec::new()
        }
        Action::ResetMonth => {
            model.month_offset = 0;
            Vec::new()
        }
        Action::ToggleHabit { date, habit_id } => {
            toggle_habit(&mut model.check_ins, &date, &habit_id);
            vec![Effect::SaveCheckIns]
        }
        Action::OpenOptions { date, habit_id } => {
            model.picker = Some(OptionPicker { date, habit_id });
            Vec::new()
        }
        Action::CloseOptions => {
            model.picker = None;
            Vec::new()
        }
        Action::ToggleOption {
            date,
            habit_id,
            option,
        } => {
            toggle_option(&mut model.check_ins, &date, &habit_id, &option);
            vec![Effect::SaveCheckIns]
        }
        Action::AddNote { title } => match add_note(&mut model.notes, &title, &now) {
            Some(_) => vec![Effect::SaveNotes],
            None => Vec::new(),
        },
        Action::DeleteNote { id } => {
            if delete_note(&mut model.notes, &id) {
                vec![Effect::SaveNotes]
            } else {
                Vec::new()
            }
        }
        Action::TimerPressed => {
            if model.timer.stop() {
                vec![Effect::StopTicker]
            } else if let Some(run) = model.timer.start() {
                vec![Effect::StartTicker { run }]
            } else {
                Vec::new()
            }
        }
        Action::DismissAlarm => {
            model.timer.acknowledge();
            Vec::new()
        }
        Action::RequestInspiration => {
            model.inspiration.visible = true;
            model.inspiration.loading = true;
            model.inspiration.text = None;
            let summary = activity_summary(&model.habits, now.date_naive(), &model.check_ins);
            vec![Effect::FetchInspiration { summary }]
        }
        Action::DismissInspiration => {
            model.inspiration.visible = false;
            Vec::new()
        }
    }
}

/// Selected options for the open picker, if any.
pub fn picker_selection<'a>(model: &'a AppModel) -> Option<(&'a OptionPicker, &'a [String])> {
    model.picker.as_ref().map(|picker| {
        (
            picker,
            checkin::selected_options(&model.check_ins, &picker.date, &picker.habit_id),
        )
    })
}
