use crate::habits;
use crate::models::{
    InspirationView, MonthView, PickerOption, PickerView, Snapshot, TimerView, WeekView,
    WeeklyStats,
};
use crate::stats::{date_key, habit_rows, month_days, week_dates, weekly_stats};
use crate::timer::format_time;
use crate::update::{AppModel, picker_selection};
use chrono::{Datelike, NaiveDate};

pub fn build_snapshot(model: &AppModel, today: NaiveDate) -> Snapshot {
    Snapshot {
        tab: model.tab,
        today: date_key(today),
        week: week_view(model, today),
        month: month_view(model, today),
        notes: model.notes.clone(),
        timer: TimerView {
            remaining_seconds: model.timer.remaining(),
            display: format_time(model.timer.remaining()),
            running: model.timer.is_running(),
            alarm_visible: model.timer.alarm_visible(),
            progress: model.timer.progress(),
        },
        inspiration: InspirationView {
            visible: model.inspiration.visible,
            loading: model.inspiration.loading,
            text: model.inspiration.text.clone(),
        },
        picker: picker_view(model),
    }
}

// Offsets past the calendar's range render as an empty week or month.
fn week_view(model: &AppModel, today: NaiveDate) -> WeekView {
    let dates = week_dates(today, model.week_offset).unwrap_or_default();
    let (rows, stats) = if dates.is_empty() {
        (Vec::new(), WeeklyStats::default())
    } else {
        (
            habit_rows(&model.habits, &dates, &model.check_ins),
            weekly_stats(&model.habits, &dates, &model.check_ins),
        )
    };
    WeekView {
        offset: model.week_offset,
        dates,
        rows,
        stats,
    }
}

fn month_view(model: &AppModel, today: NaiveDate) -> MonthView {
    match month_days(today, model.month_offset) {
        Some(month) => MonthView {
            offset: model.month_offset,
            year: month.year,
            month: month.month,
            rows: habit_rows(&model.habits, &month.days, &model.check_ins),
            days: month.days,
        },
        None => MonthView {
            offset: model.month_offset,
            year: today.year(),
            month: today.month(),
            days: Vec::new(),
            rows: Vec::new(),
        },
    }
}

fn picker_view(model: &AppModel) -> Option<PickerView> {
    let (picker, selected) = picker_selection(model)?;
    let habit = habits::find(&model.habits, &picker.habit_id)?;
    Some(PickerView {
        date: picker.date.clone(),
        habit_id: habit.id.clone(),
        habit_name: habit.name.clone(),
        options: habit
            .options()
            .iter()
            .map(|label| PickerOption {
                label: label.clone(),
                selected: selected.contains(label),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habits::default_habits;
    use crate::models::{CheckInRecord, Tab};
    use crate::update::{Action, update};
    use chrono::{Local, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 7).unwrap()
    }

    fn apply(model: &mut AppModel, action: Action) {
        let now = Local.with_ymd_and_hms(2026, 1, 7, 12, 0, 0).unwrap();
        update(model, action.into(), now);
    }

    #[test]
    fn fresh_snapshot_shows_idle_current_period() {
        let model = AppModel::new(default_habits(), CheckInRecord::new(), Vec::new());
        let snap = build_snapshot(&model, today());

        assert_eq!(snap.tab, Tab::Weekly);
        assert_eq!(snap.today, "2026-01-07");
        assert_eq!(snap.week.dates.first().map(String::as_str), Some("2026-01-05"));
        assert_eq!(snap.week.rows.len(), 8);
        assert_eq!(snap.week.stats, WeeklyStats::default());
        assert_eq!((snap.month.year, snap.month.month, snap.month.days.len()), (2026, 1, 31));
        assert_eq!(snap.timer.display, "90:00");
        assert!(!snap.timer.running && !snap.timer.alarm_visible);
        assert!(snap.picker.is_none());
    }

    #[test]
    fn picker_marks_selected_options() {
        let mut model = AppModel::new(default_habits(), CheckInRecord::new(), Vec::new());
        apply(
            &mut model,
            Action::OpenOptions {
                date: "2026-01-06".into(),
                habit_id: "h7".into(),
            },
        );
        apply(
            &mut model,
            Action::ToggleOption {
                date: "2026-01-06".into(),
                habit_id: "h7".into(),
                option: "跳舞".into(),
            },
        );

        let picker = build_snapshot(&model, today()).picker.unwrap();
        assert_eq!(picker.habit_name, "身心维护");
        let selected: Vec<&str> = picker
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(selected, ["跳舞"]);
        assert_eq!(picker.options.len(), 6);
    }

    #[test]
    fn out_of_range_offsets_render_empty() {
        let mut model = AppModel::new(default_habits(), CheckInRecord::new(), Vec::new());
        model.week_offset = i64::MAX;
        model.month_offset = i64::MIN;
        let snap = build_snapshot(&model, today());
        assert!(snap.week.dates.is_empty());
        assert!(snap.month.days.is_empty());
    }
}
