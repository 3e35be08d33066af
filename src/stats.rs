use crate::checkin::{is_completed, slot};
use crate::models::{CheckInRecord, Habit, HabitRow, WeeklyStats};
use chrono::{Datelike, Duration, Months, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthDays {
    pub year: i32,
    pub month: u32,
    pub days: Vec<String>,
}

/// Monday through Sunday of the week `offset_weeks` away from the week
/// containing `today`. `None` only when the week falls outside the
/// representable calendar.
pub fn week_dates(today: NaiveDate, offset_weeks: i64) -> Option<Vec<String>> {
    let monday = week_start(today).checked_add_signed(Duration::try_weeks(offset_weeks)?)?;
    (0..7)
        .map(|day| monday.checked_add_signed(Duration::days(day)).map(date_key))
        .collect()
}

/// Every day of the month `offset_months` away from the month containing
/// `today`.
pub fn month_days(today: NaiveDate, offset_months: i64) -> Option<MonthDays> {
    let first = today.with_day(1)?;
    let magnitude = Months::new(u32::try_from(offset_months.unsigned_abs()).ok()?);
    let first = if offset_months >= 0 {
        first.checked_add_months(magnitude)?
    } else {
        first.checked_sub_months(magnitude)?
    };

    let mut days = Vec::with_capacity(31);
    let mut day = first;
    while day.month() == first.month() {
        days.push(date_key(day));
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    Some(MonthDays {
        year: first.year(),
        month: first.month(),
        days,
    })
}

pub fn weekly_stats(habits: &[Habit], dates: &[String], record: &CheckInRecord) -> WeeklyStats {
    let mut total_completed = 0u32;
    let mut perfect_days = 0u32;

    for date in dates {
        let day_count = habits
            .iter()
            .filter(|habit| is_completed(habit, slot(record, date, &habit.id)))
            .count() as u32;
        total_completed += day_count;
        if day_count as usize == habits.len() {
            perfect_days += 1;
        }
    }

    let possible = dates.len() * habits.len();
    let rate = if possible == 0 {
        0
    } else {
        (total_completed as f64 / possible as f64 * 100.0).round() as u32
    };

    WeeklyStats {
        rate,
        perfect_days,
        total_completed,
    }
}

pub fn habit_rows(habits: &[Habit], dates: &[String], record: &CheckInRecord) -> Vec<HabitRow> {
    habits
        .iter()
        .map(|habit| {
            let done: Vec<bool> = dates
                .iter()
                .map(|date| is_completed(habit, slot(record, date, &habit.id)))
                .collect();
            HabitRow {
                habit_id: habit.id.clone(),
                name: habit.name.clone(),
                is_multi: habit.is_multi(),
                completed: done.iter().filter(|d| **d).count() as u32,
                done,
            }
        })
        .collect()
}

/// Prompt seed for the inspiration fetch: completed slots this week.
pub fn activity_summary(habits: &[Habit], today: NaiveDate, record: &CheckInRecord) -> String {
    let completed = week_dates(today, 0)
        .map(|dates| weekly_stats(habits, &dates, record).total_completed)
        .unwrap_or(0);
    format!("本周已完成 {completed} 个习惯打卡项。")
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a canonical `YYYY-MM-DD` key. Unpadded, signed or padded forms
/// that chrono would otherwise accept are refused.
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    (date_key(date) == value).then_some(date)
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::{toggle_habit, toggle_option};
    use crate::habits::default_habits;
    use chrono::Weekday;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_runs_monday_to_sunday_for_any_offset() {
        let today = day(2026, 1, 7);
        for offset in [-60, -1, 0, 1, 53] {
            let dates = week_dates(today, offset).unwrap();
            assert_eq!(dates.len(), 7);
            let parsed: Vec<NaiveDate> = dates.iter().map(|d| parse_date_key(d).unwrap()).collect();
            assert_eq!(parsed[0].weekday(), Weekday::Mon);
            assert_eq!(parsed[6].weekday(), Weekday::Sun);
            for pair in parsed.windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::days(1));
            }
        }
    }

    #[test]
    fn date_keys_must_be_canonical() {
        assert_eq!(parse_date_key("2026-01-07"), Some(day(2026, 1, 7)));
        for key in ["2026-1-7", "2026-01-7", " 2026-01-07", "+2026-01-07", "2026-01-07 ", "2026-02-30"] {
            assert_eq!(parse_date_key(key), None, "{key:?}");
        }
    }

    #[test]
    fn current_week_contains_today() {
        let sunday = day(2026, 1, 11);
        let dates = week_dates(sunday, 0).unwrap();
        assert_eq!(dates[0], "2026-01-05");
        assert_eq!(dates[6], "2026-01-11");

        let previous = week_dates(sunday, -1).unwrap();
        assert_eq!(previous[0], "2025-12-29");
    }

    #[test]
    fn month_days_cover_whole_month() {
        let month = month_days(day(2026, 1, 20), 0).unwrap();
        assert_eq!((month.year, month.month), (2026, 1));
        assert_eq!(month.days.len(), 31);
        assert_eq!(month.days.last().unwrap(), "2026-01-31");
        assert_eq!(month.days[0], "2026-01-01");
    }

    #[test]
    fn month_days_handle_rollover_and_short_months() {
        let feb = month_days(day(2026, 1, 31), 1).unwrap();
        assert_eq!((feb.year, feb.month, feb.days.len()), (2026, 2, 28));

        let leap = month_days(day(2028, 3, 15), -1).unwrap();
        assert_eq!(leap.days.len(), 29);

        let prev_year = month_days(day(2026, 1, 5), -1).unwrap();
        assert_eq!((prev_year.year, prev_year.month), (2025, 12));

        let next_year = month_days(day(2026, 12, 5), 13).unwrap();
        assert_eq!((next_year.year, next_year.month, next_year.days.len()), (2028, 1, 31));
    }

    #[test]
    fn stats_count_single_and_multi_slots() {
        let habits = default_habits();
        let dates = week_dates(day(2026, 1, 7), 0).unwrap();
        let mut record = CheckInRecord::new();

        for habit in &habits {
            if habit.is_multi() {
                toggle_option(&mut record, &dates[0], &habit.id, &habit.options()[0]);
            } else {
                toggle_habit(&mut record, &dates[0], &habit.id);
            }
        }
        toggle_habit(&mut record, &dates[1], "h1");

        let stats = weekly_stats(&habits, &dates, &record);
        assert_eq!(stats.total_completed, 9);
        assert_eq!(stats.perfect_days, 1);
        assert_eq!(stats.rate, (9.0_f64 / 56.0 * 100.0).round() as u32);
    }

    #[test]
    fn adding_a_completed_slot_never_lowers_stats() {
        let habits = default_habits();
        let dates = week_dates(day(2026, 1, 7), 0).unwrap();
        let mut record = CheckInRecord::new();
        let mut previous = weekly_stats(&habits, &dates, &record);

        for date in &dates {
            toggle_habit(&mut record, date, "h3");
            let current = weekly_stats(&habits, &dates, &record);
            assert!(current.total_completed > previous.total_completed);
            assert!(current.rate >= previous.rate);
            assert!(current.perfect_days <= 7);
            previous = current;
        }
    }

    #[test]
    fn stats_rate_is_zero_without_habits() {
        let dates = week_dates(day(2026, 1, 7), 0).unwrap();
        let stats = weekly_stats(&[], &dates, &CheckInRecord::new());
        assert_eq!(stats.rate, 0);
        assert_eq!(stats.total_completed, 0);
    }

    #[test]
    fn rows_and_summary_follow_record() {
        let habits = default_habits();
        let today = day(2026, 1, 7);
        let dates = week_dates(today, 0).unwrap();
        let mut record = CheckInRecord::new();
        toggle_habit(&mut record, &dates[2], "h2");
        toggle_option(&mut record, &dates[3], "h7", "走路");

        let rows = habit_rows(&habits, &dates, &record);
        let h2 = rows.iter().find(|r| r.habit_id == "h2").unwrap();
        assert_eq!(h2.done, [false, false, true, false, false, false, false]);
        assert_eq!(h2.completed, 1);

        assert_eq!(activity_summary(&habits, today, &record), "本周已完成 2 个习惯打卡项。");
    }
}
