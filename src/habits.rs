use crate::models::Habit;

/// Focus session length in seconds (90 minutes).
pub const DEEP_WORK_LIMIT: u32 = 5400;

pub fn default_habits() -> Vec<Habit> {
    vec![
        Habit::single("h1", "8:30早起"),
        Habit::single("h2", "AI学习"),
        Habit::single("h3", "AI公司"),
        Habit::single("h4", "阅读 (8页+)"),
        Habit::single("h5", "塔罗学习"),
        Habit::single("h6", "创作产出"),
        Habit::multi(
            "h7",
            "身心维护",
            &["游泳", "羽毛球", "走路", "拉伸", "跳舞", "健身"],
        ),
        Habit::single("h8", "23:30 前关机"),
    ]
}

pub fn find<'a>(habits: &'a [Habit], id: &str) -> Option<&'a Habit> {
    habits.iter().find(|habit| habit.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn habit_ids_are_unique() {
        let habits = default_habits();
        let ids: HashSet<_> = habits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids.len(), habits.len());
    }

    #[test]
    fn only_multi_habits_carry_options() {
        for habit in default_habits() {
            assert_eq!(habit.is_multi(), !habit.options().is_empty(), "{}", habit.id);
        }
        assert!(find(&default_habits(), "h7").unwrap().is_multi());
        assert!(find(&default_habits(), "nope").is_none());
    }
}
