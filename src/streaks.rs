use crate::day;
use crate::models::{DayStatus, Habit};
use chrono::NaiveDate;

/// Consecutive-day streak ending at the most recent completion, anchored at
/// `today`. A completion yesterday keeps the streak alive; a gap of more
/// than one day between `today` and the last completion voids it.
pub fn current_streak(days: &[NaiveDate], today: NaiveDate) -> u32 {
    let sorted = sorted_unique(days);
    let Some(&last) = sorted.last() else {
        return 0;
    };

    if (today - last).num_days() > 1 {
        return 0;
    }

    let mut streak = 0u32;
    let mut anchor = last;
    for &date in sorted.iter().rev() {
        if (anchor - date).num_days() <= 1 {
            streak += 1;
            anchor = date;
        } else {
            break;
        }
    }
    streak
}

/// Longest run of consecutive completion days on or after `window_start`.
/// Purely historical; independent of the current date.
pub fn best_streak(days: &[NaiveDate], window_start: NaiveDate) -> u32 {
    let sorted: Vec<NaiveDate> = sorted_unique(days)
        .into_iter()
        .filter(|date| *date >= window_start)
        .collect();

    if sorted.is_empty() {
        return 0;
    }

    let mut best = 0u32;
    let mut run = 1u32;
    for pair in sorted.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
            best = best.max(run);
        } else {
            run = 1;
        }
    }
    best.max(run)
}

/// Completion marks for one day across habits, in a caller-supplied title
/// order. Titles missing from `order` keep their encounter order after the
/// known ones.
pub fn day_statuses(habits: &[Habit], order: &[String], date: NaiveDate) -> Vec<DayStatus> {
    let mut ordered: Vec<&Habit> = habits.iter().collect();
    // stable sort, so unknown titles stay in encounter order
    ordered.sort_by_key(|habit| {
        order
            .iter()
            .position(|title| *title == habit.title)
            .unwrap_or(usize::MAX)
    });

    ordered
        .into_iter()
        .map(|habit| DayStatus {
            title: habit.title.clone(),
            completed: habit.completed_on(date),
        })
        .collect()
}

fn sorted_unique(days: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut sorted = days.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}
