use crate::day::{self, day_key};
use crate::models::{
    AppData, CategoryTotal, ChallengeState, ChallengeStatus, DailyProgressPoint,
    DashboardStatsResponse, Habit, HabitStatsResponse, MonthTotal, MonthsSummaryResponse,
    SubscriptionCategory, SubscriptionSummaryResponse, WeeklyProgressPoint,
};
use crate::streaks;
use chrono::{Duration, NaiveDate};

pub const CHALLENGE_DAYS: i64 = 90;

pub fn build_habit_stats(habit: &Habit) -> HabitStatsResponse {
    build_habit_stats_at(day::today(), habit)
}

pub fn build_habit_stats_at(today: NaiveDate, habit: &Habit) -> HabitStatsResponse {
    let days = habit.completion_days();
    // best streak is bounded below by the habit's own start date; a
    // missing/unparseable start date falls back to the earliest completion
    let window_start = habit
        .start_day()
        .or_else(|| days.iter().min().copied())
        .unwrap_or(today);

    HabitStatsResponse {
        id: habit.id,
        title: habit.title.clone(),
        total_days: habit.completed_dates.len(),
        current_streak: streaks::current_streak(&days, today),
        best_streak: streaks::best_streak(&days, window_start),
    }
}

pub fn build_dashboard_stats(data: &AppData) -> DashboardStatsResponse {
    build_dashboard_stats_at(day::today(), data)
}

pub fn build_dashboard_stats_at(today: NaiveDate, data: &AppData) -> DashboardStatsResponse {
    const WEEK_COUNT: usize = 4;

    let total = data.habits.len();
    let mut daily_progress = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset as i64);
        let completed = data
            .habits
            .iter()
            .filter(|habit| habit.completed_on(date))
            .count();
        daily_progress.push(DailyProgressPoint {
            date: day_key(date),
            completed,
            total,
        });
    }

    let mut weekly_progress = Vec::with_capacity(WEEK_COUNT);
    for offset in (0..WEEK_COUNT).rev() {
        let end = today - Duration::weeks(offset as i64);
        let start = end - Duration::days(6);
        let completed = data
            .habits
            .iter()
            .map(|habit| {
                (0..7)
                    .filter(|day_offset| habit.completed_on(start + Duration::days(*day_offset)))
                    .count()
            })
            .sum();
        weekly_progress.push(WeeklyProgressPoint {
            start_date: day_key(start),
            end_date: day_key(end),
            completed,
            total: total * 7,
        });
    }

    DashboardStatsResponse {
        daily_progress,
        weekly_progress,
        challenge: challenge_status_at(today, data),
    }
}

/// 90-day challenge progress anchored at the earliest habit start date.
/// `None` when no habit carries a parseable start date.
pub fn challenge_status_at(today: NaiveDate, data: &AppData) -> Option<ChallengeStatus> {
    let start = data
        .habits
        .iter()
        .filter_map(Habit::start_day)
        .min()?;

    let days_passed = (today - start).num_days();
    let state = if days_passed < 0 {
        ChallengeState::NotStarted
    } else if days_passed >= CHALLENGE_DAYS {
        ChallengeState::Completed
    } else {
        ChallengeState::InProgress
    };

    Some(ChallengeStatus {
        start_date: day_key(start),
        day: (days_passed + 1).clamp(0, CHALLENGE_DAYS) as u32,
        progress_days: days_passed.clamp(0, CHALLENGE_DAYS) as u32,
        total_days: CHALLENGE_DAYS as u32,
        state,
    })
}

pub fn build_subscription_summary(data: &AppData) -> SubscriptionSummaryResponse {
    let active = || data.subscriptions.iter().filter(|sub| sub.active);

    let by_category = SubscriptionCategory::ALL
        .iter()
        .map(|category| CategoryTotal {
            category: *category,
            total: active()
                .filter(|sub| sub.category == *category)
                .map(|sub| sub.amount)
                .sum(),
            count: active().filter(|sub| sub.category == *category).count(),
        })
        .collect();

    SubscriptionSummaryResponse {
        monthly_total: active().map(|sub| sub.amount).sum(),
        active_count: active().count(),
        by_category,
    }
}

pub fn build_months_summary(data: &AppData) -> MonthsSummaryResponse {
    let months: Vec<MonthTotal> = data
        .months
        .iter()
        .map(|month| MonthTotal {
            name: month.name.clone(),
            total: month.total(),
            trip_count: month.trips.len(),
        })
        .collect();
    let yearly_total = months.iter().map(|month| month.total).sum();

    MonthsSummaryResponse {
        months,
        yearly_total,
    }
}
