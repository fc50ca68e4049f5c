use crate::day;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyNote {
    pub date: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub frequency: HabitFrequency,
    pub category: String,
    pub start_date: String,
    pub active: bool,
    #[serde(default)]
    pub completed_dates: Vec<String>,
    #[serde(default)]
    pub notes: Vec<DailyNote>,
}

impl Habit {
    /// Parsed completion days. Every write path validates date strings, so a
    /// parse failure here means the state file was edited by hand; those
    /// entries are skipped with a warning rather than poisoning the stats.
    pub fn completion_days(&self) -> Vec<NaiveDate> {
        self.completed_dates
            .iter()
            .filter_map(|value| {
                let parsed = day::parse_day(value);
                if parsed.is_none() {
                    warn!("skipping malformed completion date {value:?} on habit {}", self.id);
                }
                parsed
            })
            .collect()
    }

    pub fn start_day(&self) -> Option<NaiveDate> {
        day::parse_day(&self.start_date)
    }

    pub fn completed_on(&self, date: NaiveDate) -> bool {
        let key = day::day_key(date);
        self.completed_dates.iter().any(|value| *value == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub priority: Priority,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionCategory {
    Entertainment,
    Utilities,
    Services,
    Other,
}

impl SubscriptionCategory {
    pub const ALL: [SubscriptionCategory; 4] = [
        SubscriptionCategory::Entertainment,
        SubscriptionCategory::Utilities,
        SubscriptionCategory::Services,
        SubscriptionCategory::Other,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub category: SubscriptionCategory,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub destination: String,
    pub dates: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthData {
    pub name: String,
    #[serde(default)]
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub additional_value: f64,
    #[serde(default)]
    pub club_value: f64,
    #[serde(default)]
    pub template_value: f64,
}

impl MonthData {
    pub fn total(&self) -> f64 {
        self.additional_value + self.club_value + self.template_value
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub months: Vec<MonthData>,
}

impl AppData {
    /// Seed the twelve calendar months on first load, in calendar order.
    pub fn ensure_months(&mut self) {
        if self.months.is_empty() {
            self.months = MONTH_NAMES
                .iter()
                .map(|name| MonthData {
                    name: (*name).to_string(),
                    trips: Vec::new(),
                    additional_value: 0.0,
                    club_value: 0.0,
                    template_value: 0.0,
                })
                .collect();
        }
    }
}

// --- request payloads ---

#[derive(Debug, Deserialize)]
pub struct NewHabitRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: HabitFrequency,
    pub category: String,
    pub start_date: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateHabitRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<HabitFrequency>,
    pub category: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleDateRequest {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub date: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct NewGoalRequest {
    pub title: String,
    pub priority: Priority,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct NewSubscriptionRequest {
    pub name: String,
    pub amount: f64,
    pub category: SubscriptionCategory,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateSubscriptionRequest {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<SubscriptionCategory>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateMonthRequest {
    pub additional_value: Option<f64>,
    pub club_value: Option<f64>,
    pub template_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct NewTripRequest {
    pub destination: String,
    pub dates: String,
}

// --- response payloads ---

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitStatsResponse {
    pub id: Uuid,
    pub title: String,
    pub total_days: usize,
    pub current_streak: u32,
    pub best_streak: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailyProgressPoint {
    pub date: String,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyProgressPoint {
    pub start_date: String,
    pub end_date: String,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeState {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeStatus {
    pub start_date: String,
    pub day: u32,
    pub progress_days: u32,
    pub total_days: u32,
    pub state: ChallengeState,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardStatsResponse {
    pub daily_progress: Vec<DailyProgressPoint>,
    pub weekly_progress: Vec<WeeklyProgressPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<ChallengeStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayStatus {
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarDayResponse {
    pub date: String,
    pub statuses: Vec<DayStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: SubscriptionCategory,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionSummaryResponse {
    pub monthly_total: f64,
    pub active_count: usize,
    pub by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthTotal {
    pub name: String,
    pub total: f64,
    pub trip_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthsSummaryResponse {
    pub months: Vec<MonthTotal>,
    pub yearly_total: f64,
}
