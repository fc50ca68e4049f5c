use crate::day;
use crate::errors::AppError;
use crate::models::{
    AppData, CalendarDayResponse, DailyNote, DashboardStatsResponse, Goal, Habit,
    HabitStatsResponse, MonthData, MonthsSummaryResponse, NewGoalRequest, NewHabitRequest,
    NewSubscriptionRequest, NewTripRequest, NoteRequest, Subscription,
    SubscriptionSummaryResponse, ToggleDateRequest, Trip, UpdateGoalRequest, UpdateHabitRequest,
    UpdateMonthRequest, UpdateSubscriptionRequest, MONTH_NAMES,
};
use crate::state::AppState;
use crate::stats::{
    build_dashboard_stats, build_habit_stats, build_months_summary, build_subscription_summary,
};
use crate::storage::persist_data;
use crate::streaks;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use uuid::Uuid;

// --- habits ---

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<Habit>> {
    let data = state.data.lock().await;
    Json(data.habits.clone())
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabitRequest>,
) -> Result<Json<Habit>, AppError> {
    let title = non_empty(&payload.title, "title")?;
    let start_day = parse_request_day(&payload.start_date)?;

    let habit = Habit {
        id: Uuid::new_v4(),
        title,
        description: payload
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()),
        frequency: payload.frequency,
        category: payload.category.trim().to_string(),
        start_date: day::day_key(start_day),
        active: true,
        completed_dates: Vec::new(),
        notes: Vec::new(),
    };

    let mut data = state.data.lock().await;
    data.habits.push(habit.clone());
    persist_data(&state.data_path, &data).await?;

    Ok(Json(habit))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHabitRequest>,
) -> Result<Json<Habit>, AppError> {
    let mut data = state.data.lock().await;
    let updated = {
        let habit = habit_mut(&mut data, id)?;
        if let Some(title) = payload.title {
            habit.title = non_empty(&title, "title")?;
        }
        if let Some(description) = payload.description {
            let trimmed = description.trim().to_string();
            habit.description = (!trimmed.is_empty()).then_some(trimmed);
        }
        if let Some(frequency) = payload.frequency {
            habit.frequency = frequency;
        }
        if let Some(category) = payload.category {
            habit.category = category.trim().to_string();
        }
        if let Some(active) = payload.active {
            habit.active = active;
        }
        habit.clone()
    };
    persist_data(&state.data_path, &data).await?;

    Ok(Json(updated))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut data = state.data.lock().await;
    let before = data.habits.len();
    data.habits.retain(|habit| habit.id != id);
    if data.habits.len() == before {
        return Err(AppError::not_found("habit not found"));
    }
    persist_data(&state.data_path, &data).await?;

    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// Marks or unmarks one calendar day. Removing strips every occurrence so a
/// duplicated entry in the state file cannot survive a toggle.
pub async fn toggle_habit_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ToggleDateRequest>,
) -> Result<Json<Habit>, AppError> {
    let date = parse_request_day(&payload.date)?;
    let key = day::day_key(date);

    let mut data = state.data.lock().await;
    let updated = {
        let habit = habit_mut(&mut data, id)?;
        if habit.completed_dates.iter().any(|value| *value == key) {
            habit.completed_dates.retain(|value| *value != key);
        } else {
            habit.completed_dates.push(key);
        }
        habit.clone()
    };
    persist_data(&state.data_path, &data).await?;

    Ok(Json(updated))
}

pub async fn upsert_habit_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NoteRequest>,
) -> Result<Json<Habit>, AppError> {
    let date = parse_request_day(&payload.date)?;
    let key = day::day_key(date);
    let content = payload.content.trim().to_string();

    let mut data = state.data.lock().await;
    let updated = {
        let habit = habit_mut(&mut data, id)?;
        habit.notes.retain(|note| note.date != key);
        if !content.is_empty() {
            habit.notes.push(DailyNote { date: key, content });
            habit.notes.sort_by(|a, b| a.date.cmp(&b.date));
        }
        habit.clone()
    };
    persist_data(&state.data_path, &data).await?;

    Ok(Json(updated))
}

pub async fn habit_stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HabitStatsResponse>, AppError> {
    let data = state.data.lock().await;
    let habit = data
        .habits
        .iter()
        .find(|habit| habit.id == id)
        .ok_or_else(|| AppError::not_found("habit not found"))?;

    Ok(Json(build_habit_stats(habit)))
}

// --- dashboard ---

pub async fn dashboard_stats(State(state): State<AppState>) -> Json<DashboardStatsResponse> {
    let data = state.data.lock().await;
    Json(build_dashboard_stats(&data))
}

pub async fn calendar_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<CalendarDayResponse>, AppError> {
    let date = parse_request_day(&date)?;
    let data = state.data.lock().await;
    let statuses = streaks::day_statuses(&data.habits, &state.habit_order, date);

    Ok(Json(CalendarDayResponse {
        date: day::day_key(date),
        statuses,
    }))
}

// --- goals ---

pub async fn list_goals(State(state): State<AppState>) -> Json<Vec<Goal>> {
    let data = state.data.lock().await;
    Json(data.goals.clone())
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<NewGoalRequest>,
) -> Result<Json<Goal>, AppError> {
    let goal = Goal {
        id: Uuid::new_v4(),
        title: non_empty(&payload.title, "title")?,
        priority: payload.priority,
        completed: false,
    };

    let mut data = state.data.lock().await;
    data.goals.push(goal.clone());
    persist_data(&state.data_path, &data).await?;

    Ok(Json(goal))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGoalRequest>,
) -> Result<Json<Goal>, AppError> {
    let mut data = state.data.lock().await;
    let updated = {
        let goal = data
            .goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or_else(|| AppError::not_found("goal not found"))?;
        if let Some(title) = payload.title {
            goal.title = non_empty(&title, "title")?;
        }
        if let Some(priority) = payload.priority {
            goal.priority = priority;
        }
        if let Some(completed) = payload.completed {
            goal.completed = completed;
        }
        goal.clone()
    };
    persist_data(&state.data_path, &data).await?;

    Ok(Json(updated))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut data = state.data.lock().await;
    let before = data.goals.len();
    data.goals.retain(|goal| goal.id != id);
    if data.goals.len() == before {
        return Err(AppError::not_found("goal not found"));
    }
    persist_data(&state.data_path, &data).await?;

    Ok(Json(serde_json::json!({ "deleted": id })))
}

// --- subscriptions ---

pub async fn list_subscriptions(State(state): State<AppState>) -> Json<Vec<Subscription>> {
    let data = state.data.lock().await;
    Json(data.subscriptions.clone())
}

pub async fn create_subscription(
    State(state): State<AppState>,
    Json(payload): Json<NewSubscriptionRequest>,
) -> Result<Json<Subscription>, AppError> {
    if !payload.amount.is_finite() || payload.amount < 0.0 {
        return Err(AppError::bad_request("amount must be a non-negative number"));
    }

    let subscription = Subscription {
        id: Uuid::new_v4(),
        name: non_empty(&payload.name, "name")?,
        amount: payload.amount,
        category: payload.category,
        active: true,
    };

    let mut data = state.data.lock().await;
    data.subscriptions.push(subscription.clone());
    persist_data(&state.data_path, &data).await?;

    Ok(Json(subscription))
}

pub async fn update_subscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubscriptionRequest>,
) -> Result<Json<Subscription>, AppError> {
    // validate the whole payload before touching the record; a rejected
    // update must not leave partial changes behind
    let name = match payload.name {
        Some(name) => Some(non_empty(&name, "name")?),
        None => None,
    };
    if let Some(amount) = payload.amount {
        if !amount.is_finite() || amount < 0.0 {
            return Err(AppError::bad_request("amount must be a non-negative number"));
        }
    }

    let mut data = state.data.lock().await;
    let updated = {
        let subscription = data
            .subscriptions
            .iter_mut()
            .find(|sub| sub.id == id)
            .ok_or_else(|| AppError::not_found("subscription not found"))?;
        if let Some(name) = name {
            subscription.name = name;
        }
        if let Some(amount) = payload.amount {
            subscription.amount = amount;
        }
        if let Some(category) = payload.category {
            subscription.category = category;
        }
        if let Some(active) = payload.active {
            subscription.active = active;
        }
        subscription.clone()
    };
    persist_data(&state.data_path, &data).await?;

    Ok(Json(updated))
}

pub async fn delete_subscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut data = state.data.lock().await;
    let before = data.subscriptions.len();
    data.subscriptions.retain(|sub| sub.id != id);
    if data.subscriptions.len() == before {
        return Err(AppError::not_found("subscription not found"));
    }
    persist_data(&state.data_path, &data).await?;

    Ok(Json(serde_json::json!({ "deleted": id })))
}

pub async fn subscription_summary(
    State(state): State<AppState>,
) -> Json<SubscriptionSummaryResponse> {
    let data = state.data.lock().await;
    Json(build_subscription_summary(&data))
}

// --- months ---

pub async fn list_months(State(state): State<AppState>) -> Json<Vec<MonthData>> {
    let data = state.data.lock().await;
    Json(data.months.clone())
}

pub async fn update_month(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<UpdateMonthRequest>,
) -> Result<Json<MonthData>, AppError> {
    let mut data = state.data.lock().await;
    let updated = {
        let month = month_mut(&mut data, &name)?;
        if let Some(value) = payload.additional_value {
            month.additional_value = value;
        }
        if let Some(value) = payload.club_value {
            month.club_value = value;
        }
        if let Some(value) = payload.template_value {
            month.template_value = value;
        }
        month.clone()
    };
    persist_data(&state.data_path, &data).await?;

    Ok(Json(updated))
}

pub async fn add_trip(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<NewTripRequest>,
) -> Result<Json<MonthData>, AppError> {
    let trip = Trip {
        id: Uuid::new_v4(),
        destination: non_empty(&payload.destination, "destination")?,
        dates: payload.dates.trim().to_string(),
    };

    let mut data = state.data.lock().await;
    let updated = {
        let month = month_mut(&mut data, &name)?;
        month.trips.push(trip);
        month.clone()
    };
    persist_data(&state.data_path, &data).await?;

    Ok(Json(updated))
}

pub async fn remove_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut data = state.data.lock().await;
    let mut removed = false;
    for month in &mut data.months {
        let before = month.trips.len();
        month.trips.retain(|trip| trip.id != id);
        removed |= month.trips.len() != before;
    }
    if !removed {
        return Err(AppError::not_found("trip not found"));
    }
    persist_data(&state.data_path, &data).await?;

    Ok(Json(serde_json::json!({ "deleted": id })))
}

pub async fn months_summary(State(state): State<AppState>) -> Json<MonthsSummaryResponse> {
    let data = state.data.lock().await;
    Json(build_months_summary(&data))
}

// --- shared helpers ---

fn parse_request_day(value: &str) -> Result<NaiveDate, AppError> {
    day::parse_day(value).ok_or_else(|| AppError::malformed_date(value))
}

fn non_empty(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn habit_mut<'a>(data: &'a mut AppData, id: Uuid) -> Result<&'a mut Habit, AppError> {
    data.habits
        .iter_mut()
        .find(|habit| habit.id == id)
        .ok_or_else(|| AppError::not_found("habit not found"))
}

fn month_mut<'a>(data: &'a mut AppData, name: &str) -> Result<&'a mut MonthData, AppError> {
    if !MONTH_NAMES.iter().any(|known| known.eq_ignore_ascii_case(name)) {
        return Err(AppError::bad_request(format!("unknown month {name:?}")));
    }
    data.months
        .iter_mut()
        .find(|month| month.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| AppError::not_found("month not found"))
}
