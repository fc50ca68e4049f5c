use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route(
            "/api/habits/:id",
            put(handlers::update_habit).delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit_date))
        .route("/api/habits/:id/note", put(handlers::upsert_habit_note))
        .route("/api/habits/:id/stats", get(handlers::habit_stats))
        .route("/api/stats", get(handlers::dashboard_stats))
        .route("/api/calendar/:date", get(handlers::calendar_day))
        .route("/api/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route(
            "/api/goals/:id",
            put(handlers::update_goal).delete(handlers::delete_goal),
        )
        .route(
            "/api/subscriptions",
            get(handlers::list_subscriptions).post(handlers::create_subscription),
        )
        .route("/api/subscriptions/summary", get(handlers::subscription_summary))
        .route(
            "/api/subscriptions/:id",
            put(handlers::update_subscription).delete(handlers::delete_subscription),
        )
        .route("/api/months", get(handlers::list_months))
        .route("/api/months/summary", get(handlers::months_summary))
        .route("/api/months/:name", put(handlers::update_month))
        .route("/api/months/:name/trips", post(handlers::add_trip))
        .route("/api/trips/:id", delete(handlers::remove_trip))
        .with_state(state)
}
