use dashboard::day;
use dashboard::models::{
    Habit, HabitStatsResponse, MonthData, MonthsSummaryResponse, SubscriptionSummaryResponse,
};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct GoalResponse {
    id: uuid::Uuid,
    title: String,
    completed: bool,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("dashboard_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/habits")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_dashboard"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("HABIT_ORDER", "Rezar,Ejercicio,Leer")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn create_habit(client: &Client, base_url: &str, title: &str) -> Habit {
    client
        .post(format!("{base_url}/api/habits"))
        .json(&serde_json::json!({
            "title": title,
            "frequency": "daily",
            "category": "general",
            "start_date": day::day_key(day::today()),
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_habit_toggle_and_streak_stats() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let habit = create_habit(&client, &server.base_url, "Leer").await;
    assert!(habit.completed_dates.is_empty());

    let today_key = day::day_key(day::today());
    let toggled: Habit = client
        .post(format!("{}/api/habits/{}/toggle", server.base_url, habit.id))
        .json(&serde_json::json!({ "date": today_key }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled.completed_dates, vec![today_key.clone()]);

    let stats: HabitStatsResponse = client
        .get(format!("{}/api/habits/{}/stats", server.base_url, habit.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.total_days, 1);
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.best_streak, 1);

    // toggling the same day again unmarks it
    let untoggled: Habit = client
        .post(format!("{}/api/habits/{}/toggle", server.base_url, habit.id))
        .json(&serde_json::json!({ "date": today_key }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(untoggled.completed_dates.is_empty());
}

#[tokio::test]
async fn http_toggle_rejects_malformed_date() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let habit = create_habit(&client, &server.base_url, "Ejercicio").await;
    let response = client
        .post(format!("{}/api/habits/{}/toggle", server.base_url, habit.id))
        .json(&serde_json::json!({ "date": "28/02/2025" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_calendar_day_reports_statuses_in_order() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let habit = create_habit(&client, &server.base_url, "Rezar").await;
    let today_key = day::day_key(day::today());
    client
        .post(format!("{}/api/habits/{}/toggle", server.base_url, habit.id))
        .json(&serde_json::json!({ "date": today_key }))
        .send()
        .await
        .unwrap();

    let calendar: serde_json::Value = client
        .get(format!("{}/api/calendar/{}", server.base_url, today_key))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let statuses = calendar["statuses"].as_array().unwrap();
    assert!(!statuses.is_empty());
    // "Rezar" is first in HABIT_ORDER and completed today
    assert_eq!(statuses[0]["title"], "Rezar");
    assert_eq!(statuses[0]["completed"], true);
}

#[tokio::test]
async fn http_goal_lifecycle() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let goal: GoalResponse = client
        .post(format!("{}/api/goals", server.base_url))
        .json(&serde_json::json!({ "title": "Save for trip", "priority": "high" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!goal.completed);

    let updated: GoalResponse = client
        .put(format!("{}/api/goals/{}", server.base_url, goal.id))
        .json(&serde_json::json!({ "completed": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "Save for trip");

    let response = client
        .delete(format!("{}/api/goals/{}", server.base_url, goal.id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn http_subscription_summary_tracks_active_total() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: SubscriptionSummaryResponse = client
        .get(format!("{}/api/subscriptions/summary", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let sub: serde_json::Value = client
        .post(format!("{}/api/subscriptions", server.base_url))
        .json(&serde_json::json!({
            "name": "Streaming",
            "amount": 9.5,
            "category": "entertainment",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let after: SubscriptionSummaryResponse = client
        .get(format!("{}/api/subscriptions/summary", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after.active_count, before.active_count + 1);
    assert!((after.monthly_total - before.monthly_total - 9.5).abs() < 1e-9);

    // deactivating removes it from the monthly total
    let id = sub["id"].as_str().unwrap();
    client
        .put(format!("{}/api/subscriptions/{id}", server.base_url))
        .json(&serde_json::json!({ "active": false }))
        .send()
        .await
        .unwrap();

    let deactivated: SubscriptionSummaryResponse = client
        .get(format!("{}/api/subscriptions/summary", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deactivated.active_count, before.active_count);
}

#[tokio::test]
async fn http_months_are_seeded_and_editable() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let months: Vec<MonthData> = client
        .get(format!("{}/api/months", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(months.len(), 12);
    assert_eq!(months[0].name, "January");

    let updated: MonthData = client
        .put(format!("{}/api/months/March", server.base_url))
        .json(&serde_json::json!({ "additional_value": 200.0, "club_value": 40.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated.additional_value, 200.0);

    let with_trip: MonthData = client
        .post(format!("{}/api/months/March/trips", server.base_url))
        .json(&serde_json::json!({ "destination": "Lisbon", "dates": "Mar 3-7" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(with_trip.trips.len(), 1);

    let summary: MonthsSummaryResponse = client
        .get(format!("{}/api/months/summary", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let march = summary
        .months
        .iter()
        .find(|month| month.name == "March")
        .unwrap();
    assert_eq!(march.total, 240.0);
    assert_eq!(march.trip_count, 1);

    let response = client
        .delete(format!("{}/api/trips/{}", server.base_url, with_trip.trips[0].id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}
