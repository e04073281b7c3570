//! In-memory stand-in for the Nuki Web API.
//!
//! Serves the smart-lock, log and account routes the client wraps, backed by
//! `Store::seeded()`. Every route requires `Authorization: Bearer <token>`;
//! lock 99 belongs to another account and answers 403.

pub mod store;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

pub use store::{Account, LogEntry, Smartlock, SmartlockState, Store};
use store::state_after;

pub const DEFAULT_TOKEN: &str = "test-token";
const DEFAULT_LOG_LIMIT: usize = 20;
const MAX_LOG_LIMIT: usize = 50;

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    token: Arc<str>,
    db: Db,
}

pub fn app() -> Router {
    app_with_token(DEFAULT_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        db: Arc::new(RwLock::new(Store::seeded())),
    };
    Router::new()
        .route("/account", get(get_account))
        .route("/smartlock", get(list_smartlocks))
        .route("/smartlock/{id}", get(get_smartlock).post(update_smartlock))
        .route("/smartlock/{id}/action", post(send_action))
        .route("/smartlock/{id}/log", get(list_logs))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_token(listener, DEFAULT_TOKEN).await
}

pub async fn run_with_token(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_token(token)).await
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.token);
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if presented != Some(expected.as_str()) {
        warn!(path = %request.uri().path(), "rejecting unauthenticated request");
        return StatusCode::UNAUTHORIZED.into_response();
    }
    next.run(request).await
}

fn owned_lock(store: &Store, id: i64) -> Result<&Smartlock, StatusCode> {
    let lock = store.smartlocks.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    if lock.account_id != store.account.account_id {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(lock)
}

async fn get_account(State(state): State<AppState>) -> Json<Account> {
    Json(state.db.read().await.account.clone())
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(rename = "authIds")]
    auth_ids: Option<String>,
}

async fn list_smartlocks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Smartlock>> {
    let filter: Option<Vec<i64>> = params.auth_ids.map(|ids| {
        ids.split(',')
            .filter_map(|id| id.trim().parse().ok())
            .collect()
    });
    let store = state.db.read().await;
    let locks = store
        .smartlocks
        .values()
        .filter(|l| l.account_id == store.account.account_id)
        .filter(|l| filter.as_ref().is_none_or(|ids| ids.contains(&l.auth_id)))
        .cloned()
        .collect();
    Json(locks)
}

async fn get_smartlock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Smartlock>, StatusCode> {
    let store = state.db.read().await;
    owned_lock(&store, id).cloned().map(Json)
}

async fn update_smartlock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<Smartlock>,
) -> Result<StatusCode, StatusCode> {
    let mut store = state.db.write().await;
    owned_lock(&store, id)?;
    if let Some(lock) = store.smartlocks.get_mut(&id) {
        lock.name = input.name;
        lock.favorite = input.favorite;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct ActionBody {
    action: i64,
    option: Option<u8>,
}

async fn send_action(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<ActionBody>, JsonRejection>,
) -> Result<StatusCode, StatusCode> {
    let Json(body) = body.map_err(|_| StatusCode::BAD_REQUEST)?;
    let mut store = state.db.write().await;
    owned_lock(&store, id)?;
    let action = u8::try_from(body.action)
        .ok()
        .filter(|a| (1..=5).contains(a))
        .ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    debug!(smartlock_id = id, action, option = ?body.option, "performing lock action");

    let new_state = state_after(action);
    let name = store.account.name.clone();
    let mut device_type = 0;
    if let Some(lock) = store.smartlocks.get_mut(&id) {
        device_type = lock.device_type;
        if let Some(lock_state) = lock.state.as_mut() {
            lock_state.state = new_state;
            lock_state.last_action = action;
        }
    }
    store.logs.push(LogEntry {
        id: Uuid::new_v4().simple().to_string(),
        smartlock_id: id,
        device_type,
        name,
        action,
        trigger: 0,
        state: 0,
        auto_unlock: false,
        date: Utc::now(),
    });
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogParams {
    from_date: Option<String>,
    to_date: Option<String>,
    action: Option<u8>,
    limit: Option<usize>,
}

fn parse_date(value: Option<&str>) -> Result<Option<DateTime<Utc>>, StatusCode> {
    value
        .map(|v| {
            DateTime::parse_from_rfc3339(v)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|_| StatusCode::BAD_REQUEST)
        })
        .transpose()
}

async fn list_logs(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<LogParams>,
) -> Result<Json<Vec<LogEntry>>, StatusCode> {
    let from = parse_date(params.from_date.as_deref())?;
    let to = parse_date(params.to_date.as_deref())?;
    let limit = params.limit.unwrap_or(DEFAULT_LOG_LIMIT).min(MAX_LOG_LIMIT);

    let store = state.db.read().await;
    owned_lock(&store, id)?;
    let mut entries: Vec<LogEntry> = store
        .logs
        .iter()
        .filter(|e| e.smartlock_id == id)
        .filter(|e| params.action.is_none_or(|a| e.action == a))
        .filter(|e| from.is_none_or(|f| e.date >= f))
        .filter(|e| to.is_none_or(|t| e.date <= t))
        .cloned()
        .collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(limit);
    Ok(Json(entries))
}
