use crate::analytics::aggregate::{EntryFilter, mood_glyph};
use crate::analytics::{self, Clock};
use crate::config::Config;
use crate::db::{Database, EntryRecord};
use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Header carrying the opaque owner id resolved by the surrounding auth
/// layer. An id that does not resolve to a known user is a 401.
const OWNER_HEADER: &str = "x-lifelog-user";

#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/status", get(status))
        .route("/api/v1/dashboard", get(dashboard))
        .route("/api/v1/highlights", get(highlights))
        .route("/api/v1/habits", get(habit_list))
        .fallback(get(not_found))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HighlightsQuery {
    mood: Option<String>,
    favorite: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusPayload {
    db_path: String,
    api_port: u16,
    users: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryView {
    id: i64,
    occurred_on: String,
    mood: String,
    title: String,
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardPayload {
    total_entries: u64,
    total_expenses: f64,
    streak: u32,
    top_mood: Option<String>,
    recent_entries: Vec<EntryView>,
}

#[derive(Debug, Serialize)]
struct MonthBucketView {
    month: String,
    count: u32,
}

#[derive(Debug, Serialize)]
struct MoodSummaryView {
    mood: String,
    emoji: String,
    count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HighlightsPayload {
    total_memories: u64,
    most_active_month: String,
    top_mood: String,
    monthly_breakdown: Vec<MonthBucketView>,
    mood_summary: Vec<MoodSummaryView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HabitView {
    id: i64,
    name: String,
    completed_today: bool,
}

async fn status(State(state): State<ApiState>) -> ApiResult<Json<StatusPayload>> {
    let database = Database::open(&state.config.db_path)?;

    let payload = StatusPayload {
        db_path: state.config.db_path.display().to_string(),
        api_port: state.config.api_port,
        users: database.user_count()?,
    };

    Ok(Json(payload))
}

async fn dashboard(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> ApiResult<Json<DashboardPayload>> {
    let database = Database::open(&state.config.db_path)?;
    let owner = resolve_owner(&headers, &database)?;

    let summary =
        analytics::dashboard_summary(&database, state.clock.as_ref(), &state.config, &owner)?;

    let payload = DashboardPayload {
        total_entries: summary.total_entries,
        total_expenses: summary.total_expenses,
        streak: summary.streak,
        top_mood: summary.top_mood,
        recent_entries: summary
            .recent_entries
            .into_iter()
            .map(entry_view)
            .collect(),
    };

    Ok(Json(payload))
}

async fn highlights(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<HighlightsQuery>,
) -> ApiResult<Json<HighlightsPayload>> {
    let filter = build_filter(&query)?;

    let database = Database::open(&state.config.db_path)?;
    let owner = resolve_owner(&headers, &database)?;

    let report = analytics::highlight_report(&database, state.clock.as_ref(), &owner, &filter)?;

    // Absent-vs-present stays internal; "None" is wire-format only.
    let payload = HighlightsPayload {
        total_memories: report.total_memories,
        most_active_month: report
            .most_active_month
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| "None".to_string()),
        top_mood: report.top_mood.unwrap_or_else(|| "None".to_string()),
        monthly_breakdown: report
            .monthly_breakdown
            .into_iter()
            .map(|bucket| MonthBucketView {
                month: bucket.month.to_string(),
                count: bucket.count,
            })
            .collect(),
        mood_summary: report
            .mood_summary
            .into_iter()
            .map(|entry| MoodSummaryView {
                emoji: mood_glyph(&entry.mood).to_string(),
                mood: entry.mood,
                count: entry.count,
            })
            .collect(),
    };

    Ok(Json(payload))
}

async fn habit_list(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<HabitView>>> {
    let database = Database::open(&state.config.db_path)?;
    let owner = resolve_owner(&headers, &database)?;

    let statuses = analytics::habit_overview(&database, state.clock.as_ref(), &owner)?;

    let payload = statuses
        .into_iter()
        .map(|status| HabitView {
            id: status.habit.id,
            name: status.habit.name,
            completed_today: status.completed_today,
        })
        .collect();

    Ok(Json(payload))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Unknown route".to_string())
}

fn resolve_owner(headers: &HeaderMap, database: &Database) -> Result<String, ApiError> {
    let owner = headers
        .get(OWNER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::Unauthorized(format!("Missing {OWNER_HEADER} header")))?;

    if !database.user_exists(owner)? {
        return Err(ApiError::Unauthorized(format!("Unknown user: {owner}")));
    }

    Ok(owner.to_string())
}

fn build_filter(query: &HighlightsQuery) -> Result<EntryFilter, ApiError> {
    let favorite = query
        .favorite
        .as_deref()
        .map(|raw| {
            raw.parse::<bool>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid favorite value: {raw}")))
        })
        .transpose()?
        .unwrap_or(false);

    let start_date = query
        .start_date
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let end_date = query
        .end_date
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;

    Ok(EntryFilter {
        mood: query.mood.clone(),
        favorite,
        start_date,
        end_date,
    })
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {input}. Example: 2026-02-18"))
}

fn entry_view(entry: EntryRecord) -> EntryView {
    EntryView {
        id: entry.id,
        occurred_on: entry.occurred_on.format("%Y-%m-%d").to_string(),
        mood: entry.mood,
        title: entry.title,
        tags: entry.tags,
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(err) => {
                error!(error = %err, "internal API error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": err.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiError, HighlightsQuery, build_filter, parse_date};

    #[test]
    fn rejects_malformed_date() {
        assert!(parse_date("2024/01/05").is_err());
        assert!(parse_date("2024-01-05").is_ok());
    }

    #[test]
    fn filter_rejects_non_boolean_favorite() {
        let query = HighlightsQuery {
            mood: None,
            favorite: Some("yep".to_string()),
            start_date: None,
            end_date: None,
        };

        assert!(matches!(
            build_filter(&query),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn filter_carries_all_bounds() {
        let query = HighlightsQuery {
            mood: Some("happy".to_string()),
            favorite: Some("true".to_string()),
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-06-30".to_string()),
        };

        let filter = build_filter(&query).expect("filter");
        assert_eq!(filter.mood.as_deref(), Some("happy"));
        assert!(filter.favorite);
        assert!(filter.start_date.is_some());
        assert!(filter.end_date.is_some());
    }
}
