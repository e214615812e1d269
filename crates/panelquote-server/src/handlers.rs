//! Request handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use panelquote_core::parse::{normalize_decorated, parse_or};
use panelquote_core::{AdjustOp, AdjustmentItem, Category, QuoteRequest, SelectionMode, Snapshot};
use panelquote_engine::compute;
use panelquote_ext_file::{FileConfigStore, InMemoryPositionStore, StoreError, VariablesUpdate};

/// Header carrying the shared admin secret.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Application state.
pub struct AppState {
    /// Persisted pricing configuration store
    pub store: Arc<FileConfigStore>,
    /// Ephemeral position overrides (reset on restart)
    pub positions: Arc<InMemoryPositionStore>,
    /// Shared admin secret; `None` leaves the admin surface open (dev mode)
    pub admin_token: Option<String>,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

type ApiResponse = (StatusCode, Json<Value>);

fn bad_request(message: impl Into<String>) -> ApiResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
}

fn store_error(e: &StoreError) -> ApiResponse {
    let status = match e {
        StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": e.to_string() })))
}

/// Checks the shared admin secret. Dev mode (no secret configured) passes.
fn check_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiResponse> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Ok(());
    };
    let provided = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if provided == Some(expected) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid admin token" })),
        ))
    }
}

fn snapshot_view(snapshot: &Snapshot) -> Value {
    json!({
        "variables": {
            "min_length": snapshot.min_length,
            "max_length": snapshot.max_length,
            "min_width": snapshot.min_width,
            "min_height": snapshot.min_height,
            "extra_price": snapshot.extra_price,
            "rounding": snapshot.rounding,
        },
        "price_per_meter": {
            "high": snapshot.price_per_meter_high,
            "low": snapshot.price_per_meter_low,
        },
        "positions": snapshot.positions,
    })
}

// =============================================================================
// QUOTING
// =============================================================================

/// Current pricing configuration, as the quoting frontend consumes it.
pub async fn get_quote_config(State(state): State<Arc<AppState>>) -> ApiResponse {
    match state.store.resolve() {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot_view(&snapshot))),
        Err(e) => store_error(&e),
    }
}

/// Computes a quote from an arbitrary JSON object.
///
/// Dimension and option keys are accepted under their aliases; absent or
/// unparseable numerics coerce to 0 rather than erroring.
pub async fn compute_quote(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> ApiResponse {
    if !payload.is_object() {
        return bad_request("payload must be a JSON object");
    }

    let snapshot = match state.store.resolve() {
        Ok(snapshot) => snapshot,
        Err(e) => return store_error(&e),
    };

    let request = QuoteRequest::from_value(&payload);
    let quote = compute(&snapshot, &request);
    debug!(
        length = request.length,
        total = quote.price_total,
        "quote computed"
    );

    match serde_json::to_value(&quote) {
        Ok(value) => (StatusCode::OK, Json(value)),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

// =============================================================================
// ADMIN: RELOAD / VARIABLES / PRICES / BASE
// =============================================================================

/// Explicit invalidation hook: discards any host-side snapshot and forces
/// a re-resolution.
pub async fn reload_config(State(state): State<Arc<AppState>>, headers: HeaderMap) -> ApiResponse {
    if let Err(e) = check_admin(&state, &headers) {
        return e;
    }
    match state.store.reload() {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => store_error(&e),
    }
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim().replace(',', ".");
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().map(|f| f as i64).ok())
        }
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

/// Partial update of the `[variables]` block.
///
/// Example body:
/// `{ "min_length": 500, "max_length": 5000, "extra_price": 22,
///    "rounding": "ceil10" }`
pub async fn update_variables(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> ApiResponse {
    if let Err(e) = check_admin(&state, &headers) {
        return e;
    }
    let Some(map) = payload.as_object() else {
        return bad_request("payload must be a JSON object");
    };

    let mut update = VariablesUpdate::default();
    for (key, value) in map {
        match key.as_str() {
            "min_length" | "max_length" | "min_width" | "min_height" => {
                let Some(v) = coerce_i64(value) else {
                    return bad_request(format!("Invalid value for {key}"));
                };
                match key.as_str() {
                    "min_length" => update.min_length = Some(v),
                    "max_length" => update.max_length = Some(v),
                    "min_width" => update.min_width = Some(v),
                    _ => update.min_height = Some(v),
                }
            }
            "extra_price" => {
                let Some(v) = coerce_f64(value) else {
                    return bad_request("Invalid value for extra_price");
                };
                update.extra_price = Some(v);
            }
            "rounding" => {
                let Some(label) = value.as_str() else {
                    return bad_request("rounding must be nearest10|ceil10");
                };
                update.rounding = Some(label.to_string());
            }
            _ => return bad_request(format!("Unknown key: {key}")),
        }
    }

    match state.store.save_variables(&update) {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({ "ok": true, "variables": snapshot_view(&snapshot)["variables"] })),
        ),
        Err(e) => store_error(&e),
    }
}

/// Updates the calibration rates.
///
/// Body: `{ "high": 20097, "low": 17388 }`
pub async fn update_prices(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> ApiResponse {
    if let Err(e) = check_admin(&state, &headers) {
        return e;
    }

    let (Some(high), Some(low)) = (
        payload.get("high").and_then(coerce_f64),
        payload.get("low").and_then(coerce_f64),
    ) else {
        return bad_request("Body must contain numeric 'high' and 'low'");
    };

    match state.store.save_prices(high, low) {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "price_per_meter": {
                    "high": snapshot.price_per_meter_high,
                    "low": snapshot.price_per_meter_low,
                }
            })),
        ),
        Err(e) => store_error(&e),
    }
}

/// Updates the `[base]` block; absent fields stay untouched. Price values
/// are accepted as numbers or strings with a decimal comma.
pub async fn save_base(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> ApiResponse {
    if let Err(e) = check_admin(&state, &headers) {
        return e;
    }
    let Some(map) = payload.as_object() else {
        return bad_request("payload must be a JSON object");
    };

    let rounding = match map.get("rounding") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(_) => return bad_request("rounding must be nearest10|ceil10"),
    };
    let high = match map.get("price_high") {
        None | Some(Value::Null) => None,
        Some(v) => match coerce_f64(v) {
            Some(parsed) => Some(parsed),
            None => return bad_request("Invalid value for price_high"),
        },
    };
    let low = match map.get("price_low") {
        None | Some(Value::Null) => None,
        Some(v) => match coerce_f64(v) {
            Some(parsed) => Some(parsed),
            None => return bad_request("Invalid value for price_low"),
        },
    };

    match state.store.save_base(rounding.as_deref(), high, low) {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "rounding": snapshot.rounding,
                "price_high": snapshot.price_per_meter_high,
                "price_low": snapshot.price_per_meter_low,
            })),
        ),
        Err(e) => store_error(&e),
    }
}

// =============================================================================
// ADMIN: CATEGORY CRUD
// =============================================================================

/// Incoming category payload.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    /// Display name; defaults to the capitalized id.
    #[serde(default)]
    pub name: String,
    /// Selection mode label; anything but `multi` means `single`.
    #[serde(default)]
    pub mode: Option<String>,
    /// Full replacement item list.
    #[serde(default)]
    pub items: Vec<ItemPayload>,
}

/// Incoming adjustment item.
#[derive(Debug, Deserialize)]
pub struct ItemPayload {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Operation tag; unknown tokens fall back to `mul`.
    #[serde(default)]
    pub op: Option<String>,
    /// Percent value as number or decorated string (`"+5%"`, `"12,5"`).
    #[serde(default)]
    pub value: Value,
}

fn percent_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_or(&normalize_decorated(s), 0.0),
        _ => 0.0,
    }
}

impl CategoryPayload {
    fn into_category(self, id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: self.name,
            mode: SelectionMode::from_label(self.mode.as_deref().unwrap_or("single")),
            items: self
                .items
                .into_iter()
                .map(|item| AdjustmentItem {
                    name: item.name,
                    op: AdjustOp::from_label(item.op.as_deref().unwrap_or("mul")),
                    value: percent_value(&item.value),
                })
                .collect(),
        }
    }
}

/// Lists all stored categories.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResponse {
    if let Err(e) = check_admin(&state, &headers) {
        return e;
    }
    match state.store.list_categories() {
        Ok(categories) => (StatusCode::OK, Json(json!({ "categories": categories }))),
        Err(e) => store_error(&e),
    }
}

/// Fetches one category.
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResponse {
    if let Err(e) = check_admin(&state, &headers) {
        return e;
    }
    match state.store.get_category(&id) {
        Ok(Some(category)) => (StatusCode::OK, Json(json!(category))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("category not found: {id}") })),
        ),
        Err(e) => store_error(&e),
    }
}

/// Creates or replaces a category.
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<CategoryPayload>,
) -> ApiResponse {
    if let Err(e) = check_admin(&state, &headers) {
        return e;
    }
    match state.store.save_category(&payload.into_category(&id)) {
        Ok(category) => (StatusCode::OK, Json(json!(category))),
        Err(e) => store_error(&e),
    }
}

/// Deletes a category.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResponse {
    if let Err(e) = check_admin(&state, &headers) {
        return e;
    }
    match state.store.delete_category(&id) {
        Ok(true) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("category not found: {id}") })),
        ),
        Err(e) => store_error(&e),
    }
}

// =============================================================================
// ADMIN: EPHEMERAL POSITION OVERRIDES
// =============================================================================

/// Incoming position override.
#[derive(Debug, Deserialize)]
pub struct PositionPayload {
    /// Option name.
    pub name: String,
    /// Percent value.
    pub percent: f64,
}

/// Lists the ephemeral overrides as `{name: percent}`.
pub async fn list_positions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResponse {
    if let Err(e) = check_admin(&state, &headers) {
        return e;
    }
    (StatusCode::OK, Json(json!(state.positions.list())))
}

/// Inserts or replaces one override.
pub async fn upsert_position(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<PositionPayload>,
) -> ApiResponse {
    if let Err(e) = check_admin(&state, &headers) {
        return e;
    }
    state.positions.upsert(payload.name, payload.percent);
    (StatusCode::OK, Json(json!({ "ok": true })))
}

/// Removes one override; removing a missing name is not an error.
pub async fn delete_position(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> ApiResponse {
    if let Err(e) = check_admin(&state, &headers) {
        return e;
    }
    state.positions.remove(&name);
    (StatusCode::OK, Json(json!({ "ok": true })))
}
