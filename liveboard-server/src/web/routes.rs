//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use tracing::error;

use crate::irail::IrailApi;
use crate::view::{LiveboardView, TrainView};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router<A: IrailApi>(state: AppState<A>) -> Router {
    Router::new()
        .route("/", get(liveboard_page::<A>))
        .route("/health", get(health))
        .route("/train/:train_id", get(train_page_without_station::<A>))
        .route("/train/:train_id/:station", get(train_page::<A>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render(template: &impl Template) -> Result<Response, AppError> {
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html).into_response())
}

/// Liveboard for one station, in one direction.
async fn liveboard_page<A: IrailApi>(
    State(state): State<AppState<A>>,
    headers: HeaderMap,
    Query(req): Query<LiveboardQuery>,
) -> Result<Response, AppError> {
    let direction = req.direction();
    let station = req
        .station
        .unwrap_or_else(|| state.default_station.to_string());

    let mut view = LiveboardView::with_direction(station.clone(), direction);
    view.set_search_text(station);
    view.load(&*state.api).await;

    let board = BoardView::from_view(&view, &Local);

    if accepts_html(&headers) {
        render(&LiveboardTemplate { board })
    } else if board.failed {
        Err(AppError::Upstream {
            message: board.message.to_string(),
        })
    } else {
        Ok(Json(BoardResponse::from(board)).into_response())
    }
}

/// Train detail, showing the stops after `station`.
async fn train_page<A: IrailApi>(
    State(state): State<AppState<A>>,
    headers: HeaderMap,
    Path((train_id, station)): Path<(String, String)>,
) -> Result<Response, AppError> {
    show_train(&*state.api, &headers, train_id, Some(station)).await
}

/// Train detail with no station to count stops from.
async fn train_page_without_station<A: IrailApi>(
    State(state): State<AppState<A>>,
    headers: HeaderMap,
    Path(train_id): Path<String>,
) -> Result<Response, AppError> {
    show_train(&*state.api, &headers, train_id, None).await
}

async fn show_train<A: IrailApi>(
    api: &A,
    headers: &HeaderMap,
    train_id: String,
    station: Option<String>,
) -> Result<Response, AppError> {
    let mut view = TrainView::new(train_id, station);
    view.load(api).await;

    let train = TrainDetailView::from_view(&view, &Local);

    if accepts_html(headers) {
        render(&TrainTemplate { train })
    } else if train.failed {
        Err(AppError::Upstream {
            message: train.message.to_string(),
        })
    } else {
        Ok(Json(TrainResponse::from(train)).into_response())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// The iRail API could not be reached or answered unusably
    Upstream { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        error!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
