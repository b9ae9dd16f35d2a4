//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{LineId, StationId};
use crate::store::StoreError;
use crate::topology::{LineView, TopologyServiceError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", post(create_station).get(list_stations))
        .route("/stations/:id", delete(delete_station))
        .route("/lines", post(create_line).get(list_lines))
        .route(
            "/lines/:id",
            get(show_line).put(update_line).delete(delete_line),
        )
        .route(
            "/lines/:id/sections",
            post(add_section).delete(remove_section),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn create_station(
    State(state): State<AppState>,
    Json(req): Json<CreateStationRequest>,
) -> Result<(StatusCode, Json<StationResponse>), AppError> {
    let station = state.topology.create_station(&req.name).await?;
    Ok((StatusCode::CREATED, Json(StationResponse::from(&station))))
}

async fn list_stations(
    State(state): State<AppState>,
) -> Result<Json<Vec<StationResponse>>, AppError> {
    let stations = state.topology.stations().await?;
    Ok(Json(stations.iter().map(StationResponse::from).collect()))
}

async fn delete_station(
    State(state): State<AppState>,
    Path(id): Path<StationId>,
) -> Result<StatusCode, AppError> {
    state.topology.delete_station(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_line(
    State(state): State<AppState>,
    Json(req): Json<CreateLineRequest>,
) -> Result<(StatusCode, Json<LineResponse>), AppError> {
    let view = state
        .topology
        .create_line(
            &req.name,
            &req.color,
            req.up_station_id,
            req.down_station_id,
            req.distance,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(LineResponse::from(&view))))
}

async fn list_lines(State(state): State<AppState>) -> Result<Json<Vec<LineResponse>>, AppError> {
    let views = state.topology.line_views().await?;
    Ok(Json(views.iter().map(LineResponse::from).collect()))
}

async fn show_line(
    State(state): State<AppState>,
    Path(id): Path<LineId>,
) -> Result<Json<LineResponse>, AppError> {
    let view = state.topology.line_view(id).await?;
    Ok(Json(LineResponse::from(&view)))
}

async fn update_line(
    State(state): State<AppState>,
    Path(id): Path<LineId>,
    Json(req): Json<UpdateLineRequest>,
) -> Result<Json<LineResponse>, AppError> {
    state
        .topology
        .update_line(id, &req.name, &req.color)
        .await
        .map_err(AppError::for_line_edit)?;
    let view = state.topology.line_view(id).await?;
    Ok(Json(LineResponse::from(&view)))
}

async fn delete_line(
    State(state): State<AppState>,
    Path(id): Path<LineId>,
) -> Result<StatusCode, AppError> {
    state
        .topology
        .delete_line(id)
        .await
        .map_err(AppError::for_line_edit)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach a section and return the line with its new station order.
async fn add_section(
    State(state): State<AppState>,
    Path(id): Path<LineId>,
    Json(req): Json<AddSectionRequest>,
) -> Result<Json<LineResponse>, AppError> {
    let stations = state
        .topology
        .add_station(id, req.up_station_id, req.down_station_id, req.distance)
        .await?;
    let line = state.topology.line(id).await?;
    Ok(Json(LineResponse::from(&LineView { line, stations })))
}

/// Take a station off a line and return the line with its new station order.
async fn remove_section(
    State(state): State<AppState>,
    Path(id): Path<LineId>,
    Query(query): Query<RemoveSectionQuery>,
) -> Result<Json<LineResponse>, AppError> {
    let stations = state.topology.remove_station(id, query.station_id).await?;
    let line = state.topology.line(id).await?;
    Ok(Json(LineResponse::from(&LineView { line, stations })))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl AppError {
    /// Renaming or deleting a line that does not exist is a bad request,
    /// unlike reading one.
    fn for_line_edit(e: TopologyServiceError) -> Self {
        match e {
            TopologyServiceError::LineNotFound(_)
            | TopologyServiceError::Store(StoreError::LineNotFound(_)) => AppError::BadRequest {
                message: e.to_string(),
            },
            e => e.into(),
        }
    }
}

impl From<TopologyServiceError> for AppError {
    fn from(e: TopologyServiceError) -> Self {
        let message = e.to_string();
        if e.is_defect() {
            return AppError::Internal { message };
        }
        match e {
            TopologyServiceError::LineNotFound(_)
            | TopologyServiceError::UnknownStation(_)
            | TopologyServiceError::Store(StoreError::LineNotFound(_))
            | TopologyServiceError::Store(StoreError::StationNotFound(_)) => {
                AppError::NotFound { message }
            }
            TopologyServiceError::Store(StoreError::StationInUse(_))
            | TopologyServiceError::Store(StoreError::StaleSnapshot(_)) => {
                AppError::Conflict { message }
            }
            TopologyServiceError::Store(StoreError::Snapshot { .. }) => {
                AppError::Internal { message }
            }
            // Validation, topology rules and duplicate names or colors
            TopologyServiceError::Topology(_)
            | TopologyServiceError::Store(StoreError::Domain(_))
            | TopologyServiceError::Store(StoreError::DuplicateStationName(_))
            | TopologyServiceError::Store(StoreError::DuplicateLineName(_))
            | TopologyServiceError::Store(StoreError::DuplicateLineColor(_)) => {
                AppError::BadRequest { message }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::domain::TopologyError;
    use crate::store::InMemoryLineStore;

    fn app() -> Router {
        create_router(AppState::new(InMemoryLineStore::new()))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Stations A, B, C (ids 1, 2, 3) and line 1 = A -(10)- B.
    async fn seeded() -> Router {
        let app = app();
        for name in ["A", "B", "C"] {
            let (status, _) = send(&app, "POST", "/stations", Some(json!({ "name": name }))).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let (status, _) = send(
            &app,
            "POST",
            "/lines",
            Some(json!({
                "name": "Line 1",
                "color": "bg-blue-600",
                "upStationId": 1,
                "downStationId": 2,
                "distance": 10
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        app
    }

    fn station_names(line: &Value) -> Vec<String> {
        line["stations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn health_check() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_and_show_line() {
        let app = seeded().await;
        let (status, line) = send(&app, "GET", "/lines/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(line["name"], "Line 1");
        assert_eq!(station_names(&line), ["A", "B"]);

        let (status, lines) = send(&app, "GET", "/lines", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(lines.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_and_remove_sections() {
        let app = seeded().await;

        let (status, line) = send(
            &app,
            "POST",
            "/lines/1/sections",
            Some(json!({ "upStationId": 1, "downStationId": 3, "distance": 4 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(station_names(&line), ["A", "C", "B"]);

        let (status, line) = send(&app, "DELETE", "/lines/1/sections?stationId=3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(station_names(&line), ["A", "B"]);
    }

    #[tokio::test]
    async fn topology_errors_are_bad_requests() {
        let app = seeded().await;

        let (status, body) = send(
            &app,
            "POST",
            "/lines/1/sections",
            Some(json!({ "upStationId": 1, "downStationId": 3, "distance": 10 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid distance"));

        let (status, _) = send(
            &app,
            "POST",
            "/lines/1/sections",
            Some(json!({ "upStationId": 2, "downStationId": 1, "distance": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "DELETE", "/lines/1/sections?stationId=3", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_things_are_not_found() {
        let app = seeded().await;
        let (status, _) = send(&app, "GET", "/lines/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            "/lines/1/sections",
            Some(json!({ "upStationId": 2, "downStationId": 99, "distance": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/stations/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_names_are_bad_requests() {
        let app = seeded().await;
        let (status, _) = send(&app, "POST", "/stations", Some(json!({ "name": "A" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/lines",
            Some(json!({
                "name": "Line 1",
                "color": "bg-red-600",
                "upStationId": 1,
                "downStationId": 3,
                "distance": 5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/lines",
            Some(json!({
                "name": "Line 2",
                "color": "bg-green-600",
                "upStationId": 1,
                "downStationId": 3,
                "distance": 5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            "PUT",
            "/lines/2",
            Some(json!({ "name": "Line 1", "color": "bg-green-600" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Line 1"));
    }

    #[tokio::test]
    async fn station_in_use_conflicts() {
        let app = seeded().await;
        let (status, _) = send(&app, "DELETE", "/stations/1", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn update_and_delete_line() {
        let app = seeded().await;
        let (status, line) = send(
            &app,
            "PUT",
            "/lines/1",
            Some(json!({ "name": "Line 1 Express", "color": "bg-blue-700" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(line["name"], "Line 1 Express");
        assert_eq!(station_names(&line), ["A", "B"]);

        let (status, _) = send(&app, "DELETE", "/lines/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", "/lines/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Stations are free again once their line is gone
        let (status, _) = send(&app, "DELETE", "/stations/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, stations) = send(&app, "GET", "/stations", None).await;
        assert_eq!(stations.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn editing_a_missing_line_is_a_bad_request() {
        let app = seeded().await;
        let (status, _) = send(
            &app,
            "PUT",
            "/lines/9",
            Some(json!({ "name": "Line 9", "color": "bg-gray-600" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "DELETE", "/lines/9", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", "/lines/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn section_edits_respond_with_the_edited_order() {
        let app = seeded().await;
        let (status, line) = send(
            &app,
            "POST",
            "/lines/1/sections",
            Some(json!({ "upStationId": 2, "downStationId": 3, "distance": 6 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(line["id"], 1);
        assert_eq!(line["name"], "Line 1");
        assert_eq!(station_names(&line), ["A", "B", "C"]);

        let (_, shown) = send(&app, "GET", "/lines/1", None).await;
        assert_eq!(shown, line);
    }

    #[test]
    fn defects_are_internal() {
        let err = AppError::from(TopologyServiceError::Topology(
            TopologyError::TopologyCorrupt("no start station"),
        ));
        assert!(matches!(err, AppError::Internal { .. }));

        let err = AppError::from(TopologyServiceError::Store(StoreError::Domain(
            TopologyError::TopologyCorrupt("no start station"),
        )));
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[test]
    fn missing_line_depends_on_the_request() {
        let missing = || TopologyServiceError::LineNotFound(LineId(4));
        assert!(matches!(AppError::from(missing()), AppError::NotFound { .. }));
        assert!(matches!(
            AppError::for_line_edit(missing()),
            AppError::BadRequest { .. }
        ));
        assert!(matches!(
            AppError::for_line_edit(TopologyServiceError::Store(StoreError::DuplicateLineColor(
                "red".into()
            ))),
            AppError::BadRequest { .. }
        ));
    }
}
