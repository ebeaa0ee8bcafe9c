//! HTTP routes
//!
//! The three-endpoint REST surface:
//! - `POST /sessions` — create a session
//! - `GET /sessions/{id}/executions` — ordered execution history
//! - `POST /sessions/{id}/execute` — run code, record the result
//!
//! Failures intrinsic to running user code never surface as HTTP
//! errors; they come back as normal Execution bodies with
//! `isError: true`. Only bad requests, unknown sessions and storage
//! faults map to error status codes.

use std::net::SocketAddr;
use std::sync::Arc;

use pyrepl_core::error::ReplError;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::service::SessionService;

/// Request body for the execute endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteRequest {
    pub code: String,
}

/// JSON error body shared by all failure responses
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}

/// Build the route filter over a shared service
pub fn routes(
    service: Arc<SessionService>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let svc = warp::any().map(move || service.clone());

    let create_session = warp::path!("sessions")
        .and(warp::post())
        .and(svc.clone())
        .and_then(handle_create_session);

    let list_executions = warp::path!("sessions" / String / "executions")
        .and(warp::get())
        .and(svc.clone())
        .and_then(handle_list_executions);

    let execute = warp::path!("sessions" / String / "execute")
        .and(warp::post())
        .and(warp::body::content_length_limit(1024 * 1024))
        .and(warp::body::json())
        .and(svc)
        .and_then(handle_execute);

    create_session.or(list_executions).or(execute)
}

/// Serve the routes until the process is stopped
pub async fn serve(service: Arc<SessionService>, addr: SocketAddr) {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["POST", "GET"]);

    let api = routes(service).recover(handle_rejection).with(cors);

    info!("Listening on http://{}", addr);
    warp::serve(api).run(addr).await;
}

async fn handle_create_session(
    service: Arc<SessionService>,
) -> Result<impl Reply, Rejection> {
    let (body, status) = match service.create_session().await {
        Ok(session) => (warp::reply::json(&session), StatusCode::OK),
        Err(e) => {
            error!("Error creating session: {}", e);
            (
                warp::reply::json(&ErrorBody::new("Failed to create session")),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    };
    Ok(warp::reply::with_status(body, status))
}

async fn handle_list_executions(
    session_id: String,
    service: Arc<SessionService>,
) -> Result<impl Reply, Rejection> {
    let (body, status) = match service.list_executions(&session_id).await {
        Ok(executions) => (warp::reply::json(&executions), StatusCode::OK),
        Err(e) => {
            error!("Error fetching executions: {}", e);
            (
                warp::reply::json(&ErrorBody::new("Failed to fetch executions")),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    };
    Ok(warp::reply::with_status(body, status))
}

async fn handle_execute(
    session_id: String,
    request: ExecuteRequest,
    service: Arc<SessionService>,
) -> Result<impl Reply, Rejection> {
    let (body, status) = match service.execute(&session_id, &request.code).await {
        Ok(execution) => (warp::reply::json(&execution), StatusCode::OK),
        Err(ReplError::SessionNotFound(_)) => (
            warp::reply::json(&ErrorBody::new("Session not found")),
            StatusCode::NOT_FOUND,
        ),
        Err(ReplError::Storage(e)) => {
            error!("Error storing execution: {}", e);
            (
                warp::reply::json(&ErrorBody::new("Failed to store execution result")),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    };
    Ok(warp::reply::with_status(body, status))
}

/// Map rejections to the JSON error shapes the client expects
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, std::convert::Infallible> {
    let (status, body) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, ErrorBody::new("Not found"))
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (
            StatusCode::BAD_REQUEST,
            ErrorBody::with_details("Invalid request data", vec![e.to_string()]),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorBody::new("Request body too large"),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorBody::new("Method not allowed"),
        )
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new("Internal server error"),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
