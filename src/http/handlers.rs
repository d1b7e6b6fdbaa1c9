//! Route handlers.
//!
//! Handlers only validate input, call the todo service, and wrap results
//! in a `{"data": ...}` envelope. Status codes follow the method:
//! POST → 201, DELETE → 204, everything else → 200.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::http::validation::{parse_id, parse_todo_query};
use crate::resilience::{BreakerSnapshot, RequestExecutor};
use crate::todo::TodoData;

/// Successful response body.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    fn respond(status: StatusCode, data: T) -> Response {
        (status, Json(Envelope { data })).into_response()
    }
}

pub async fn health() -> &'static str {
    "Service is healthy."
}

/// `GET /todo` and `GET /todo?id=N`.
pub async fn get_todos<E: RequestExecutor>(
    State(state): State<AppState<E>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    match parse_todo_query(&query)? {
        Some(id) => {
            let todo = state.todos.get_by_id(id).await?;
            Ok(Envelope::respond(StatusCode::OK, todo))
        }
        None => {
            let todos = state.todos.get_all().await?;
            Ok(Envelope::respond(StatusCode::OK, todos))
        }
    }
}

pub async fn create_todo<E: RequestExecutor>(
    State(state): State<AppState<E>>,
    body: Result<Json<TodoData>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(todo) = body?;
    let created = state.todos.create(&todo).await?;
    Ok(Envelope::respond(StatusCode::CREATED, created))
}

pub async fn update_todo<E: RequestExecutor>(
    State(state): State<AppState<E>>,
    Path(id): Path<String>,
    body: Result<Json<TodoData>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = parse_id("id", &id)?;
    let Json(todo) = body?;
    let updated = state.todos.update(id, &todo).await?;
    Ok(Envelope::respond(StatusCode::OK, updated))
}

pub async fn delete_todo<E: RequestExecutor>(
    State(state): State<AppState<E>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("id", &id)?;
    state.todos.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /breakers`: state of every circuit breaker.
pub async fn list_breakers<E: RequestExecutor>(
    State(state): State<AppState<E>>,
) -> Json<Envelope<Vec<BreakerSnapshot>>> {
    Json(Envelope {
        data: state.breakers.snapshots(),
    })
}
