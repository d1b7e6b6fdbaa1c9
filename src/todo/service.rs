//! Todo operations routed through the todo service's circuit breaker.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::resilience::{
    BreakerError, BreakerRegistry, CircuitBreaker, RequestDescriptor, RequestExecutor,
};
use crate::todo::types::TodoData;

/// Errors from todo operations.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error(transparent)]
    Breaker(#[from] BreakerError),

    /// The upstream answered with a payload that is not a todo (or todo list).
    #[error("Unexpected payload from todo service: {0}")]
    Decode(#[from] serde_json::Error),
}

/// CRUD access to the upstream todo service.
pub struct TodoService<E> {
    breaker: Arc<CircuitBreaker<E>>,
}

impl<E: RequestExecutor> TodoService<E> {
    /// Bind to the breaker for `base_url`, creating it if needed.
    pub fn new(registry: &BreakerRegistry<E>, base_url: &str) -> Self {
        Self {
            breaker: registry.breaker(base_url),
        }
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker<E>> {
        &self.breaker
    }

    pub async fn get_all(&self) -> Result<Vec<TodoData>, TodoError> {
        self.call(RequestDescriptor::get("/todos"), "Error fetching todos")
            .await
    }

    pub async fn get_by_id(&self, id: u64) -> Result<TodoData, TodoError> {
        self.call(
            RequestDescriptor::get(format!("/todos/{id}")),
            "Error fetching todo",
        )
        .await
    }

    pub async fn create(&self, todo: &TodoData) -> Result<TodoData, TodoError> {
        let payload = serde_json::to_value(todo)?;
        self.call(RequestDescriptor::post("/todos", payload), "Error creating todo")
            .await
    }

    pub async fn update(&self, id: u64, todo: &TodoData) -> Result<TodoData, TodoError> {
        let payload = serde_json::to_value(todo)?;
        self.call(
            RequestDescriptor::put(format!("/todos/{id}"), payload),
            "Error updating todo",
        )
        .await
    }

    pub async fn delete(&self, id: u64) -> Result<(), TodoError> {
        self.call::<Value>(
            RequestDescriptor::delete(format!("/todos/{id}")),
            "Error deleting todo",
        )
        .await
        .map(drop)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
        context: &'static str,
    ) -> Result<T, TodoError> {
        let payload = self.breaker.execute(&request).await.inspect_err(|e| {
            tracing::error!(
                method = %request.method,
                path = %request.path,
                error = %e,
                "{context}"
            );
        })?;

        serde_json::from_value(payload).map_err(|e| {
            tracing::error!(path = %request.path, error = %e, "{context}: undecodable payload");
            TodoError::Decode(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::test_support::{Outcome, ScriptedExecutor};
    use crate::resilience::BreakerSettings;
    use serde_json::json;
    use std::time::Duration;

    fn service(fallback: Outcome) -> TodoService<ScriptedExecutor> {
        let registry = BreakerRegistry::new(
            BreakerSettings {
                failure_threshold: 2,
                success_threshold: 1,
                open_duration: Duration::from_secs(30),
                retry_delay: Duration::from_millis(100),
            },
            Arc::new(ScriptedExecutor::new(fallback)),
        );
        TodoService::new(&registry, "http://todos.local")
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_all_decodes_list() {
        let svc = service(Outcome::Data(json!([
            { "id": 1, "title": "write tests", "completed": false },
            { "id": 2, "title": "ship", "completed": true }
        ])));

        let todos = svc.get_all().await.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[1].id, Some(2));
        assert!(todos[1].completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_shape_is_decode_error() {
        let svc = service(Outcome::Data(json!({ "unexpected": true })));
        let err = svc.get_by_id(1).await.unwrap_err();
        assert!(matches!(err, TodoError::Decode(_)));
        // Contact succeeded, so the breaker is untouched.
        assert_eq!(svc.breaker().snapshot().failure_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_accepts_any_payload() {
        let svc = service(Outcome::Data(json!({})));
        svc.delete(7).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_breaker_errors_pass_through() {
        let svc = service(Outcome::Status(503));
        let err = svc.create(&TodoData::new("x", false)).await.unwrap_err();
        assert!(matches!(
            err,
            TodoError::Breaker(BreakerError::RequestFailed { attempts: 2, .. })
        ));

        let err = svc.update(1, &TodoData::new("x", true)).await.unwrap_err();
        assert!(matches!(err, TodoError::Breaker(BreakerError::CircuitOpen { .. })));
    }
}
