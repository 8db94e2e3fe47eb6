use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper for API responses that adds `"success": true` to the payload's fields
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful (200) API response
    pub fn success(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": 500,
                        "message": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        // Object payloads are flattened next to the success flag
        let mut envelope = Map::new();
        envelope.insert("success".to_string(), Value::Bool(true));
        match data_value {
            Value::Object(fields) => envelope.extend(fields),
            other => {
                envelope.insert("data".to_string(), other);
            }
        }

        (StatusCode::OK, Json(Value::Object(envelope))).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
