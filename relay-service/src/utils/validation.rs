use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

/// JSON body extractor that also runs `validator` rules.
///
/// The body is parsed as JSON whatever its `Content-Type`, so `text/plain`
/// posts from browsers are accepted. Malformed JSON is a 400, failed
/// validation a 422; both render as `{"error": ...}`.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Failed to read body: {}", e)))?;

        let value: T = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Json parse error: {}", e)))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::GenerateRequest;
    use axum::body::Body;
    use axum::http::{header, StatusCode};

    async fn extract(content_type: Option<&str>, body: &str) -> Result<GenerateRequest, AppError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        ValidatedJson::<GenerateRequest>::from_request(req, &())
            .await
            .map(|ValidatedJson(value)| value)
    }

    #[tokio::test]
    async fn parses_body_regardless_of_content_type() {
        for content_type in [
            Some("application/json"),
            Some("text/plain;charset=UTF-8"),
            None,
        ] {
            let req = extract(content_type, r#"{"prompt":"hi","model":"rvm"}"#)
                .await
                .unwrap();
            assert_eq!(req.prompt, "hi");
            assert_eq!(req.model.as_deref(), Some("rvm"));
        }
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let err = extract(Some("text/plain"), "{nope").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("Json parse error"));
    }

    #[tokio::test]
    async fn missing_prompt_is_bad_request() {
        let err = extract(None, r#"{"model":"fom"}"#).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_prompt_fails_validation() {
        let err = extract(None, r#"{"prompt":""}"#).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
