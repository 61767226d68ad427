use crate::error::ServerError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde::de::DeserializeOwned;

/// Body extractor that accepts `application/x-www-form-urlencoded` or JSON.
///
/// Anything that is not declared as a urlencoded form is parsed as JSON, so
/// rejections carry the JSON parser's message.
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ServerError::BadRequest(e.body_text()))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ServerError::BadRequest(e.body_text()))?;
            Ok(Self(value))
        }
    }
}

/// `Multipart` whose rejections (wrong content type, missing boundary) come
/// back as JSON errors instead of axum's plain-text bodies.
pub struct MultipartForm(pub Multipart);

impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(Self)
            .map_err(|e| ServerError::BadRequest(e.body_text()))
    }
}
