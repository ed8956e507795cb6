//! A web server for the HTTP API, exposed under `/api/`.

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::json;

use crate::messages::{localize, Lang, MessageId};

pub(crate) mod client_ip;
pub mod routes;
pub mod validation;

pub use routes::router;

/// An API error. When an error occurs in an API route, this is returned, and an error response is
/// generated for it.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The URL's category segment doesn't name an application category.
    #[error("invalid application type")]
    InvalidType,

    /// The submitted email already appears in the category's spreadsheet.
    #[error("email already used to apply")]
    EmailExists(Lang),

    /// The submitted code doesn't match a live code for the category.
    #[error("invalid or expired verification code")]
    InvalidCode(Lang),

    /// The IP already requested a code less than a minute ago.
    #[error("a code was requested too recently")]
    RateLimited,

    /// The request body couldn't be deserialized.
    #[error("malformed request body: {0}")]
    MalformedPayload(String),

    /// The requested route doesn't exist.
    #[error("route not found")]
    RouteNotFound,

    /// An upstream service or the database failed.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    /// The response status code for the error.
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidType
            | Self::EmailExists(_)
            | Self::InvalidCode(_)
            | Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The response body for the error.
    fn body(&self) -> serde_json::Value {
        match self {
            Self::InvalidType => json!({ "error": "Invalid type" }),
            Self::EmailExists(lang) => {
                json!({ "message": localize(*lang, MessageId::EmailExists) })
            }
            Self::InvalidCode(lang) => {
                json!({ "message": localize(*lang, MessageId::InvalidCode) })
            }
            Self::RateLimited => {
                json!({ "error": "Please wait a minute before requesting another code" })
            }
            Self::MalformedPayload(detail) => json!({ "error": detail }),
            Self::RouteNotFound => json!({ "error": "Route not found" }),
            Self::Internal(_) => json!({ "error": "Internal Server Error" }),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        if let Self::Internal(error) = &self {
            // The detail stays server-side; clients get a generic message.
            tracing::error!("internal API error: {error:#}");
        }

        (self.status(), axum::Json(self.body())).into_response()
    }
}

/// The response type returned by every API route.
pub(crate) type Response<T> = Result<(StatusCode, Json<T>), Error>;

/// Equivalent to [`axum::Json`], but rejections map to [`Error`] so clients
/// always receive the API's JSON error shape.
#[derive(Clone, Copy, Debug)]
pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| Error::MalformedPayload(rejection.body_text()))?;

        Ok(Self(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}
