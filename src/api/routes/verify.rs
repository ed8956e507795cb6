//! The route redeeming verification codes and recording applications.

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use axum_macros::debug_handler;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    api::{
        self,
        validation::{SubmittedCode, UserEmail},
        Json, Response,
    },
    application::{ApplicationForm, ApplicationType},
    messages::{localize, Lang, MessageId},
    AppState,
};

/// A `POST` request body for this API route.
///
/// The category-specific form fields arrive flattened alongside the code, so
/// unknown fields can't be rejected here.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    /// The applicant's email address.
    pub email: UserEmail,

    /// The submitted verification code.
    pub code: SubmittedCode,

    /// The language to respond in.
    #[serde(default)]
    pub lang: Lang,

    /// The category-specific form fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A `POST` response body for this API route.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// The localized success message.
    pub message: String,
}

/// Redeems a verification code and appends the application to its category's
/// spreadsheet.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub async fn post(
    State(state): State<AppState>,
    Path(application_type): Path<String>,
    Json(body): Json<PostRequest>,
) -> Response<PostResponse> {
    let Ok(application_type) = ApplicationType::from_str(&application_type) else {
        return Err(api::Error::InvalidType);
    };

    let code_matches = state
        .codes
        .code_matches(
            body.email.as_str(),
            &body.code,
            application_type,
            Utc::now(),
        )
        .await?;

    if !code_matches {
        return Err(api::Error::InvalidCode(body.lang));
    }

    let form = ApplicationForm::deserialize(application_type, Value::Object(body.fields))
        .map_err(|error| api::Error::MalformedPayload(error.to_string()))?;

    let rows = form.into_rows(body.email.as_str());

    let sheet_id = state.config.sheet_id(application_type);
    state.sheets.append(sheet_id, rows).await?;

    // The code is consumed only after the append succeeds, so a failed append
    // leaves it redeemable. All of the email's codes go at once.
    state.codes.delete_for_email(body.email.as_str()).await?;

    Ok((
        StatusCode::OK,
        Json(PostResponse {
            message: localize(body.lang, MessageId::VerificationSuccessful).to_owned(),
        }),
    ))
}
