//! The route issuing verification codes to applicants.

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use axum_macros::debug_handler;
use chrono::{Duration, Utc};
use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};

use crate::{
    api::{
        self,
        client_ip::client_ip,
        validation::{ApplicantName, UserEmail},
        Json, Response,
    },
    application::ApplicationType,
    code,
    email::verification_message,
    messages::{localize, Lang, MessageId},
    sheets,
    store::{VerificationCode, CODE_VALIDITY_MINUTES, RATE_LIMIT_SECONDS},
    AppState,
};

/// A `POST` request body for this API route.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostRequest {
    /// The applicant's email address.
    pub email: UserEmail,

    /// The applicant's name.
    pub name: ApplicantName,

    /// The language to respond and email in.
    #[serde(default)]
    pub lang: Lang,
}

/// A `POST` response body for this API route.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// The localized confirmation message.
    pub message: String,
}

/// Issues a verification code for an application and emails it to the
/// applicant.
///
/// # Errors
///
/// See [`crate::api::Error`].
#[debug_handler]
pub async fn post(
    State(state): State<AppState>,
    Path(application_type): Path<String>,
    headers: HeaderMap,
    Json(body): Json<PostRequest>,
) -> Response<PostResponse> {
    let Ok(application_type) = ApplicationType::from_str(&application_type) else {
        return Err(api::Error::InvalidType);
    };

    let now = Utc::now();
    let ip = client_ip(&headers);

    // Expired rows are purged here rather than by a background task, so the
    // table only ever holds codes issued within the validity window.
    state.codes.purge_expired(now).await?;

    if let Some(issued_at) = state.codes.latest_issuance(&ip).await? {
        if now - issued_at < Duration::seconds(RATE_LIMIT_SECONDS) {
            return Err(api::Error::RateLimited);
        }
    }

    let sheet_id = state.config.sheet_id(application_type);
    let rows = state.sheets.read_all(sheet_id).await?;

    if sheets::contains_email(&rows, body.email.as_str()) {
        return Err(api::Error::EmailExists(body.lang));
    }

    let verification_code = code::generate();

    state
        .codes
        .upsert(VerificationCode {
            email: body.email.as_str().to_owned(),
            code: verification_code.clone(),
            expires_at: now + Duration::minutes(CODE_VALIDITY_MINUTES),
            application_type,
            ip,
        })
        .await?;

    // Delivery is best-effort: the stored code is the source of truth, and
    // resubmitting the form reissues and resends.
    match verification_message(
        body.lang,
        body.name.as_ref(),
        &verification_code,
        application_type.title(),
    ) {
        Ok((subject, html)) => {
            let mailbox = Mailbox::new(None, body.email.into_inner());

            if let Err(error) = state.email.send(mailbox, &subject, &html).await {
                tracing::error!("failed to send verification email: {error:#}");
            }
        }
        Err(error) => tracing::error!("failed to render verification email: {error:#}"),
    }

    Ok((
        StatusCode::OK,
        Json(PostResponse {
            message: localize(body.lang, MessageId::VerificationEmailSent).to_owned(),
        }),
    ))
}
