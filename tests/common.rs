//! Common code for integration tests.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bornovamun_backend::{
    api,
    application::ApplicationType,
    config::Config,
    email::EmailSender,
    sheets::{ServiceAccountKey, SheetWriter},
    store::{CodeStore, VerificationCode, CODE_VALIDITY_MINUTES},
    AppState,
};
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use lettre::message::Mailbox;
use serde_json::Value;
use tower::ServiceExt;

/// An in-memory [`CodeStore`] mirroring the database's upsert semantics.
#[derive(Debug, Default)]
pub struct FakeCodeStore {
    /// The live rows, at most one per email and category pair.
    rows: Mutex<Vec<VerificationCode>>,
}

impl FakeCodeStore {
    /// Snapshots the live rows.
    pub fn rows(&self) -> Vec<VerificationCode> {
        self.rows.lock().expect("store lock").clone()
    }

    /// Inserts a row directly, bypassing the handler under test.
    pub fn seed(&self, code: VerificationCode) {
        self.rows.lock().expect("store lock").push(code);
    }
}

#[async_trait]
impl CodeStore for FakeCodeStore {
    async fn latest_issuance(&self, ip: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
        Ok(self
            .rows
            .lock()
            .expect("store lock")
            .iter()
            .filter(|row| row.ip == ip)
            .map(|row| row.expires_at)
            .max()
            .map(|expiry| expiry - Duration::minutes(CODE_VALIDITY_MINUTES)))
    }

    async fn upsert(&self, code: VerificationCode) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().expect("store lock");
        rows.retain(|row| {
            row.email != code.email || row.application_type != code.application_type
        });
        rows.push(code);
        Ok(())
    }

    async fn code_matches(
        &self,
        email: &str,
        code: &str,
        application_type: ApplicationType,
        now: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        Ok(self.rows.lock().expect("store lock").iter().any(|row| {
            row.email == email
                && row.code == code
                && row.application_type == application_type
                && row.expires_at > now
        }))
    }

    async fn delete_for_email(&self, email: &str) -> anyhow::Result<()> {
        self.rows
            .lock()
            .expect("store lock")
            .retain(|row| row.email != email);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<()> {
        self.rows
            .lock()
            .expect("store lock")
            .retain(|row| row.expires_at >= now);
        Ok(())
    }
}

/// An in-memory [`SheetWriter`] with preloadable rows and recorded appends.
#[derive(Debug, Default)]
pub struct FakeSheets {
    /// The preloaded data rows per sheet ID.
    rows: Mutex<HashMap<String, Vec<Vec<String>>>>,

    /// Every append made through the trait, in order.
    appends: Mutex<Vec<(String, Vec<Vec<String>>)>>,
}

impl FakeSheets {
    /// Preloads the data rows read back for a sheet.
    pub fn preload(&self, sheet_id: &str, rows: Vec<Vec<String>>) {
        self.rows
            .lock()
            .expect("sheets lock")
            .insert(sheet_id.to_owned(), rows);
    }

    /// Snapshots the recorded appends.
    pub fn appends(&self) -> Vec<(String, Vec<Vec<String>>)> {
        self.appends.lock().expect("sheets lock").clone()
    }
}

#[async_trait]
impl SheetWriter for FakeSheets {
    async fn read_all(&self, sheet_id: &str) -> anyhow::Result<Vec<Vec<String>>> {
        Ok(self
            .rows
            .lock()
            .expect("sheets lock")
            .get(sheet_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, sheet_id: &str, rows: Vec<Vec<String>>) -> anyhow::Result<()> {
        self.appends
            .lock()
            .expect("sheets lock")
            .push((sheet_id.to_owned(), rows));
        Ok(())
    }
}

/// An email captured by [`FakeMailer`].
#[derive(Clone, Debug)]
pub struct SentEmail {
    /// The recipient address.
    pub to: String,

    /// The subject line.
    pub subject: String,

    /// The HTML body.
    pub html: String,
}

/// An in-memory [`EmailSender`] recording every message.
#[derive(Debug, Default)]
pub struct FakeMailer {
    /// Every message sent through the trait, in order.
    sent: Mutex<Vec<SentEmail>>,
}

impl FakeMailer {
    /// Snapshots the sent messages.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().expect("mailer lock").clone()
    }
}

#[async_trait]
impl EmailSender for FakeMailer {
    async fn send(&self, to: Mailbox, subject: &str, html: &str) -> anyhow::Result<()> {
        self.sent.lock().expect("mailer lock").push(SentEmail {
            to: to.email.to_string(),
            subject: subject.to_owned(),
            html: html.to_owned(),
        });
        Ok(())
    }
}

/// The app under test: its router plus handles to the fakes behind it.
pub struct TestApp {
    /// The API router, backed by the fakes below.
    pub router: Router,

    /// The code store fake.
    pub codes: Arc<FakeCodeStore>,

    /// The spreadsheet fake.
    pub sheets: Arc<FakeSheets>,

    /// The mailer fake.
    pub mailer: Arc<FakeMailer>,
}

/// Builds the router over fresh fakes and a fixed configuration.
pub fn test_app() -> TestApp {
    let config = Config {
        address: "127.0.0.1:0".to_owned(),
        database_url: "postgres://unused".to_owned(),
        smtp_hostname: "smtp.example.com".to_owned(),
        smtp_username: "user".to_owned(),
        smtp_password: "password".to_owned(),
        from_mailbox: "BORNOVAMUN Team <team@example.com>"
            .parse()
            .expect("mailbox should parse"),
        service_account: ServiceAccountKey {
            client_email: "svc@example.iam.gserviceaccount.com".to_owned(),
            private_key: String::new(),
        },
        sheet_id_delegate: "sheet-delegate".to_owned(),
        sheet_id_press: "sheet-press".to_owned(),
        sheet_id_chair: "sheet-chair".to_owned(),
        sheet_id_admin: "sheet-admin".to_owned(),
        sheet_id_delegation: "sheet-delegation".to_owned(),
    };

    let codes = Arc::new(FakeCodeStore::default());
    let sheets = Arc::new(FakeSheets::default());
    let mailer = Arc::new(FakeMailer::default());

    let router = api::router(AppState {
        config: Arc::new(config),
        codes: Arc::clone(&codes) as Arc<dyn CodeStore>,
        sheets: Arc::clone(&sheets) as Arc<dyn SheetWriter>,
        email: Arc::clone(&mailer) as Arc<dyn EmailSender>,
    });

    TestApp {
        router,
        codes,
        sheets,
        mailer,
    }
}

/// Posts a JSON body to a route, returning the status and parsed response
/// body.
pub async fn post_json(router: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    post_json_from(router, uri, body, None).await
}

/// Like [`post_json`], but with an `X-Forwarded-For` header.
pub async fn post_json_from(
    router: &Router,
    uri: &str,
    body: &Value,
    forwarded_for: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(ip) = forwarded_for {
        request = request.header("x-forwarded-for", ip);
    }

    let response = router
        .clone()
        .oneshot(
            request
                .body(Body::from(body.to_string()))
                .expect("request should build"),
        )
        .await
        .expect("request should route");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();

    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}
