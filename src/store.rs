//! One-time verification code storage.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use crate::application::ApplicationType;

/// How long a verification code stays valid, in minutes.
pub const CODE_VALIDITY_MINUTES: i64 = 15;

/// How long an IP must wait between issuances, in seconds.
pub const RATE_LIMIT_SECONDS: i64 = 60;

/// A one-time verification code issued to an applicant.
#[derive(Clone, Debug)]
pub struct VerificationCode {
    /// The applicant's email address.
    pub email: String,

    /// The code itself.
    pub code: String,

    /// When the code stops being valid.
    pub expires_at: DateTime<Utc>,

    /// The category the code was issued for.
    pub application_type: ApplicationType,

    /// The IP the issuance request came from.
    pub ip: String,
}

/// Storage for live verification codes.
///
/// The database holds at most one live code per email and category pair;
/// issuing a new code replaces the previous one.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Gets the most recent issuance instant for an IP across all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    async fn latest_issuance(&self, ip: &str) -> anyhow::Result<Option<DateTime<Utc>>>;

    /// Inserts a code, replacing any live code for the same email and
    /// category.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    async fn upsert(&self, code: VerificationCode) -> anyhow::Result<()>;

    /// Checks whether an unexpired code matches the email, code, and category.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    async fn code_matches(
        &self,
        email: &str,
        code: &str,
        application_type: ApplicationType,
        now: DateTime<Utc>,
    ) -> anyhow::Result<bool>;

    /// Deletes every code issued to an email, across all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    async fn delete_for_email(&self, email: &str) -> anyhow::Result<()>;

    /// Deletes every code that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<()>;
}

/// The PostgreSQL-backed [`CodeStore`].
#[derive(Clone, Debug)]
pub struct PgCodeStore {
    /// The database pool queries run on.
    pool: PgPool,
}

impl PgCodeStore {
    /// Creates a store over a database pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CodeStore for PgCodeStore {
    async fn latest_issuance(&self, ip: &str) -> anyhow::Result<Option<DateTime<Utc>>> {
        let latest_expiry: Option<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT expires_at FROM verification_codes WHERE ip = $1
                ORDER BY expires_at DESC LIMIT 1",
        )
        .bind(ip)
        .fetch_optional(&self.pool)
        .await?;

        // The issuance instant isn't stored directly, so it's recovered from
        // the expiry by subtracting the validity window.
        Ok(latest_expiry.map(|expiry| expiry - Duration::minutes(CODE_VALIDITY_MINUTES)))
    }

    async fn upsert(&self, code: VerificationCode) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO verification_codes (email, code, expires_at, application_type, ip)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (email, application_type) DO UPDATE
                SET code = EXCLUDED.code, expires_at = EXCLUDED.expires_at, ip = EXCLUDED.ip",
        )
        .bind(&code.email)
        .bind(&code.code)
        .bind(code.expires_at)
        .bind(code.application_type.to_string())
        .bind(&code.ip)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn code_matches(
        &self,
        email: &str,
        code: &str,
        application_type: ApplicationType,
        now: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let matches = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM verification_codes
                    WHERE email = $1 AND code = $2 AND application_type = $3
                        AND expires_at > $4
            )",
        )
        .bind(email)
        .bind(code)
        .bind(application_type.to_string())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(matches)
    }

    async fn delete_for_email(&self, email: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM verification_codes WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM verification_codes WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
