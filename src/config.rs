//! Environment-backed runtime configuration.

use std::fmt;

use anyhow::Context;
use lettre::message::Mailbox;

use crate::{application::ApplicationType, sheets::ServiceAccountKey};

/// All runtime settings, read once at startup from the environment (or a
/// `.env` file via `dotenvy`).
#[derive(Clone)]
pub struct Config {
    /// The socket address the server binds to.
    pub address: String,

    /// The PostgreSQL connection string.
    pub database_url: String,

    /// The SMTP relay hostname.
    pub smtp_hostname: String,

    /// The SMTP relay username.
    pub smtp_username: String,

    /// The SMTP relay password.
    pub smtp_password: String,

    /// The mailbox automated emails are sent from.
    pub from_mailbox: Mailbox,

    /// The Google service account used to read and append spreadsheets.
    pub service_account: ServiceAccountKey,

    /// The spreadsheet ID for delegate applications.
    pub sheet_id_delegate: String,

    /// The spreadsheet ID for press applications.
    pub sheet_id_press: String,

    /// The spreadsheet ID for chair applications.
    pub sheet_id_chair: String,

    /// The spreadsheet ID for admin applications.
    pub sheet_id_admin: String,

    /// The spreadsheet ID for delegation (group) applications.
    pub sheet_id_delegation: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("address", &self.address)
            .field("smtp_hostname", &self.smtp_hostname)
            .field("smtp_username", &self.smtp_username)
            .field("from_mailbox", &self.from_mailbox)
            .field("service_account", &self.service_account)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or can't be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            address: var("ADDRESS")?,
            database_url: var("DATABASE_URL")?,
            smtp_hostname: var("SMTP_HOSTNAME")?,
            smtp_username: var("SMTP_USERNAME")?,
            smtp_password: var("SMTP_PASSWORD")?,
            from_mailbox: var("FROM_MAILBOX")?
                .parse()
                .context("environment variable `FROM_MAILBOX` should be a valid mailbox")?,
            service_account: serde_json::from_str(&var("GOOGLE_SERVICE_ACCOUNT_KEY")?).context(
                "environment variable `GOOGLE_SERVICE_ACCOUNT_KEY` should be a service account JSON key",
            )?,
            sheet_id_delegate: var("GOOGLE_SHEET_ID_DELEGATE")?,
            sheet_id_press: var("GOOGLE_SHEET_ID_PRESS")?,
            sheet_id_chair: var("GOOGLE_SHEET_ID_CHAIR")?,
            sheet_id_admin: var("GOOGLE_SHEET_ID_ADMIN")?,
            sheet_id_delegation: var("GOOGLE_SHEET_ID_DELEGATION")?,
        })
    }

    /// Gets the spreadsheet ID for an application category.
    pub fn sheet_id(&self, application_type: ApplicationType) -> &str {
        match application_type {
            ApplicationType::Delegate => &self.sheet_id_delegate,
            ApplicationType::Press => &self.sheet_id_press,
            ApplicationType::Chair => &self.sheet_id_chair,
            ApplicationType::Admin => &self.sheet_id_admin,
            ApplicationType::Delegation => &self.sheet_id_delegation,
        }
    }
}

/// Reads a required environment variable.
fn var(key: &str) -> anyhow::Result<String> {
    dotenvy::var(key).with_context(|| format!("environment variable `{key}` should be set"))
}
