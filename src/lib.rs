//! BORNOVAMUN'26's application backend server.
//!
//! Serves the two-step apply/verify workflow: an applicant requests a one-time
//! code by email, then redeems it together with their full form payload, which
//! is appended to the category's application spreadsheet.

pub mod api;
pub mod application;
pub(crate) mod code;
pub mod config;
pub mod db;
pub mod email;
pub mod messages;
pub mod sheets;
pub mod store;

use std::fmt;
use std::sync::Arc;

use crate::{config::Config, email::EmailSender, sheets::SheetWriter, store::CodeStore};

/// The shared application state: configuration plus the external service
/// clients, constructed once at startup and injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The environment-backed runtime configuration.
    pub config: Arc<Config>,

    /// The one-time-code store.
    pub codes: Arc<dyn CodeStore>,

    /// The spreadsheet client applications are appended to.
    pub sheets: Arc<dyn SheetWriter>,

    /// The transactional email sender.
    pub email: Arc<dyn EmailSender>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
