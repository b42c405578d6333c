use voluma_core::{ApiClient, DashboardSession, SessionHandle};

/// Holds the shared state for the CLI application.
/// This is a lightweight container - logic lives in the dashboard session.
#[derive(Clone)]
pub struct CliContext {
    pub session: SessionHandle,
}

impl CliContext {
    pub fn new(api_base: &str) -> Self {
        Self {
            session: DashboardSession::new(ApiClient::new(api_base)),
        }
    }
}
