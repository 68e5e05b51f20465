//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on the driving port and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::AccountService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account and follow-graph use cases.
    pub accounts: Arc<dyn AccountService>,
}

impl HttpState {
    /// Construct state around an account service.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use user_graph::domain::{AccountCoordinator, AccountPorts};
    /// use user_graph::inbound::http::state::HttpState;
    ///
    /// fn wire(ports: AccountPorts) -> HttpState {
    ///     HttpState::new(Arc::new(AccountCoordinator::new(ports)))
    /// }
    /// ```
    pub fn new(accounts: Arc<dyn AccountService>) -> Self {
        Self { accounts }
    }
}
