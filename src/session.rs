use async_trait::async_trait;

use crate::error::Error;
use crate::monitor::MonitorRequest;

/// An open connection to the monitoring service on which a user can log in
/// and manage monitors.
#[async_trait]
pub trait MonitorSession: Send {
    async fn login(&mut self, username: &str, password: &str) -> Result<(), Error>;

    /// Creates the monitor and returns the id the service assigned, if it
    /// reported one.
    async fn add_monitor(&mut self, request: &MonitorRequest) -> Result<Option<u64>, Error>;

    /// Releases the session.
    async fn disconnect(self: Box<Self>) -> Result<(), Error>;
}

/// Opens [`MonitorSession`]s against a base URL.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn connect(&self, base_url: &str) -> Result<Box<dyn MonitorSession>, Error>;
}

/// The session connector compiled into this build, if any.
///
/// Returns `None` when the crate is built without the `socket` feature, in
/// which case the session login strategy is unavailable.
pub fn default_connector() -> Option<Box<dyn SessionConnector>> {
    #[cfg(feature = "socket")]
    {
        Some(Box::new(crate::socket::SocketConnector::default()))
    }
    #[cfg(not(feature = "socket"))]
    {
        None
    }
}
