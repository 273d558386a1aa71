use log::{debug, error, info, warn};
use std::fmt;

use crate::config::Config;
use crate::error::Error;
use crate::monitor::MonitorRequest;
use crate::rest;
use crate::session::{self, SessionConnector};

pub const NOT_CONFIGURED_HINT: &str =
    "Set UPTIME_KUMA_URL (e.g. http://localhost:3001) to register monitors.";

/// A way of creating a monitor, tried in the order of [`STRATEGY_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Log in with username and password over a session, then add the monitor.
    Session,
    /// `POST /api/monitors` authenticated with a bearer token.
    Token,
}

pub const STRATEGY_ORDER: [Strategy; 2] = [Strategy::Session, Strategy::Token];

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Session => write!(f, "session login"),
            Strategy::Token => write!(f, "API token"),
        }
    }
}

/// Outcome of a single strategy.
#[derive(Debug)]
enum Attempt {
    Created,
    /// The strategy does not apply to this configuration or build.
    Skipped(&'static str),
    Failed(Error),
}

/// What an operator needs to add the monitor by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualInstructions {
    pub base_url: String,
    pub name: String,
    pub url: String,
}

impl fmt::Display for ManualInstructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Add monitor in Uptime Kuma ({}):", self.base_url)?;
        writeln!(f, "  Name: {}  URL: {}", self.name, self.url)?;
        write!(
            f,
            "  For auto-add: build with the `socket` feature and set UPTIME_KUMA_USER + UPTIME_KUMA_PASSWORD"
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Created(Strategy),
    /// Every strategy failed; the monitor has to be added by hand.
    Manual(ManualInstructions),
    /// No base URL is configured, nothing was attempted.
    NotConfigured,
}

impl Registration {
    pub fn is_created(&self) -> bool {
        matches!(self, Registration::Created(_))
    }
}

/// Registers monitors in Uptime Kuma, falling back through [`STRATEGY_ORDER`].
pub struct Registrar {
    config: Config,
    connector: Option<Box<dyn SessionConnector>>,
}

impl Registrar {
    /// A registrar using the session connector compiled into this build.
    pub fn new(config: Config) -> Self {
        Registrar::with_connector(config, session::default_connector())
    }

    pub fn with_connector(config: Config, connector: Option<Box<dyn SessionConnector>>) -> Self {
        Registrar { config, connector }
    }

    /// Registers an HTTP monitor named `domain` watching `url`.
    ///
    /// Returns `true` only when a strategy confirmed the monitor was created.
    /// Otherwise the configuration hint or the manual instructions are
    /// written to stderr and `false` is returned.
    pub async fn register(&self, domain: &str, url: &str) -> bool {
        let registration = self.attempt(&MonitorRequest::http(domain, url)).await;

        match &registration {
            Registration::Created(strategy) => info!("Monitor for {domain} registered via {strategy}"),
            Registration::Manual(instructions) => eprintln!("{instructions}"),
            Registration::NotConfigured => eprintln!("{NOT_CONFIGURED_HINT}"),
        }

        registration.is_created()
    }

    /// Tries each strategy in order and reports which one, if any, succeeded.
    pub async fn attempt(&self, request: &MonitorRequest) -> Registration {
        let Some(base_url) = self.config.base_url.as_deref() else {
            return Registration::NotConfigured;
        };

        for strategy in STRATEGY_ORDER {
            match self.try_strategy(strategy, base_url, request).await {
                Attempt::Created => return Registration::Created(strategy),
                Attempt::Skipped(reason) => debug!("Skipping {strategy}: {reason}"),
                Attempt::Failed(e) => match strategy {
                    Strategy::Session => error!("Uptime Kuma {strategy} error: {e}"),
                    Strategy::Token => warn!("Uptime Kuma {strategy} error: {e}"),
                },
            }
        }

        Registration::Manual(ManualInstructions {
            base_url: base_url.to_string(),
            name: request.name.clone(),
            url: request.url.clone(),
        })
    }

    async fn try_strategy(
        &self,
        strategy: Strategy,
        base_url: &str,
        request: &MonitorRequest,
    ) -> Attempt {
        match strategy {
            Strategy::Session => self.via_session(base_url, request).await,
            Strategy::Token => self.via_token(base_url, request).await,
        }
    }

    async fn via_session(&self, base_url: &str, request: &MonitorRequest) -> Attempt {
        let Some(credentials) = &self.config.credentials else {
            return Attempt::Skipped("UPTIME_KUMA_USER and UPTIME_KUMA_PASSWORD are not both set");
        };
        let Some(connector) = &self.connector else {
            return Attempt::Skipped("built without session support");
        };

        let mut session = match connector.connect(base_url).await {
            Ok(session) => session,
            Err(e) => return Attempt::Failed(e),
        };

        let created = match session
            .login(&credentials.username, &credentials.password)
            .await
        {
            Ok(()) => session.add_monitor(request).await,
            Err(e) => Err(e),
        };
        let closed = session.disconnect().await;

        match created {
            Ok(monitor_id) => {
                match monitor_id {
                    Some(id) => info!("Created monitor {} with id {id}", request.name),
                    None => info!("Created monitor {}", request.name),
                }
                if let Err(e) = closed {
                    warn!("Monitor created but the session did not close cleanly: {e}");
                }
                Attempt::Created
            }
            Err(e) => {
                if let Err(close_error) = closed {
                    debug!("Closing the failed session also failed: {close_error}");
                }
                Attempt::Failed(e)
            }
        }
    }

    async fn via_token(&self, base_url: &str, request: &MonitorRequest) -> Attempt {
        let Some(token) = self.config.token.as_deref() else {
            return Attempt::Skipped("UPTIME_KUMA_TOKEN is not set");
        };

        match rest::create_monitor(base_url, token, request).await {
            Ok(()) => Attempt::Created,
            Err(e) => Attempt::Failed(e),
        }
    }
}
