//! Registers HTTP monitors for new sites in an Uptime Kuma instance.
//!
//! Strategies are tried in order until one confirms the monitor was created:
//! a username/password session (with the `socket` feature), then a bearer
//! token REST call, and finally instructions for adding it by hand.

pub mod cli;
pub mod config;
pub mod error;
pub mod monitor;
#[cfg(feature = "socket")]
pub mod packet;
pub mod registrar;
pub mod rest;
pub mod session;
#[cfg(feature = "socket")]
pub mod socket;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::Error;
pub use monitor::{MonitorRequest, MonitorType};
pub use registrar::{Registrar, Registration, Strategy};
