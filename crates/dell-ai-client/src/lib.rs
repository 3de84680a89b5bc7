//! Client for the Dell Enterprise Hub: catalog lookups, compatibility checks
//! and deployment snippet rendering.

pub mod client;
pub mod config;
pub mod credentials;
pub mod resolver;
pub mod transport;

pub use client::HubClient;
pub use config::ClientConfig;
pub use credentials::{CredentialProvider, StaticCredentials, TokenFile};
pub use transport::Transport;

#[cfg(test)]
mod testing;
