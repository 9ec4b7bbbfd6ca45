//! Async client for the SafeOps managed backend.
//!
//! Three surfaces, one transport:
//!
//! - [`RestClient`] — relation-generic CRUD against the `/rest/v1/`
//!   PostgREST-style data API
//! - [`AuthClient`] — sign-up / sign-in / sign-out / get-user against the
//!   hosted `/auth/v1/` identity provider
//! - [`RealtimeHandle`] — websocket change feed with automatic reconnect
//!
//! This crate knows nothing about the SafeOps schema. Row types are
//! supplied by the consumer (`safeops-core`) via serde.

pub mod auth;
pub mod error;
pub mod query;
pub mod realtime;
pub mod rest;
pub mod transport;

pub use auth::{AuthClient, AuthUser, Session};
pub use error::Error;
pub use query::{Direction, Query};
pub use realtime::{ChangeEvent, ChangeOp, RealtimeHandle, ReconnectConfig};
pub use rest::RestClient;
pub use transport::{TlsMode, TransportConfig};
