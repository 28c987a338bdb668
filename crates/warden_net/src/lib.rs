//! Serialized HTTP access to upstream APIs.
//!
//! [`HttpGate`] wraps a single network client behind an async mutex: requests
//! made through one gate run strictly one after another, and every non-2xx
//! response is mapped to a fixed [`HttpErrorKind`](warden_error::HttpErrorKind).
//!
//! The client itself sits behind the [`Connect`] / [`HttpClient`] traits, with
//! a reqwest implementation used by default.

#![warn(missing_docs)]

mod classify;
mod client;
mod config;
mod gate;
mod request;

pub use classify::classify;
pub use client::{Connect, HttpClient, ReqwestClient, ReqwestConnector};
pub use config::{HttpGateConfig, HttpGateConfigBuilder};
pub use gate::HttpGate;
pub use request::{PendingRequest, RawResponse};
pub use reqwest::Method;
