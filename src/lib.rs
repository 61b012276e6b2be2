// src/lib.rs

//! An inline gate enforcing SPNEGO/Kerberos authentication (RFC 4559)
//! on inbound HTTP requests.
//!
//! The gate sits in front of a downstream application, inspects the
//! `Authorization` header of every request, drives the `Negotiate`
//! token exchange against a [`TokenProcessor`], and decides whether to
//! admit, challenge or reject:
//!
//! - no credentials, a foreign scheme, or an incomplete exchange
//!   answer `401` with a `WWW-Authenticate: Negotiate [token]`
//!   challenge and an empty body;
//! - a completed exchange admits the request unchanged;
//! - a negotiation attempt against a gate whose initialization was
//!   skipped answers `403`.
//!
//! Per-request failures (malformed base64, expired tickets, clock
//! skew) never surface as server errors; they degrade to a fresh
//! challenge so the client can retry with a new leg.
//!
//! ## Usage
//!
//! The host pipeline evaluates each request and applies the outcome to
//! its response channel:
//!
//! ```
//! use spnego_gate::{
//!     Error, GateConfig, HeaderMap, NegotiationGate, Outcome, TokenOutcome, TokenProcessor,
//! };
//!
//! struct AcceptAll;
//!
//! impl TokenProcessor for AcceptAll {
//!     fn process(&mut self, _client_token: &[u8]) -> Result<TokenOutcome, Error> {
//!         Ok(TokenOutcome::accepted(None))
//!     }
//! }
//!
//! # fn main() -> Result<(), spnego_gate::Error> {
//! let config = GateConfig::new("HTTP/gw.example.com", "EXAMPLE.COM", "/etc/gw.keytab");
//! let gate = NegotiationGate::with_processor(config, AcceptAll)?;
//!
//! // A request without credentials is challenged.
//! assert_eq!(gate.evaluate(&HeaderMap::new()), Outcome::Challenge(None));
//! # Ok(())
//! # }
//! ```
//!
//! `spnego_gate::write_response` then translates the outcome into the
//! status code, challenge header and body suppression of the wire
//! contract, and tells the pipeline whether to keep processing.
//!
//! ## Optional features
//!
//! - **gssapi**: provides `GssTokenProcessor`, a real token processor
//!   on top of the system GSS-API via `cross-krb5` (MIT krb5/Heimdal on
//!   Unix, SSPI on Windows), and `NegotiationGate::initialize` to build
//!   a gate from configuration alone.

mod codec;
mod error;
mod gate;
mod processor;
mod response;

#[cfg(feature = "gssapi")]
mod gssapi;

pub use self::error::Error;
pub use self::gate::{GateConfig, NegotiationGate, Outcome};
pub use self::processor::{TokenOutcome, TokenProcessor};
pub use self::response::{write_response, GateResponse, ResponseChannel};

#[cfg(feature = "gssapi")]
pub use self::gssapi::GssTokenProcessor;

pub use http::header;
pub use http::HeaderMap;
pub use http::StatusCode;

/// A `Result` alias where the `Err` case is `spnego_gate::Error`.
pub type Result<T> = std::result::Result<T, Error>;
