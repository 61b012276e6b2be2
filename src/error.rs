// src/error.rs

//! Error type for the gate, grouped by the failure taxonomy the
//! negotiation protocol distinguishes: fatal configuration errors at
//! startup, and recoverable decode/negotiation/transport errors per
//! request.

use std::error::Error as StdError;
use std::fmt;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// The errors that may occur while initializing or operating the gate.
///
/// Only `Config` errors are fatal; the per-request kinds all degrade to
/// re-challenging the client and are never surfaced as a 5xx.
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    /// Missing or invalid startup configuration, or processor
    /// construction failure. Deployment must abort.
    Config,
    /// Malformed negotiation header payload.
    Decode,
    /// The underlying GSS-API/Kerberos layer rejected the exchange.
    Negotiation,
    /// Failure writing the response back to the client.
    Transport,
}

impl Error {
    pub(crate) fn new(kind: Kind, source: Option<BoxError>) -> Error {
        Error {
            inner: Box::new(Inner { kind, source }),
        }
    }

    /// Build a negotiation error around an underlying cause.
    ///
    /// This is the error a [`TokenProcessor`](crate::TokenProcessor)
    /// implementation returns when its cryptographic layer rejects an
    /// exchange; the gate answers it with a plain challenge.
    pub fn negotiation<E: Into<BoxError>>(source: E) -> Error {
        Error::new(Kind::Negotiation, Some(source.into()))
    }

    /// Returns true if the error is a fatal configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self.inner.kind, Kind::Config)
    }

    /// Returns true if the error came from decoding the negotiation header.
    pub fn is_decode(&self) -> bool {
        matches!(self.inner.kind, Kind::Decode)
    }

    /// Returns true if the error came from the token processor.
    pub fn is_negotiation(&self) -> bool {
        matches!(self.inner.kind, Kind::Negotiation)
    }

    /// Returns true if the error occurred while sending the response.
    pub fn is_transport(&self) -> bool {
        matches!(self.inner.kind, Kind::Transport)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("spnego_gate::Error");
        builder.field("kind", &self.inner.kind);
        if let Some(ref source) = self.inner.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            Kind::Config => f.write_str("gate configuration error")?,
            Kind::Decode => f.write_str("negotiation header decode error")?,
            Kind::Negotiation => f.write_str("token negotiation error")?,
            Kind::Transport => f.write_str("response transport error")?,
        }
        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

// constructors

pub(crate) fn config<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Config, Some(e.into()))
}

pub(crate) fn decode<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Decode, Some(e.into()))
}

pub(crate) fn negotiation<E: Into<BoxError>>(e: E) -> Error {
    Error::negotiation(e)
}

pub(crate) fn transport<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Transport, Some(e.into()))
}
