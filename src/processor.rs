// src/processor.rs

//! The boundary to the GSS-API/Kerberos layer that validates client
//! tokens.
//!
//! The gate treats token validation as an opaque operation: hand over
//! the client's token bytes, get back whether the exchange is complete
//! and an optional server token for the next leg. The `gssapi` feature
//! provides a real implementation on top of the system Kerberos
//! libraries; hosts may plug in their own.

use crate::Error;

/// Result of processing one client token.
///
/// A multi-leg exchange emits continuation tokens before (and sometimes
/// with) the final success, so `server_token` may be present whether or
/// not the outcome is successful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOutcome {
    successful: bool,
    server_token: Option<Vec<u8>>,
}

impl TokenOutcome {
    /// The exchange is complete and the client is authenticated. A
    /// server token, if present, is the mutual-authentication token.
    pub fn accepted(server_token: Option<Vec<u8>>) -> TokenOutcome {
        TokenOutcome {
            successful: true,
            server_token,
        }
    }

    /// More legs are required; `server_token` carries the continuation
    /// token the client needs for its next attempt.
    pub fn incomplete(server_token: Option<Vec<u8>>) -> TokenOutcome {
        TokenOutcome {
            successful: false,
            server_token,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.successful
    }

    pub fn server_token(&self) -> Option<&[u8]> {
        self.server_token.as_deref()
    }

    pub(crate) fn into_server_token(self) -> Option<Vec<u8>> {
        self.server_token
    }
}

/// Validates client negotiation tokens.
///
/// Implementations are stateful in general (a GSS-API acceptor context
/// spans several calls), so `process` takes `&mut self`; the gate
/// serializes calls to a shared processor behind a lock.
///
/// A returned error is a per-request, recoverable failure (expired
/// ticket, bad mechanism, clock skew); the gate answers it with a plain
/// challenge rather than propagating it.
pub trait TokenProcessor: Send {
    fn process(&mut self, client_token: &[u8]) -> Result<TokenOutcome, Error>;
}
