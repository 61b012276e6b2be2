// src/gssapi.rs

//! GSS-API backed token processor built on `cross-krb5`
//! (MIT krb5/Heimdal on Unix, SSPI on Windows).
//!
//! Acceptor state is rebuilt from scratch for every call: each inbound
//! token is stepped through a fresh server context and whatever the
//! context emits (completion or a continuation token) is surfaced as
//! the outcome.

use std::env;
use std::fs;

use cross_krb5::{AcceptFlags, K5ServerCtx, ServerCtx, Step};

use crate::gate::GateConfig;
use crate::processor::{TokenOutcome, TokenProcessor};
use crate::Error;

/// Token processor accepting tokens for one service principal.
pub struct GssTokenProcessor {
    principal: String,
}

/// Qualify the service principal with the realm unless it already
/// carries one, e.g. `HTTP/gw.example.com` -> `HTTP/gw.example.com@EXAMPLE.COM`.
fn qualified_principal(server_principal: &str, realm: &str) -> String {
    if server_principal.contains('@') {
        server_principal.to_string()
    } else {
        format!("{server_principal}@{realm}")
    }
}

impl GssTokenProcessor {
    /// Bind a processor to the configured principal and keytab.
    ///
    /// Acceptor credentials are acquired here so that a bad principal,
    /// an unreadable keytab or a realm mismatch aborts deployment
    /// instead of failing per request.
    pub fn new(config: &GateConfig) -> Result<GssTokenProcessor, Error> {
        fs::metadata(config.keytab_path()).map_err(|e| {
            crate::error::config(format!(
                "keytab {} is not readable: {e}",
                config.keytab_path()
            ))
        })?;
        // The system GSS library locates the acceptor keytab through
        // the environment.
        env::set_var("KRB5_KTNAME", config.keytab_path());

        let principal = qualified_principal(config.server_principal(), config.realm());
        ServerCtx::new(AcceptFlags::NEGOTIATE_TOKEN, Some(&principal))
            .map_err(|e| crate::error::config(format!("acceptor credentials for {principal}: {e}")))?;

        Ok(GssTokenProcessor { principal })
    }
}

impl TokenProcessor for GssTokenProcessor {
    fn process(&mut self, client_token: &[u8]) -> Result<TokenOutcome, Error> {
        let pending = ServerCtx::new(AcceptFlags::NEGOTIATE_TOKEN, Some(&self.principal))
            .map_err(|e| crate::error::negotiation(e.to_string()))?;

        match pending
            .step(client_token)
            .map_err(|e| crate::error::negotiation(e.to_string()))?
        {
            Step::Finished((mut ctx, server_token)) => {
                if let Ok(client) = ctx.client() {
                    log::debug!("Accepted Kerberos client {client}.");
                }
                if server_token.is_some() {
                    log::debug!("Mutual authentication token emitted for client.");
                }
                Ok(TokenOutcome::accepted(server_token.map(|t| t.to_vec())))
            }
            Step::Continue((_, server_token)) => {
                Ok(TokenOutcome::incomplete(Some(server_token.to_vec())))
            }
        }
    }
}
