// src/gate.rs

//! The negotiation gate: classifies an inbound request, advances the
//! Kerberos exchange and produces the outcome the response layer acts
//! on.

use std::sync::Mutex;

use http::header::AUTHORIZATION;
use http::HeaderMap;

use crate::codec::{self, Decoded};
use crate::processor::TokenProcessor;
use crate::Error;

/// Startup configuration for a gate instance.
///
/// All three parameters are required; validation happens once at
/// initialization and a missing value aborts deployment rather than
/// failing per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    server_principal: String,
    realm: String,
    keytab_path: String,
}

impl GateConfig {
    pub fn new(
        server_principal: impl Into<String>,
        realm: impl Into<String>,
        keytab_path: impl Into<String>,
    ) -> GateConfig {
        GateConfig {
            server_principal: server_principal.into(),
            realm: realm.into(),
            keytab_path: keytab_path.into(),
        }
    }

    /// The service principal tokens are accepted for, e.g. `HTTP/host`.
    pub fn server_principal(&self) -> &str {
        &self.server_principal
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn keytab_path(&self) -> &str {
        &self.keytab_path
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.server_principal.is_empty() {
            return Err(crate::error::config("server principal parameter is empty"));
        }
        if self.realm.is_empty() {
            return Err(crate::error::config("realm parameter is empty"));
        }
        if self.keytab_path.is_empty() {
            return Err(crate::error::config("keytab path parameter is empty"));
        }
        Ok(())
    }
}

/// Per-request decision produced by [`NegotiationGate::evaluate`].
///
/// Constructed and consumed within one request; the gate keeps no
/// cross-request negotiation state of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The exchange completed; forward the request downstream.
    Admit,
    /// Challenge the client with `WWW-Authenticate: Negotiate`,
    /// optionally carrying a server continuation token for the next
    /// leg.
    Challenge(Option<Vec<u8>>),
    /// A negotiation was attempted but no token processor is
    /// configured; deny outright.
    Forbidden,
}

/// Inline gate enforcing SPNEGO authentication on inbound requests.
///
/// One gate owns one [`TokenProcessor`] for its whole lifetime, shared
/// by every concurrent request. GSS-API acceptor state is not assumed
/// reentrant, so `process` calls are serialized behind a lock;
/// head-of-line blocking is the cost of that guarantee.
pub struct NegotiationGate {
    config: GateConfig,
    processor: Option<Mutex<Box<dyn TokenProcessor>>>,
}

impl std::fmt::Debug for NegotiationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NegotiationGate")
            .field("config", &self.config)
            .field("processor", &self.processor.as_ref().map(|_| "<processor>"))
            .finish()
    }
}

impl NegotiationGate {
    /// Build a gate around a host-supplied token processor.
    ///
    /// Fails with a configuration error if any required parameter is
    /// empty.
    pub fn with_processor<P>(config: GateConfig, processor: P) -> Result<NegotiationGate, Error>
    where
        P: TokenProcessor + 'static,
    {
        config.validate()?;
        Ok(NegotiationGate {
            config,
            processor: Some(Mutex::new(Box::new(processor))),
        })
    }

    /// Build a gate backed by the system GSS-API.
    ///
    /// Processor construction failure (bad principal, missing keytab,
    /// realm mismatch) is fatal and must abort deployment.
    #[cfg(feature = "gssapi")]
    pub fn initialize(config: GateConfig) -> Result<NegotiationGate, Error> {
        config.validate()?;
        let processor = crate::gssapi::GssTokenProcessor::new(&config)?;
        Ok(NegotiationGate {
            config,
            processor: Some(Mutex::new(Box::new(processor))),
        })
    }

    /// Build a gate whose initialization was skipped.
    ///
    /// Such a gate refuses every negotiation attempt with
    /// [`Outcome::Forbidden`].
    pub fn disabled(config: GateConfig) -> NegotiationGate {
        NegotiationGate {
            config,
            processor: None,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Classify the request and advance the negotiation by one leg.
    ///
    /// One call is one terminal pass: no retries happen here, and a
    /// multi-leg exchange is driven by the client re-issuing a request
    /// with the continuation token from the previous challenge. Every
    /// per-request failure (malformed header, processor error) degrades
    /// to a tokenless challenge so the client can start a fresh leg.
    pub fn evaluate(&self, headers: &HeaderMap) -> Outcome {
        let authorization = match headers.get(AUTHORIZATION) {
            Some(value) => value,
            None => return Outcome::Challenge(None),
        };
        let authorization = match authorization.to_str() {
            Ok(value) => value,
            Err(_) => {
                log::debug!("Authorization header is not valid UTF-8.");
                return Outcome::Challenge(None);
            }
        };

        match codec::decode_authorization(authorization) {
            Decoded::NotNegotiate => {
                log::debug!("Negotiate header is missing.");
                Outcome::Challenge(None)
            }
            Decoded::Malformed => {
                if self.processor.is_none() {
                    return Outcome::Forbidden;
                }
                Outcome::Challenge(None)
            }
            Decoded::Token(client_token) => match self.processor.as_ref() {
                Some(processor) => self.process_token(processor, &client_token),
                None => Outcome::Forbidden,
            },
        }
    }

    fn process_token(
        &self,
        processor: &Mutex<Box<dyn TokenProcessor>>,
        client_token: &[u8],
    ) -> Outcome {
        let mut processor = match processor.lock() {
            Ok(guard) => guard,
            Err(_) => {
                log::warn!("Token processor lock is poisoned; re-challenging client.");
                return Outcome::Challenge(None);
            }
        };
        match processor.process(client_token) {
            Ok(outcome) => {
                if outcome.is_successful() {
                    Outcome::Admit
                } else {
                    log::debug!(
                        "More tokens are expected to be supplied to complete the exchange."
                    );
                    Outcome::Challenge(outcome.into_server_token())
                }
            }
            Err(e) => {
                log::debug!("Token processing failed: {e}");
                Outcome::Challenge(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::TokenOutcome;
    use http::HeaderValue;

    struct FixedProcessor(Result<TokenOutcome, ()>);

    impl TokenProcessor for FixedProcessor {
        fn process(&mut self, _client_token: &[u8]) -> Result<TokenOutcome, Error> {
            self.0
                .clone()
                .map_err(|_| crate::error::negotiation("context failure"))
        }
    }

    fn config() -> GateConfig {
        GateConfig::new("HTTP/gateway.example.com", "EXAMPLE.COM", "/etc/gateway.keytab")
    }

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(authorization).unwrap());
        headers
    }

    #[test]
    fn test_config_requires_principal() {
        let err = GateConfig::new("", "EXAMPLE.COM", "/etc/gateway.keytab")
            .validate()
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_config_requires_realm() {
        let err = GateConfig::new("HTTP/gw", "", "/etc/gateway.keytab")
            .validate()
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_config_requires_keytab() {
        let err = GateConfig::new("HTTP/gw", "EXAMPLE.COM", "")
            .validate()
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_with_processor_rejects_empty_config() {
        let config = GateConfig::new("", "", "");
        let result =
            NegotiationGate::with_processor(config, FixedProcessor(Ok(TokenOutcome::accepted(None))));
        assert!(result.unwrap_err().is_config());
    }

    #[test]
    fn test_missing_header_challenges() {
        let gate =
            NegotiationGate::with_processor(config(), FixedProcessor(Ok(TokenOutcome::accepted(None))))
                .unwrap();
        assert_eq!(gate.evaluate(&HeaderMap::new()), Outcome::Challenge(None));
    }

    #[test]
    fn test_successful_token_admits() {
        let gate =
            NegotiationGate::with_processor(config(), FixedProcessor(Ok(TokenOutcome::accepted(None))))
                .unwrap();
        assert_eq!(gate.evaluate(&headers("Negotiate dG9rZW4=")), Outcome::Admit);
    }

    #[test]
    fn test_incomplete_token_challenges_with_continuation() {
        let gate = NegotiationGate::with_processor(
            config(),
            FixedProcessor(Ok(TokenOutcome::incomplete(Some(b"next-leg".to_vec())))),
        )
        .unwrap();
        assert_eq!(
            gate.evaluate(&headers("Negotiate dG9rZW4=")),
            Outcome::Challenge(Some(b"next-leg".to_vec()))
        );
    }

    #[test]
    fn test_processor_error_challenges_without_token() {
        let gate = NegotiationGate::with_processor(config(), FixedProcessor(Err(()))).unwrap();
        assert_eq!(
            gate.evaluate(&headers("Negotiate dG9rZW4=")),
            Outcome::Challenge(None)
        );
    }

    #[test]
    fn test_disabled_gate_forbids_negotiation() {
        let gate = NegotiationGate::disabled(config());
        assert_eq!(gate.evaluate(&headers("Negotiate dG9rZW4=")), Outcome::Forbidden);
        // A matching scheme is enough to forbid, even with a bad payload.
        assert_eq!(
            gate.evaluate(&headers("Negotiate not!!valid##base64")),
            Outcome::Forbidden
        );
    }

    #[test]
    fn test_disabled_gate_still_challenges_missing_header() {
        let gate = NegotiationGate::disabled(config());
        assert_eq!(gate.evaluate(&HeaderMap::new()), Outcome::Challenge(None));
        assert_eq!(
            gate.evaluate(&headers("Bearer abcdef")),
            Outcome::Challenge(None)
        );
    }
}
