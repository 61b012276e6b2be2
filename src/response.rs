// src/response.rs

//! Translation of a gate [`Outcome`] into the concrete HTTP response
//! contract: status code, `WWW-Authenticate` challenge and body
//! suppression.

use http::header::WWW_AUTHENTICATE;
use http::{HeaderName, HeaderValue, StatusCode};

use crate::codec;
use crate::gate::Outcome;

/// The response a gate outcome maps to, as one explicit value: status,
/// optional challenge header, body suppression and the admit flag.
/// [`write_response`] applies it to the host channel as one set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateResponse {
    status: StatusCode,
    www_authenticate: Option<HeaderValue>,
    suppress_body: bool,
    admit: bool,
}

impl GateResponse {
    pub fn from_outcome(outcome: &Outcome) -> GateResponse {
        match outcome {
            Outcome::Admit => GateResponse {
                status: StatusCode::OK,
                www_authenticate: None,
                suppress_body: false,
                admit: true,
            },
            Outcome::Challenge(server_token) => GateResponse {
                status: StatusCode::UNAUTHORIZED,
                www_authenticate: Some(codec::challenge_value(server_token.as_deref())),
                suppress_body: true,
                admit: false,
            },
            Outcome::Forbidden => GateResponse {
                status: StatusCode::FORBIDDEN,
                www_authenticate: None,
                suppress_body: true,
                admit: false,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn www_authenticate(&self) -> Option<&HeaderValue> {
        self.www_authenticate.as_ref()
    }

    pub fn body_suppressed(&self) -> bool {
        self.suppress_body
    }

    pub fn is_admit(&self) -> bool {
        self.admit
    }
}

/// Per-request response surface the host pipeline exposes to the gate.
///
/// Mirrors what a message-processing pipeline typically offers a
/// handler: mutate the outbound status and headers, suppress the body,
/// mark the message as already answered so no further routing happens,
/// and trigger transmission.
pub trait ResponseChannel {
    fn set_status(&mut self, status: StatusCode);

    /// Drop every header already staged on the response, so nothing
    /// from an earlier handler stage leaks into the challenge.
    fn clear_headers(&mut self);

    fn insert_header(&mut self, name: HeaderName, value: HeaderValue);

    fn suppress_body(&mut self);

    /// Mark the message as a response that must not be routed to a
    /// backend.
    fn mark_responded(&mut self);

    fn send(&mut self) -> std::io::Result<()>;
}

/// Apply `outcome` to the channel and report whether the host pipeline
/// should continue processing the request.
///
/// Admitted requests leave the channel untouched apart from the status
/// and flow onward. Every other outcome is answered here: headers are
/// cleared first, then the outcome's status, challenge header and body
/// suppression are applied as one set and the response is sent. A
/// transport failure while sending is logged and swallowed; it reports
/// as not-admitted, never as success.
pub fn write_response<C: ResponseChannel>(outcome: &Outcome, channel: &mut C) -> bool {
    let response = GateResponse::from_outcome(outcome);
    if response.is_admit() {
        channel.set_status(response.status());
        return true;
    }

    channel.clear_headers();
    channel.set_status(response.status());
    if let Some(value) = response.www_authenticate() {
        channel.insert_header(WWW_AUTHENTICATE, value.clone());
    }
    channel.suppress_body();
    channel.mark_responded();
    if let Err(e) = channel.send() {
        let e = crate::error::transport(e);
        log::warn!("Failed to send {} response: {e}", response.status());
    }
    false
}
