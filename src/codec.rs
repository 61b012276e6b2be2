// src/codec.rs

//! Encoding and decoding of the base64 negotiation token carried in
//! HTTP headers.
//!
//! The wire form is `Authorization: Negotiate <base64(token)>` inbound
//! and `WWW-Authenticate: Negotiate [<base64(token)>]` outbound
//! (RFC 4559).

use base64::Engine as _;
use http::HeaderValue;

/// The authentication scheme this gate negotiates.
pub(crate) const NEGOTIATE: &str = "Negotiate";

/// Length of the scheme prefix inspected in the `Authorization` header,
/// the scheme name plus the separating space.
const SCHEME_PREFIX_LEN: usize = 10;

/// Result of decoding an `Authorization` header value.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Decoded {
    /// The scheme prefix did not match `Negotiate`; the request carries
    /// no credentials this gate understands.
    NotNegotiate,
    /// The scheme matched but the payload was not valid base64.
    Malformed,
    /// The decoded client token.
    Token(Vec<u8>),
}

/// Decode the raw `Authorization` header value into a client token.
///
/// The first ten characters (trimmed) must equal `Negotiate` exactly,
/// case-sensitively; anything else is classified as `NotNegotiate`.
/// The remainder is trimmed and base64-decoded.
pub(crate) fn decode_authorization(header: &str) -> Decoded {
    let prefix = match header.get(..SCHEME_PREFIX_LEN) {
        Some(prefix) => prefix,
        None => return Decoded::NotNegotiate,
    };
    if prefix.trim() != NEGOTIATE {
        return Decoded::NotNegotiate;
    }

    let payload = header[SCHEME_PREFIX_LEN..].trim();
    match base64::engine::general_purpose::STANDARD.decode(payload) {
        Ok(token) => Decoded::Token(token),
        Err(e) => {
            log::debug!("Negotiate token is not valid base64: {e}");
            Decoded::Malformed
        }
    }
}

/// Encode a server continuation token for embedding in a challenge
/// header. Output is plain ASCII and round-trips exactly.
pub(crate) fn encode_token(token: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(token)
}

/// Build the `WWW-Authenticate` value for a challenge, with or without
/// a server continuation token.
pub(crate) fn challenge_value(token: Option<&[u8]>) -> HeaderValue {
    match token {
        Some(token) => {
            let encoded = encode_token(token);
            // Base64 output never contains bytes invalid in a header
            // value, so construction cannot fail in practice.
            HeaderValue::from_str(&format!("{NEGOTIATE} {encoded}"))
                .unwrap_or_else(|_| HeaderValue::from_static(NEGOTIATE))
        }
        None => HeaderValue::from_static(NEGOTIATE),
    }
}
