//! Session token generation and validation.

use rand::{RngCore, rngs::OsRng};
use thiserror::Error;
use zeroize::Zeroize;

/// Session token identifier prefix.
pub const SESSION_TOKEN_PREFIX: &str = "bs";

/// Number of secret bytes encoded in a token.
pub const SESSION_TOKEN_SECRET_BYTES: usize = 32;

const SESSION_TOKEN_SECRET_HEX_CHARS: usize = SESSION_TOKEN_SECRET_BYTES * 2;

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("session token format is invalid")]
    InvalidFormat,
}

struct SessionSecret {
    bytes: [u8; SESSION_TOKEN_SECRET_BYTES],
}

impl Drop for SessionSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Generate a fresh opaque session token: `bs_` + 32 OS-random bytes,
/// hex-encoded.
#[must_use]
pub fn generate_session_token() -> String {
    let mut secret = SessionSecret {
        bytes: [0_u8; SESSION_TOKEN_SECRET_BYTES],
    };

    OsRng.fill_bytes(&mut secret.bytes);

    format!("{SESSION_TOKEN_PREFIX}_{}", encode_secret_hex(&secret.bytes))
}

/// Check that a presented token has the shape this module generates, before
/// it is ever used in a lookup.
///
/// # Errors
///
/// Returns an error for a wrong prefix, wrong length, or non-hex payload.
pub fn validate_session_token(token: &str) -> Result<(), SessionTokenError> {
    let (prefix, secret_hex) = token
        .split_once('_')
        .ok_or(SessionTokenError::InvalidFormat)?;

    if prefix != SESSION_TOKEN_PREFIX {
        return Err(SessionTokenError::InvalidFormat);
    }

    if secret_hex.len() != SESSION_TOKEN_SECRET_HEX_CHARS {
        return Err(SessionTokenError::InvalidFormat);
    }

    if !secret_hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SessionTokenError::InvalidFormat);
    }

    Ok(())
}

fn encode_secret_hex(secret: &[u8; SESSION_TOKEN_SECRET_BYTES]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(SESSION_TOKEN_SECRET_HEX_CHARS);

    for byte in secret {
        encoded.push(HEX[(byte >> 4) as usize] as char);
        encoded.push(HEX[(byte & 0x0f) as usize] as char);
    }

    encoded
}
