//! Opaque random tokens for OAuth state values and session tokens.
//!
//! Tokens are raw OS randomness rendered as lowercase hex, so a token of
//! `n` bytes is `2n` characters long.

use rand::rngs::OsRng;
use rand::TryRngCore;

/// Entropy of an OAuth `state` value, in bytes.
pub const STATE_BYTES: usize = 16;

/// Entropy of an issued session token, in bytes.
pub const SESSION_TOKEN_BYTES: usize = 32;

/// The operating system RNG could not be read.
#[derive(Debug, thiserror::Error)]
#[error("failed to generate random bytes: {0}")]
pub struct TokenGenerationError(String);

/// Generate `len` random bytes from the OS RNG, hex-encoded.
pub fn generate_token(len: usize) -> Result<String, TokenGenerationError> {
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| TokenGenerationError(e.to_string()))?;
    Ok(hex_encode(&bytes))
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_length_is_twice_the_entropy() {
        assert_eq!(generate_token(STATE_BYTES).unwrap().len(), 32);
        assert_eq!(generate_token(SESSION_TOKEN_BYTES).unwrap().len(), 64);
    }

    #[test]
    fn tokens_are_lowercase_hex() {
        let token = generate_token(SESSION_TOKEN_BYTES).unwrap();
        assert!(token.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn tokens_differ() {
        let a = generate_token(SESSION_TOKEN_BYTES).unwrap();
        let b = generate_token(SESSION_TOKEN_BYTES).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hex_encoding_pads_each_byte() {
        assert_eq!(hex_encode(&[0x00, 0x0f, 0xab]), "000fab");
    }
}
