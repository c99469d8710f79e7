//! One-time pad over the 27-symbol alphabet.
//!
//! Space is symbol 0 and `A`..`Z` are symbols 1..26. Encryption adds the key
//! symbol to the text symbol, decryption subtracts it, both modulo 27.

use crate::error::ValidationError;

/// Number of symbols in the alphabet.
pub const ALPHABET_LEN: i32 = 27;

/// Which way the pad is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `(t + k) mod 27`
    Encrypt,
    /// `(t - k) mod 27`
    Decrypt,
}

/// Mathematical modulus: the result always lies in `[0, b)` for `b > 0`,
/// unlike `%` which keeps the sign of `a`.
pub fn modulo(a: i32, b: i32) -> i32 {
    ((a % b) + b) % b
}

/// Symbol index of `c`, or `None` when `c` is outside the alphabet.
pub fn symbol_value(c: char) -> Option<i32> {
    match c {
        ' ' => Some(0),
        'A'..='Z' => Some(c as i32 - 'A' as i32 + 1),
        _ => None,
    }
}

/// Character for a symbol index in `0..27`.
pub fn symbol_char(n: i32) -> Option<char> {
    match n {
        0 => Some(' '),
        1..=26 => Some((b'A' + (n - 1) as u8) as char),
        _ => None,
    }
}

fn value_at(c: char, what: &str, position: usize) -> Result<i32, ValidationError> {
    symbol_value(c).ok_or_else(|| ValidationError::InvalidCharacter {
        what: what.to_string(),
        ch: c,
        position,
    })
}

/// Apply the pad to `text` using the leading symbols of `key`.
///
/// The result has exactly as many symbols as `text`. A key shorter than the
/// text, or a character outside the alphabet in either input, is an error
/// rather than being truncated or wrapped.
pub fn transform(text: &str, key: &str, direction: Direction) -> Result<String, ValidationError> {
    let text_len = text.chars().count();
    let key_len = key.chars().count();
    if key_len < text_len {
        return Err(ValidationError::KeyTooShort { key_len, text_len });
    }

    text.chars()
        .zip(key.chars())
        .enumerate()
        .map(|(i, (t, k))| {
            let t = value_at(t, "text", i)?;
            let k = value_at(k, "key", i)?;
            let r = match direction {
                Direction::Encrypt => modulo(t + k, ALPHABET_LEN),
                Direction::Decrypt => modulo(t - k, ALPHABET_LEN),
            };
            // modulo keeps r in 0..27, which always maps back to a symbol
            Ok(symbol_char(r).unwrap_or(' '))
        })
        .collect()
}

/// `transform(text, key, Direction::Encrypt)`
pub fn encrypt(plaintext: &str, key: &str) -> Result<String, ValidationError> {
    transform(plaintext, key, Direction::Encrypt)
}

/// `transform(text, key, Direction::Decrypt)`
pub fn decrypt(ciphertext: &str, key: &str) -> Result<String, ValidationError> {
    transform(ciphertext, key, Direction::Decrypt)
}
