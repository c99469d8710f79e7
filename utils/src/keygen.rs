//! Random keys over the cipher alphabet.
//!
//! Not suitable for real secrecy: the generator is whatever `rng` is, and
//! the binary uses the thread-local PRNG.

use rand::Rng;

use crate::cipher::{symbol_char, ALPHABET_LEN};

/// `length` symbols drawn uniformly from the 27-symbol alphabet.
pub fn generate_key<R: Rng>(length: usize, rng: &mut R) -> String {
    (0..length).map(|_| symbol_char(rng.gen_range(0..ALPHABET_LEN)).unwrap_or(' ')).collect()
}
