//! Reading and checking client input files.

use std::fs;
use std::path::Path;

use crate::cipher::symbol_value;
use crate::error::{Error, Result, ValidationError};

/// Read `path` as text, dropping one trailing newline.
pub fn read_file(path: &Path) -> Result<String> {
    let mut contents =
        fs::read_to_string(path).map_err(|e| Error::io(format!("reading {}", path.display()), e))?;
    if contents.ends_with('\n') {
        contents.pop();
    }
    Ok(contents)
}

/// Check every character of `buffer` is a capital letter or a space.
///
/// `what` names the input in the error.
pub fn validate_buffer(buffer: &str, what: &str) -> std::result::Result<(), ValidationError> {
    match buffer.chars().enumerate().find(|(_, c)| symbol_value(*c).is_none()) {
        Some((position, ch)) => {
            Err(ValidationError::InvalidCharacter { what: what.to_string(), ch, position })
        },
        None => Ok(()),
    }
}
