//! Parser combinators for native-endian netlink payloads.

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take;

use super::error::{Error, Result};

/// Result type for winnow parsers.
pub type PResult<T> = core::result::Result<T, ErrMode<ContextError>>;

/// Parse a native-endian u32.
pub fn parse_u32_ne(input: &mut &[u8]) -> PResult<u32> {
    let bytes: &[u8] = take(4usize).parse_next(input)?;
    Ok(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Parse a buffer made entirely of native-endian u32 words.
///
/// A length that is not a multiple of four is an error.
pub fn parse_u32_words(data: &[u8]) -> Result<Vec<u32>> {
    if data.len() % 4 != 0 {
        return Err(Error::InvalidAttribute(format!(
            "bitmap length {} is not a multiple of 4",
            data.len()
        )));
    }
    let mut input = data;
    let mut words = Vec::with_capacity(data.len() / 4);
    while !input.is_empty() {
        let word = parse_u32_ne(&mut input)
            .map_err(|e| Error::InvalidAttribute(format!("bitmap word: {e:?}")))?;
        words.push(word);
    }
    Ok(words)
}
