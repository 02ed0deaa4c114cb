use crate::core::{CodecError, Data};

/// Byte appended by the producer after the UTF-8 text.
pub const TERMINATOR: u8 = 0;

/// What the consumer does with the trailing terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Terminator {
    /// Remove exactly one trailing terminator; fail if it is missing.
    #[default]
    Strip,
    /// Return the text as received, terminator included.
    Keep,
}

pub fn encode_text(text: &str) -> Data {
    let mut out = Vec::with_capacity(text.len() + 1);
    out.extend_from_slice(text.as_bytes());
    out.push(TERMINATOR);
    Data::from(out)
}

pub fn decode_text(bytes: &[u8], terminator: Terminator) -> Result<String, CodecError> {
    let body = match terminator {
        Terminator::Strip => match bytes.split_last() {
            Some((&TERMINATOR, body)) => body,
            _ => return Err(CodecError::MissingTerminator),
        },
        Terminator::Keep => bytes,
    };

    std::str::from_utf8(body)
        .map(str::to_owned)
        .map_err(|e| CodecError::InvalidUtf8(e.to_string()))
}
