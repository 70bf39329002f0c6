//! The `tagstr` source encoding.
//!
//! A host that declares `# coding: tagstr` hands the raw bytes of the file
//! to this codec. Decoding is UTF-8 followed by a rewrite; encoding is plain
//! UTF-8. The incremental decoder buffers until the final chunk, since a
//! rewrite needs the whole file.

use std::io::Read;

use tagstr_rewrite::{transform_str, TransformError};
use thiserror::Error;

pub const CODEC_NAME: &str = "tagstr";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("source is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle returned by [`lookup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecInfo {
    pub name: &'static str,
}

/// Find the codec by name. Only `tagstr` is known.
pub fn lookup(name: &str) -> Option<CodecInfo> {
    (name == CODEC_NAME).then_some(CodecInfo { name: CODEC_NAME })
}

impl CodecInfo {
    /// Decode and rewrite a complete input. Returns the text and the number
    /// of bytes consumed.
    pub fn decode(&self, input: &[u8]) -> Result<(String, usize), CodecError> {
        Ok((decode_and_transform(input)?, input.len()))
    }

    pub fn encode(&self, text: &str) -> (Vec<u8>, usize) {
        (text.as_bytes().to_vec(), text.chars().count())
    }

    pub fn incremental_decoder(&self) -> IncrementalDecoder {
        IncrementalDecoder::default()
    }

    /// Read everything from `reader` and decode it.
    pub fn read_to_string(&self, mut reader: impl Read) -> Result<String, CodecError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        decode_and_transform(&bytes)
    }
}

fn decode_and_transform(input: &[u8]) -> Result<String, CodecError> {
    let input = input.strip_prefix(b"\xef\xbb\xbf").unwrap_or(input);
    let text = std::str::from_utf8(input)?;
    Ok(transform_str(text)?)
}

/// Decoder fed in chunks. Output appears only on the final chunk.
#[derive(Clone, Debug, Default)]
pub struct IncrementalDecoder {
    buffer: Vec<u8>,
}

impl IncrementalDecoder {
    pub fn decode(&mut self, input: &[u8], last: bool) -> Result<String, CodecError> {
        self.buffer.extend_from_slice(input);
        if !last {
            return Ok(String::new());
        }
        let buffered = std::mem::take(&mut self.buffer);
        decode_and_transform(&buffered)
    }

    /// Drop buffered input.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Bytes waiting for the final chunk.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests;
