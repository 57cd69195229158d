//! Positional token access

use crate::error::DecodeError;

/// Whitespace-split view of a message body with typed, positional accessors.
pub(crate) struct Tokens<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    pub(crate) fn split(text: &'a str) -> Self {
        Self { tokens: text.split_ascii_whitespace().collect() }
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).copied()
    }

    /// Fail with `Truncated` unless at least `expected` tokens are present.
    pub(crate) fn require(&self, expected: usize) -> Result<(), DecodeError> {
        if self.len() < expected {
            return Err(DecodeError::Truncated { expected, found: self.len() });
        }
        Ok(())
    }

    /// Parse the token at `index` as a byte value.
    pub(crate) fn byte(&self, index: usize) -> Result<u8, DecodeError> {
        let token = self
            .get(index)
            .ok_or(DecodeError::Truncated { expected: index + 1, found: self.len() })?;

        token
            .parse::<u8>()
            .map_err(|_| DecodeError::MalformedToken { index, token: token.to_string() })
    }

    /// Parse `N` consecutive byte tokens starting at `start`.
    pub(crate) fn bytes<const N: usize>(&self, start: usize) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        for (offset, slot) in out.iter_mut().enumerate() {
            *slot = self.byte(start + offset)?;
        }
        Ok(out)
    }
}

/// Compose little-endian byte values: `b0 + b1*256 + b2*65536 + b3*16777216`.
pub(crate) fn compose_le(bytes: &[u8]) -> u32 {
    bytes.iter().rev().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}
