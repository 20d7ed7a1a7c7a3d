//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use std::fmt;

/// Errors surfaced by recoverable runtime operations.
///
/// Programmer errors (popping the root context, unbalanced deferred ranges, indexing an arena
/// with an id it never issued) are assertions, not variants of this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A configuration field is out of its accepted range.
    InvalidConfig(&'static str),
    /// Interning a label would push the label arena past its ceiling.
    LabelArenaExhausted {
        /// Bytes the arena would need to hold after interning.
        requested: usize,
        /// Configured ceiling in bytes.
        ceiling: usize,
    },
    /// An interaction state mask did not have exactly one bit set.
    AmbiguousInteractionState(u32),
    /// Neither the requested family nor the configured default family could be loaded.
    FontUnavailable {
        /// Family that was requested.
        family: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            Self::LabelArenaExhausted { requested, ceiling } => {
                write!(f, "label arena exhausted: {requested} bytes requested, ceiling is {ceiling}")
            }
            Self::AmbiguousInteractionState(bits) => {
                write!(f, "interaction state {bits:#b} must have exactly one bit set")
            }
            Self::FontUnavailable { family } => write!(f, "no font available for family '{family}'"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_bits() {
        let msg = Error::AmbiguousInteractionState(0b110).to_string();
        assert!(msg.contains("0b110"));
    }

    #[test]
    fn display_mentions_ceiling() {
        let msg = Error::LabelArenaExhausted { requested: 40, ceiling: 32 }.to_string();
        assert!(msg.contains("40") && msg.contains("32"));
    }
}
