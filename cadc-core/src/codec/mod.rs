//! Digit-pair substitution codec used to turn exponent digits into archive
//! file names and back.

use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::trace;

pub mod table;

/// Emitted for a chunk with no table entry; encoding never fails.
pub const UNKNOWN_TOKEN: &str = "??";

pub struct Codec {
    forward: HashMap<&'static str, &'static str>,
    reverse: HashMap<&'static str, &'static str>,
}

static SHARED: LazyLock<Codec> = LazyLock::new(Codec::new);

/// Process-wide codec, built on first use and never mutated afterwards.
pub fn codec() -> &'static Codec {
    &SHARED
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec {
    pub fn new() -> Self {
        let forward: HashMap<_, _> = table::TOKENS.iter().copied().collect();
        let reverse = table::TOKENS.iter().map(|&(k, v)| (v, k)).collect();
        Self { forward, reverse }
    }

    /// Encode a digit string. Odd-length input is left-padded with one `0`.
    pub fn encode(&self, digits: &str) -> String {
        let mut chars: Vec<char> = digits.chars().collect();
        if chars.len() % 2 != 0 {
            chars.insert(0, '0');
        }

        let mut out = String::with_capacity(chars.len());
        let mut chunk = String::with_capacity(2);
        for pair in chars.chunks(2) {
            chunk.clear();
            chunk.extend(pair);
            let token = self
                .forward
                .get(chunk.as_str())
                .copied()
                .unwrap_or(UNKNOWN_TOKEN);
            out.push_str(token);
        }
        out
    }

    /// Greedy longest-match decode. Characters that match no token are
    /// dropped. One leading `0` is stripped to undo the encode-time pad.
    pub fn decode(&self, tokens: &str) -> String {
        let chars: Vec<char> = tokens.chars().collect();
        let mut out = String::with_capacity(chars.len());
        let mut window = String::with_capacity(8);
        let mut i = 0;

        while i < chars.len() {
            if i + 2 <= chars.len() {
                window.clear();
                window.extend(&chars[i..i + 2]);
                if let Some(orig) = self.reverse.get(window.as_str()) {
                    out.push_str(orig);
                    i += 2;
                    continue;
                }
            }

            window.clear();
            window.push(chars[i]);
            match self.reverse.get(window.as_str()) {
                Some(orig) => out.push_str(orig),
                None => trace!(ch = %chars[i], "skipping unknown codec character"),
            }
            i += 1;
        }

        if out.len() > 1 && out.starts_with('0') {
            out.remove(0);
        }
        out
    }
}
