//! Deterministic source assembly for a routine build.

use kestrel_common::{ContentHash, Precision};
use std::borrow::Cow;
use std::fmt;

use crate::define::Define;

/// The common header included in every routine, after all defines.
pub const COMMON_HEADER: &str = include_str!("../kernels/common.cl");

/// Complete source text for one routine build.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
}

impl SourceText {
    /// Returns the source as a string slice.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the source, returning the owned string.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Length of the source in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the source is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Hash of the source text, for logging and reproducibility checks.
    pub fn fingerprint(&self) -> ContentHash {
        ContentHash::from_bytes(self.text.as_bytes())
    }
}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceText")
            .field("len", &self.text.len())
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl AsRef<str> for SourceText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Builds routine source as a pure left-to-right concatenation of:
///
/// 1. the caller's base preamble,
/// 2. `#define PRECISION <tag>`,
/// 3. `#define ROUTINE_<name>`,
/// 4. the device tuning defines, in the order given,
/// 5. the common header,
/// 6. every routine fragment, verbatim and in order.
///
/// Nothing is elided, reordered, or deduplicated.
#[derive(Clone, Debug)]
pub struct SourceAssembler {
    common_header: Cow<'static, str>,
}

impl SourceAssembler {
    /// Creates an assembler using the built-in [`COMMON_HEADER`].
    pub fn new() -> Self {
        Self {
            common_header: Cow::Borrowed(COMMON_HEADER),
        }
    }

    /// Creates an assembler with a custom common header.
    pub fn with_common_header(header: impl Into<Cow<'static, str>>) -> Self {
        Self {
            common_header: header.into(),
        }
    }

    /// Returns the common header block.
    pub fn common_header(&self) -> &str {
        &self.common_header
    }

    /// Assembles the source text for one routine build.
    pub fn assemble<S: AsRef<str>>(
        &self,
        preamble: &str,
        precision: Precision,
        routine: &str,
        tuning: &[Define],
        fragments: &[S],
    ) -> SourceText {
        let precision_define = Define::precision(precision).to_string();
        let routine_define = Define::routine(routine).to_string();
        let tuning_defines: Vec<String> = tuning.iter().map(Define::to_string).collect();

        let capacity = preamble.len()
            + precision_define.len()
            + routine_define.len()
            + tuning_defines.iter().map(String::len).sum::<usize>()
            + self.common_header.len()
            + fragments.iter().map(|f| f.as_ref().len()).sum::<usize>();

        let mut text = String::with_capacity(capacity);
        text.push_str(preamble);
        text.push_str(&precision_define);
        text.push_str(&routine_define);
        for define in &tuning_defines {
            text.push_str(define);
        }
        text.push_str(&self.common_header);
        for fragment in fragments {
            text.push_str(fragment.as_ref());
        }

        SourceText { text }
    }
}

impl Default for SourceAssembler {
    fn default() -> Self {
        Self::new()
    }
}
