use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// A team abbreviation such as `"TOR"` or `"VGK"`.
///
/// Codes are compared exactly; normalizing source-specific spellings
/// (`"L.A"` vs `"LAK"`) happens before data reaches this crate. The ordering
/// is alphabetical, which the engine uses as its deterministic tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamCode(String);

impl TeamCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TeamCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TeamCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}
