use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A supported retail site, identified on the wire by its lowercase key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Noon,
    Aliexpress,
    Shein,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Noon, Platform::Aliexpress, Platform::Shein];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Noon => "noon",
            Platform::Aliexpress => "aliexpress",
            Platform::Shein => "shein",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    /// Keys are matched exactly; `"Noon"` is not a supported platform.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::UnsupportedPlatform(s.to_string()))
    }
}
