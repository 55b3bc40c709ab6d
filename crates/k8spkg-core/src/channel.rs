//! Release channels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Release maturity tier controlling which version policy applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Latest stable Kubernetes release
    Stable,

    /// Latest Kubernetes release including pre-releases
    Unstable,

    /// Latest CI build
    Nightly,
}

impl Channel {
    /// All channels in matrix order
    pub const ALL: [Channel; 3] = [Channel::Stable, Channel::Unstable, Channel::Nightly];

    /// Directory and template name of the channel
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Unstable => "unstable",
            Self::Nightly => "nightly",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stable" => Ok(Self::Stable),
            "unstable" => Ok(Self::Unstable),
            "nightly" => Ok(Self::Nightly),
            other => Err(Error::parse(other, "unknown release channel")),
        }
    }
}
