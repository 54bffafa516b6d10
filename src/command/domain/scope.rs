//! Deployment scopes: which remote command set a root node lives in.

use super::GuildId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which remote command set a root node is registered into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentScope {
    /// Commands available everywhere the application is installed.
    #[default]
    Global,
    /// Commands available in one guild only.
    Guild(GuildId),
}

impl fmt::Display for DeploymentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Guild(id) => write!(f, "guild {id}"),
        }
    }
}
