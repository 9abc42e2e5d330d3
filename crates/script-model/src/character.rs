//! Speaking characters and their voices.

use serde::{Deserialize, Serialize};

/// A character in a script and the provider voice that speaks for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Character {
    /// Name used by clips in their `speaker` field.
    pub name: String,

    /// Provider voice model token (e.g. `TM:3sm5xyjnzdxe`).
    pub voice_token: String,
}

impl Character {
    pub fn new(name: impl Into<String>, voice_token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            voice_token: voice_token.into(),
        }
    }
}
