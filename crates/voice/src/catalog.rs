//! Fallback voices for speakers the script does not list.

use rand::seq::SliceRandom;
use rand::Rng;
use sitcom_common::{SitcomError, SitcomResult};
use sitcom_script_model::{Character, Script};

/// Pool of narrator voices used when a clip's speaker is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCatalog {
    narrators: Vec<Character>,
}

impl VoiceCatalog {
    /// Catalog with a custom narrator pool. The pool must not be empty.
    pub fn new(narrators: Vec<Character>) -> SitcomResult<Self> {
        if narrators.is_empty() {
            return Err(SitcomError::config("narrator pool must not be empty"));
        }
        Ok(Self { narrators })
    }

    pub fn narrators(&self) -> &[Character] {
        &self.narrators
    }

    /// Any narrator, uniformly at random.
    pub fn pick_narrator<R: Rng + ?Sized>(&self, rng: &mut R) -> &Character {
        // `new` guarantees a non-empty pool.
        self.narrators
            .choose(rng)
            .unwrap_or(&self.narrators[0])
    }

    /// The script's character named `speaker`, or a random narrator.
    pub fn resolve<'a, R: Rng + ?Sized>(
        &'a self,
        script: &'a Script,
        speaker: &str,
        rng: &mut R,
    ) -> &'a Character {
        match script.find_character(speaker) {
            Some(character) => character,
            None => {
                let narrator = self.pick_narrator(rng);
                tracing::info!(
                    speaker,
                    voice_token = %narrator.voice_token,
                    "Unknown speaker, using narrator voice"
                );
                narrator
            }
        }
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        const NARRATOR_TOKENS: [&str; 6] = [
            "TM:3sm5xyjnzdxe",
            "TM:0805g5ejkxr1",
            "TM:785dsnba43hk",
            "TM:qz7nhpwqw6bw",
            "TM:xrk8qhm6cb6r",
            "TM:mc2kebvfwr1p",
        ];
        Self {
            narrators: NARRATOR_TOKENS
                .iter()
                .map(|token| Character::new("Narrator", *token))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sitcom_script_model::ScriptMetadata;

    #[test]
    fn test_empty_pool_rejected() {
        assert!(VoiceCatalog::new(vec![]).is_err());
    }

    #[test]
    fn test_known_speaker_uses_own_voice() {
        let script = Script::new(
            vec![Character::new("Kermit", "TM:kermit")],
            vec![],
            ScriptMetadata::default(),
        );
        let catalog = VoiceCatalog::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            catalog.resolve(&script, "Kermit", &mut rng).voice_token,
            "TM:kermit"
        );
    }

    #[test]
    fn test_unknown_speaker_gets_narrator() {
        let script = Script::default();
        let catalog = VoiceCatalog::default();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..20 {
            let voice = catalog.resolve(&script, "Nobody", &mut rng);
            assert!(catalog.narrators().contains(voice));
        }
    }
}
