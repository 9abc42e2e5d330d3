//! Write an example script.

use std::path::PathBuf;

use sitcom_script_model::{Character, Clip, Script, ScriptMetadata};

pub fn run(path: PathBuf, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let script = example_script();
    script
        .save(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write script: {e}"))?;

    println!("Example script written to {}", path.display());
    println!("  Characters: {}", script.characters.len());
    println!("  Clips: {}", script.clips.len());
    println!();
    println!("Try it offline:");
    println!("  sitcom render --script-path {} --debug", path.display());

    Ok(())
}

fn example_script() -> Script {
    let mut opening = Clip::dialogue("Kermit", "Welcome to the show, everybody!");
    opening.image_prompt = Some("a green frog on a theater stage".to_string());
    let mut reply = Clip::dialogue("Gonzo", "Is it my turn yet?");
    reply.image_prompt = Some("a blue creature holding a trumpet".to_string());

    Script::new(
        vec![
            Character::new("Kermit", "TM:7e4d7a0y9ma0"),
            Character::new("Gonzo", "TM:0c6b1qk3zdrj"),
        ],
        vec![
            Clip::title_card("The Pilot", 2.0),
            opening,
            reply,
            Clip::dialogue("Narrator", "It was not his turn."),
            Clip::title_card("THE END", 1.5),
        ],
        ScriptMetadata {
            title: Some("The Pilot".to_string()),
            ..ScriptMetadata::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_script_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.toml");
        run(path.clone(), false).unwrap();

        let loaded = Script::load(&path).unwrap();
        assert_eq!(loaded, example_script());
        assert!(run(path.clone(), false).is_err());
        assert!(run(path, true).is_ok());
    }
}
