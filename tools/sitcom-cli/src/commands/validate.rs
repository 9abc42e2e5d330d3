//! Validate a script file.

use std::path::PathBuf;

use sitcom_script_model::Script;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating script at: {}", path.display());

    let script =
        Script::load(&path).map_err(|e| anyhow::anyhow!("Failed to load script: {e}"))?;

    if let Some(title) = &script.metadata.title {
        println!("  Title: {title}");
    }
    println!("  Characters: {}", script.characters.len());
    println!("  Clips: {}", script.clips.len());
    println!(
        "  Spoken lines: {}",
        script.clips.iter().filter(|c| c.needs_audio()).count()
    );
    println!(
        "  Images to resolve: {}",
        script
            .clips
            .iter()
            .filter(|c| c.image_path.is_none() && c.expects_image())
            .count()
    );

    let issues = script.validate();
    if issues.is_empty() {
        println!("\nScript is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. The render may use fallbacks.",
            issues.len()
        );
    }

    Ok(())
}
