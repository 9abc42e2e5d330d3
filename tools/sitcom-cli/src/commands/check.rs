//! Check system capabilities.

use sitcom_common::{config_file_path, AppConfig};
use sitcom_render_engine::command_exists;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Sitcom Simulator System Check");
    println!("{}", "=".repeat(50));

    let mut all_required_ok = true;
    for binary in ["ffmpeg", "ffprobe"] {
        if command_exists(binary) {
            println!("[OK] {binary} found");
        } else {
            println!("[MISSING] {binary} not found in PATH");
            all_required_ok = false;
        }
    }

    let font = std::path::Path::new(&config.render.font);
    if font.exists() {
        println!("[OK] Caption font: {}", font.display());
    } else {
        println!(
            "[WARN] Caption font not found: {} (set render.font or pass --font)",
            font.display()
        );
    }

    let config_path = config_file_path();
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!("[OK] Config: defaults ({} not present)", config_path.display());
    }
    println!("     Voice API: {}", config.voice.api_base_url);
    match &config.work_dir {
        Some(dir) => println!("     Work dir: {}", dir.display()),
        None => println!("     Work dir: system temp"),
    }

    println!();
    if all_required_ok {
        println!("All required tools are available. Ready to render.");
    } else {
        println!("Some required tools are missing. Install ffmpeg to render videos.");
    }

    Ok(())
}
