use mdbatch_core::config::loader::{ConfigLoader, default_config_path};
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            println!("OK   mdbatch doctor");
            println!(
                "path: {}",
                config.map_or_else(
                    || default_config_path().display().to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!("root: {}", rc.root.display());
            if !rc.root.is_dir() {
                println!("warning: root does not exist yet");
            }
            println!("extensions: {}", rc.filter.extensions.join(", "));
            println!("exclude_files: {}", rc.filter.exclude_files.join(", "));
            println!("excluded_folders: {}", rc.filter.excluded_folders.join(", "));
            if rc.rewriters.is_empty() {
                println!("rewriters: (none)");
            } else {
                println!("rewriters:");
                for (i, spec) in rc.rewriters.iter().enumerate() {
                    println!("  {}. {}", i + 1, spec.kind());
                }
            }
        }
        Err(e) => {
            println!("FAIL mdbatch doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}
