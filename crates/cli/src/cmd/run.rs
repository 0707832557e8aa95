use crate::RunArgs;
use mdbatch_core::config::{ConfigLoader, build_pipeline};
use std::path::Path;
use tracing::info;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: &RunArgs) {
    let mut rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("FAIL mdbatch run");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    crate::logging::init(&rc.logging);

    if let Some(root) = &args.root {
        rc.root = root.clone();
    }
    info!("Profile '{}' at {}", rc.active_profile, rc.root.display());

    let mut pipeline = match build_pipeline(&rc, args.offline) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to set up rewriters: {e}");
            std::process::exit(1);
        }
    };

    let report = match pipeline.run() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Run failed: {e}");
            std::process::exit(1);
        }
    };

    println!("{report}");

    if !report.failures.is_empty() {
        std::process::exit(1);
    }
}
