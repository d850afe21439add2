//! Example loading every kind of content from the configured host.
//!
//! This example shows how to:
//! - Build a Showcase from the default config or a JSON file
//! - Select each kind and load it
//! - Drive the fetcher frame by frame and inspect the UI state
//!
//! Run with: cargo run -p mediafetch --example showcase [config.json]

use mediafetch::prelude::*;

fn main() {
    mediafetch::core::logging::init();

    let showcase = match std::env::args().nth(1) {
        Some(path) => Showcase::from_config_file(&path),
        None => Showcase::new(FetchConfig::default()),
    };
    let mut showcase = match showcase {
        Ok(showcase) => showcase,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    showcase.dispatcher_mut().start();

    for kind in AssetKind::ALL {
        println!("=== {} ===", kind);

        let ui = showcase.dispatcher_mut();
        ui.select(kind);
        ui.load();

        if !showcase.run_until_idle(Duration::from_secs(30), Duration::from_millis(16)) {
            println!("Timed out, resetting");
            showcase.dispatcher_mut().reset();
            continue;
        }

        let state = showcase.state();
        if let Some(error) = &state.last_error {
            println!("Failed to load: {}\n", error);
            continue;
        }

        match kind {
            AssetKind::Text => println!("{}\n", state.text),
            AssetKind::Image => {
                let (width, height) = state.image.size();
                println!("Image {}x{}\n", width, height);
            }
            AssetKind::VideoUrl => println!("Streaming {}\n", state.video.url().unwrap_or_default()),
            AssetKind::Model => {
                for model in state.model_anchor.children() {
                    println!(
                        "Model with {} nodes, playing {:?}\n",
                        model.node_count(),
                        model.playing().map(|clip| &clip.name)
                    );
                }
            }
        }
    }

    println!("Finished after {} frames", showcase.frame());
}
