//! Example fetching every item listed in a JSON content manifest.
//!
//! The manifest looks like:
//!
//! ```json
//! { "contents": [ { "type": "image", "name": "logo", "url": "https://..." } ] }
//! ```
//!
//! Run with: cargo run -p mediafetch --example manifest <manifest-url>

use std::time::Duration;

use mediafetch::{AssetFetcher, AssetResult, FetchConfig};

fn main() {
    mediafetch::core::logging::init();

    let Some(url) = std::env::args().nth(1) else {
        eprintln!("usage: manifest <manifest-url>");
        std::process::exit(2);
    };

    let fetcher = match AssetFetcher::new(FetchConfig::default()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    fetcher.fetch_manifest(
        url,
        |item, outcome| match outcome {
            Ok(AssetResult::Text(text)) => println!("[{}] text: {}", item.name, text),
            Ok(AssetResult::Image(bitmap)) => {
                println!("[{}] image {}x{}", item.name, bitmap.width(), bitmap.height())
            }
            Ok(AssetResult::VideoUrl(url)) => println!("[{}] video at {}", item.name, url),
            Ok(AssetResult::Model(model)) => {
                println!("[{}] model with {} nodes", item.name, model.node_count())
            }
            Err(e) => println!("[{}] failed: {}", item.name, e),
        },
        |message| eprintln!("Manifest failed: {}", message),
    );

    if !fetcher.run_until_idle(Duration::from_secs(60)) {
        eprintln!("Gave up waiting");
        fetcher.cancel_all();
    }
}
