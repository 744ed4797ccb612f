use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use propserve::server::PropertyServer;
use propserve::{watcher, PropertyStore, ReloadOutcome};

#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Port the HTTP server listens on.
    #[clap(long, default_value = "5000")]
    port: u16,

    /// Snapshot file served by the radius query and watched for rewrites.
    #[clap(long, default_value = "data/snapshots/day_2.json")]
    snapshot_path: PathBuf,

    /// Destination for raw /update_properties payloads.
    #[clap(long, default_value = "received_properties.json")]
    received_path: PathBuf,

    /// Radius cutoff for /properties_within_radius, in miles.
    #[clap(long, default_value = "65.0")]
    radius_miles: f64,

    /// How often the snapshot file's mtime is polled, in seconds.
    #[clap(long, default_value = "5")]
    poll_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,propserve=info");
    }
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();

    println!("--- Propserve Property Snapshot Server ---");
    println!("Snapshot File: {}", args.snapshot_path.display());
    println!("Query Radius:  {} miles", args.radius_miles);
    println!("Poll Interval: {}s", args.poll_interval_secs);
    println!("------------------------------------------");

    let store = Arc::new(PropertyStore::new(args.snapshot_path));

    // Eager load so the very first request already sees on-disk data.
    match store.reload() {
        Ok(ReloadOutcome::Replaced(count)) => {
            println!("[LOAD] Snapshot loaded: {} records", count);
        }
        Ok(ReloadOutcome::Skipped) => {
            println!("[LOAD] No snapshot file yet; serving an empty snapshot");
        }
        Err(e) => {
            eprintln!("[LOAD] Initial load failed, serving an empty snapshot: {}", e);
        }
    }

    watcher::spawn(
        store.clone(),
        Duration::from_secs(args.poll_interval_secs),
    );

    let server = PropertyServer::new(store, args.radius_miles, args.received_path);
    let port = args.port;
    tokio::spawn(async move {
        server.run(port).await;
    });

    tokio::signal::ctrl_c().await.unwrap();
    println!("Shutting down.");
}
