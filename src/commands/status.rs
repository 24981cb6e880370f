//! Show whether the cache is marked current

use filetime::FileTime;

use envreload::status::{inspect, SyncState};
use envreload::ReloadConfig;

pub fn status(config: &ReloadConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !config.project_dir.is_dir() {
        eprintln!(
            "envreload: project directory not found: {}",
            config.project_dir.display()
        );
        std::process::exit(1);
    }

    let status = match inspect(config) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("envreload: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Marker: {} ({})",
        status.marker.display(),
        format_time(status.marker_modified)
    );

    for entry in &status.entries {
        let symbol = match entry.state {
            SyncState::InSync => "●",
            SyncState::Stale => "×",
            SyncState::Ahead => "◐",
        };
        println!(
            "  {} {:<8} {} ({})",
            symbol,
            entry.state.as_str(),
            entry.path.display(),
            format_time(entry.modified)
        );
    }

    let out_of_sync = status
        .entries
        .iter()
        .filter(|e| e.state != SyncState::InSync)
        .count();

    if status.entries.is_empty() {
        println!("No cache files in {}", config.cache_path().display());
    } else if out_of_sync == 0 {
        println!("{} cache file(s), all in sync", status.entries.len());
    } else {
        println!(
            "{} of {} cache file(s) out of sync",
            out_of_sync,
            status.entries.len()
        );
    }

    if !status.is_synced() {
        std::process::exit(1);
    }

    Ok(())
}

/// Local time with nanoseconds, since sync means exact equality
fn format_time(time: FileTime) -> String {
    match chrono::DateTime::from_timestamp(time.unix_seconds(), time.nanoseconds()) {
        Some(utc) => utc
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S%.9f %z")
            .to_string(),
        None => format!("{}.{:09}", time.unix_seconds(), time.nanoseconds()),
    }
}
