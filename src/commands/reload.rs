//! Force reload (the default command)

use envreload::reload::{ReloadError, ReloadTrigger};
use envreload::ReloadConfig;

pub async fn reload(config: ReloadConfig, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let trigger = ReloadTrigger::new(config);

    if dry_run {
        let plan = trigger.plan().unwrap_or_else(|e| fail(&e));

        println!("Would run:   {}", plan.command);
        println!("Would touch: {}", plan.marker.display());
        if plan.cache_files.is_empty() {
            println!("No cache files to sync");
        }
        for file in &plan.cache_files {
            println!("Would sync:  {}", file.display());
        }
        return Ok(());
    }

    match trigger.run().await {
        Ok(report) => {
            log::info!(
                "Reload complete: {} and {} cache file(s) stamped",
                report.marker.display(),
                report.cache_files.len()
            );
            Ok(())
        }
        Err(e) => fail(&e),
    }
}

/// Report a failed reload and exit with its code
fn fail(e: &ReloadError) -> ! {
    match e {
        // Printed verbatim, the operator's instructions are the whole message
        ReloadError::DirectoryMissing { .. } => eprintln!("{}", e),
        _ => eprintln!("envreload: {}", e),
    }
    std::process::exit(e.exit_code())
}
