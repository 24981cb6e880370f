//! Print the effective configuration
//!
//! Output is itself a valid config file. The directory is printed absolute,
//! since a relative `Directory=` is read relative to the config file.

use envreload::ReloadConfig;

pub fn show_config(config: &ReloadConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("# marker: {}", config.marker_path().display());
    println!("# cache:  {}/*{}", config.cache_path().display(), config.cache_suffix);
    println!("[Reload]");
    let project_dir = std::path::absolute(&config.project_dir)?;
    println!("Directory={}", project_dir.display());
    println!("Tool={}", config.tool);
    println!("ForceVariable={}", config.force_variable);
    println!("ForceValue={}", config.force_value);
    println!("NoopCommand={}", config.noop_command);
    println!("MarkerFile={}", config.marker_file);
    println!("CacheDirectory={}", config.cache_dir.display());
    println!("CacheSuffix={}", config.cache_suffix);
    Ok(())
}
