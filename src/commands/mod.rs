mod reload;
mod show_config;
mod status;

pub use reload::reload;
pub use show_config::show_config;
pub use status::status;
