//! envreload - force a direnv-style environment manager to rebuild its cache
//!
//! Environment managers like direnv with nix-direnv cache the evaluated
//! environment and rebuild it when the marker file (`.envrc`) is newer than
//! the cached profile files. This crate:
//! - Runs `<tool> exec <dir> true` with the force-reload variable set, so the
//!   cache is rebuilt unconditionally
//! - Touches the marker, then copies its exact timestamps onto the cache
//!   files, so the manager does not rebuild a second time
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   envreload                     │
//! ├─────────────────────────────────────────────────┤
//! │     Config      │  Reload Trigger  │   Status   │
//! ├─────────────────────────────────────────────────┤
//! │    Process spawn      │     Timestamps          │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod reload;
pub mod status;

pub use config::{ConfigError, Overrides, ReloadConfig};
pub use reload::{ReloadError, ReloadReport, ReloadTrigger};
