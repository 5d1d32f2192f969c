//! # GarmentKit
//!
//! UV-space artwork placement and print export for 3D garment customizers.
//!
//! ## Architecture
//!
//! GarmentKit is organized as a workspace with multiple crates:
//!
//! 1. **garmentkit-core** - UV and centimetre types, zones, placements, errors
//! 2. **garmentkit-visualizer** - Mesh scene, UV and ray picking, decal poses
//! 3. **garmentkit-designer** - Zone registry, placement editing, 2D editor,
//!    zone manager, print export
//! 4. **garmentkit-settings** - Product catalog and tunables as TOML/JSON
//! 5. **garmentkit** - Logging setup, a headless decal backend, and the CLI

pub mod commands;
pub mod headless;

pub use garmentkit_core as core;
pub use garmentkit_designer as designer;
pub use garmentkit_settings as settings;
pub use garmentkit_visualizer as visualizer;

pub use garmentkit_core::{Error, Placement, PlacementError, ProductSpec, Result, Uv, ZoneKey, ZoneRect};
pub use garmentkit_designer::{ExportOptions, ExportReport, UvEditor, ZoneManager};
pub use garmentkit_settings::Config;
pub use headless::{HeadlessBackend, HeadlessDecal};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, so command output on stdout stays clean
/// - RUST_LOG environment variable support, `info` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging already initialized: {}", e))?;

    Ok(())
}
