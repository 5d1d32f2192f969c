//! Headless command implementations behind the CLI.

use crate::headless::HeadlessBackend;
use anyhow::{ensure, Context};
use garmentkit_core::{ProductSpec, ZoneKey, ZoneSpec};
use garmentkit_designer::{Artwork, EditorAction, ExportOptions, ExportReport, ZoneManager};
use garmentkit_settings::{Config, SettingsPersistence};
use garmentkit_visualizer::{decal_size_for, demo_garment, CameraRig};
use image::{Rgba, RgbaImage};
use std::fmt::Write;
use std::path::Path;
use tracing::{info, warn};

/// Placement tweaks applied after the upload has been fitted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlacementOverrides {
    pub u: Option<f64>,
    pub v: Option<f64>,
    pub width_cm: Option<f64>,
    pub rotate_deg: Option<f64>,
}

/// Loads `path`, or the platform config file when none is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path).with_context(|| format!("loading {}", path.display())),
        None => match SettingsPersistence::open_default() {
            Ok(settings) => Ok(settings.config().clone()),
            Err(e) => {
                warn!("Falling back to default settings: {}", e);
                Ok(Config::default())
            }
        },
    }
}

/// Copy of `config` whose product is the catalog entry `id`.
pub fn with_product(config: &Config, id: &str) -> anyhow::Result<Config> {
    let product = ProductSpec::by_id(id).with_context(|| {
        format!("unknown product '{}', expected one of: {}", id, ProductSpec::CATALOG.join(", "))
    })?;
    let mut config = config.clone();
    config.product = product;
    Ok(config)
}

/// Zone manager for the configured product with the demo garment loaded.
pub fn new_session(config: &Config) -> ZoneManager<HeadlessBackend> {
    let mut manager = ZoneManager::new(
        HeadlessBackend::new(),
        config.product.clone(),
        config.manager_options(),
    );
    manager.load_model(&demo_garment());
    manager
}

/// Uploads an image to `zone`, applies the overrides and writes the print
/// template and job into `out_dir`.
pub fn export_artwork(
    config: &Config,
    image_bytes: &[u8],
    zone: ZoneKey,
    overrides: PlacementOverrides,
    out_dir: &Path,
    options: &ExportOptions,
) -> anyhow::Result<ExportReport> {
    let mut manager = new_session(config);
    manager.set_active(zone)?;
    let outcome = manager.upload_image_bytes(image_bytes, &CameraRig::default())?;
    info!("Upload to {} resolved as {:?}", zone, outcome);

    apply_overrides(&mut manager, overrides)?;
    manager.on_animation_frame();

    Ok(manager.export_zone(zone, out_dir, options)?)
}

fn apply_overrides(manager: &mut ZoneManager<HeadlessBackend>, overrides: PlacementOverrides) -> anyhow::Result<()> {
    if let Some(width_cm) = overrides.width_cm {
        manager.apply_width_cm(width_cm)?;
    }

    if overrides.u.is_some() || overrides.v.is_some() {
        let mut placement = manager
            .active_record()
            .and_then(|r| r.draft.placement)
            .context("no placement to move")?;
        if let Some(u) = overrides.u {
            ensure!((0.0..=1.0).contains(&u), "u must be within 0..1, got {}", u);
            placement.u = u;
        }
        if let Some(v) = overrides.v {
            ensure!((0.0..=1.0).contains(&v), "v must be within 0..1, got {}", v);
            placement.v = v;
        }
        manager.apply_editor_action(EditorAction::Move(placement))?;
    }

    if let Some(deg) = overrides.rotate_deg {
        manager.rotate_by_deg(deg)?;
    }
    Ok(())
}

/// Text report of every zone of the demo garment: rectangle, safe area,
/// the pose a centered test image resolves to, and the HUD.
pub fn inspect_report(config: &Config) -> anyhow::Result<String> {
    let mut manager = new_session(config);
    let camera = CameraRig::default();
    let mut out = String::new();

    let zones: Vec<ZoneSpec> = config.product.zones.clone();
    for spec in zones {
        let zone = spec.key;
        manager.set_active(zone)?;
        let outcome = manager.upload_image(Artwork::new(test_card()), &camera)?;
        manager.on_animation_frame();

        let Some(record) = manager.record(zone) else {
            continue;
        };
        writeln!(out, "{} [{}x{} cm]", zone, spec.size_cm.width, spec.size_cm.height)?;
        writeln!(out, "  rect: {}", record.rect)?;
        writeln!(
            out,
            "  safe: u[{:.3}..{:.3}] v[{:.3}..{:.3}]",
            record.safe.u_min, record.safe.u_max, record.safe.v_min, record.safe.v_max
        )?;
        writeln!(out, "  upload: {:?}", outcome)?;
        match (record.pose.as_ref(), record.draft.placement, record.draft.aspect()) {
            (Some(pose), Some(placement), Some(aspect)) => {
                let p = pose.position;
                let n = pose.forward();
                let size = decal_size_for(placement.u_scale, aspect, config.decal.world_zone_width);
                writeln!(out, "  pose: ({:.3}, {:.3}, {:.3}) facing ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z, n.x, n.y, n.z)?;
                writeln!(out, "  decal: {:.3} x {:.3} x {:.2}", size.width, size.height, size.depth)?;
            }
            _ => writeln!(out, "  pose: unresolved")?,
        }
        for line in manager.hud().lines() {
            writeln!(out, "  | {}", line)?;
        }
    }
    Ok(out)
}

/// 64x64 two-tone square used by `inspect`.
fn test_card() -> RgbaImage {
    RgbaImage::from_fn(64, 64, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Rgba([230, 57, 70, 255])
        } else {
            Rgba([29, 53, 87, 255])
        }
    })
}
