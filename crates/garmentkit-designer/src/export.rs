//! # Print Export
//!
//! Bakes a flat print template (artwork on white, no UV warp) and describes
//! it with a JSON print job.
//!
//! The template is `template_px` wide and keeps the zone's centimetre
//! aspect. Placement coordinates map directly onto it: the artwork center
//! lands at `(u·W, v·H)` with `v` measured from the top.

use crate::artwork::Artwork;
use crate::safe_zone::{is_placement_inside_safe, SafeRect};
use crate::uv_canvas::{artwork_transform, pixmap_from_image};
use chrono::{SecondsFormat, Utc};
use garmentkit_core::constants::{DEFAULT_DPI, DEFAULT_TEMPLATE_PX};
use garmentkit_core::{ExportError, Placement, ZoneKey, ZoneRect, ZoneSide, ZoneSizeCm};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint};
use tracing::{info, warn};

/// Export settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub product_id: String,
    pub dpi: u32,
    pub template_px: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            product_id: "tshirt".to_string(),
            dpi: DEFAULT_DPI,
            template_px: DEFAULT_TEMPLATE_PX,
        }
    }
}

/// An encoded template image.
#[derive(Debug, Clone)]
pub struct BakedTemplate {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Template height for a zone at the given width.
pub fn template_height(template_px: u32, zone_cm: ZoneSizeCm) -> u32 {
    let aspect = zone_cm.height / zone_cm.width.max(1e-6);
    ((template_px as f64 * aspect).round() as u32).max(1)
}

/// Renders the artwork onto a white template and encodes it as PNG.
pub fn bake_template_png(
    artwork: &Artwork,
    placement: &Placement,
    zone_cm: ZoneSizeCm,
    template_px: u32,
) -> Result<BakedTemplate, ExportError> {
    let width = template_px.max(1);
    let height = template_height(width, zone_cm);
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| ExportError::Raster {
        reason: format!("cannot allocate {}x{} template", width, height),
    })?;
    pixmap.fill(Color::WHITE);

    let art = pixmap_from_image(&artwork.image).ok_or_else(|| ExportError::Raster {
        reason: "artwork has no pixels".to_string(),
    })?;
    let w = width as f64;
    let h = height as f64;
    let transform = artwork_transform(
        placement.u * w,
        placement.v * h,
        placement.u_scale * w,
        placement.v_scale * h,
        placement.rotation_rad,
        art.width() as f64,
        art.height() as f64,
    );
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..Default::default()
    };
    pixmap.draw_pixmap(0, 0, art.as_ref(), &paint, transform, None);

    let png = encode_png(&pixmap)?;
    Ok(BakedTemplate { png, width, height })
}

fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let mut raw = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    let image = RgbaImage::from_raw(pixmap.width(), pixmap.height(), raw).ok_or_else(|| ExportError::Encode {
        reason: "pixel buffer size mismatch".to_string(),
    })?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ExportError::Encode { reason: e.to_string() })?;
    Ok(bytes)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: String,
    pub side: ZoneSide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UvBounds {
    pub u_min: f64,
    pub u_max: f64,
    pub v_min: f64,
    pub v_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneInfo {
    pub name: String,
    pub cm: CmSize,
    pub uv: UvBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementInfo {
    pub u: f64,
    pub v: f64,
    pub u_scale: f64,
    pub v_scale: f64,
    pub rotation_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMeta {
    pub dpi: u32,
    pub template_px: PixelSize,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

/// Machine-readable description of an exported print template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintJob {
    pub product: ProductRef,
    pub zone: ZoneInfo,
    pub placement: PlacementInfo,
    pub meta: JobMeta,
}

impl PrintJob {
    pub fn new(
        options: &ExportOptions,
        rect: &ZoneRect,
        zone_cm: ZoneSizeCm,
        placement: &Placement,
        template: (u32, u32),
    ) -> Self {
        Self {
            product: ProductRef {
                id: options.product_id.clone(),
                side: rect.side,
            },
            zone: ZoneInfo {
                name: rect.name.clone(),
                cm: CmSize {
                    width: zone_cm.width,
                    height: zone_cm.height,
                },
                uv: UvBounds {
                    u_min: rect.u_min,
                    u_max: rect.u_max,
                    v_min: rect.v_min,
                    v_max: rect.v_max,
                },
            },
            placement: PlacementInfo {
                u: placement.u,
                v: placement.v,
                u_scale: placement.u_scale,
                v_scale: placement.v_scale,
                rotation_deg: placement.rotation_deg(),
            },
            meta: JobMeta {
                dpi: options.dpi,
                template_px: PixelSize {
                    width: template.0,
                    height: template.1,
                },
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Everything needed to export one zone.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub zone: ZoneKey,
    pub rect: &'a ZoneRect,
    pub zone_cm: ZoneSizeCm,
    pub safe: &'a SafeRect,
    pub artwork: &'a Artwork,
    pub placement: &'a Placement,
}

/// Files written by [`write_export`].
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub png_path: PathBuf,
    pub json_path: PathBuf,
    pub job: PrintJob,
    /// Set when the artwork extends past the safe area.
    pub warning: Option<String>,
}

impl ExportReport {
    pub fn outside_safe(&self) -> bool {
        self.warning.is_some()
    }
}

/// Bakes and writes `print-template-<zone>.png` and `print-job-<zone>.json`
/// into `dir`, creating it if needed.
pub fn write_export(dir: &Path, request: ExportRequest<'_>, options: &ExportOptions) -> garmentkit_core::Result<ExportReport> {
    let warning = if is_placement_inside_safe(request.placement, request.safe) {
        None
    } else {
        let msg = format!("Artwork for {} extends past the safe print area", request.zone);
        warn!("{}", msg);
        Some(msg)
    };

    let baked = bake_template_png(request.artwork, request.placement, request.zone_cm, options.template_px)?;
    let job = PrintJob::new(
        options,
        request.rect,
        request.zone_cm,
        request.placement,
        (baked.width, baked.height),
    );
    let json = job.to_json_pretty()?;

    std::fs::create_dir_all(dir)?;
    let png_path = dir.join(format!("print-template-{}.png", request.zone));
    let json_path = dir.join(format!("print-job-{}.json", request.zone));
    std::fs::write(&png_path, &baked.png)?;
    std::fs::write(&json_path, json)?;

    info!(
        "Exported {} template {}x{} to {}",
        request.zone,
        baked.width,
        baked.height,
        dir.display()
    );

    Ok(ExportReport {
        png_path,
        json_path,
        job,
        warning,
    })
}
