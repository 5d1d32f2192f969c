//! # Zone Registry
//!
//! Computes the absolute UV rectangle of each print zone from its dedicated
//! zone mesh and keeps those rectangles for the lifetime of a loaded model.
//!
//! Bounds are taken at the 2nd and 98th percentile of the zone's UVs so that
//! a few stray vertices do not inflate the rectangle. Islands that straddle
//! the U seam are detected by span and folded so that `u_min > u_max`.

use garmentkit_core::constants::{UV_WRAP_SPAN_THRESHOLD, ZONE_PERCENTILE_HIGH, ZONE_PERCENTILE_LOW};
use garmentkit_core::{ProductSpec, Uv, ZoneKey, ZoneRect, ZoneSide, ZoneSizeCm, ZoneSpec};
use garmentkit_visualizer::SceneNode;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Linear-interpolated percentile of an ascending slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = p.clamp(0.0, 1.0) * last as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let t = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * t)
}

fn trimmed_bounds(values: &mut [f64]) -> Option<(f64, f64)> {
    values.sort_by(|a, b| a.total_cmp(b));
    Some((
        percentile(values, ZONE_PERCENTILE_LOW)?,
        percentile(values, ZONE_PERCENTILE_HIGH)?,
    ))
}

/// Primary-channel UVs of every mesh under `node`.
fn collect_uvs(node: &SceneNode) -> Vec<Uv> {
    node.meshes()
        .into_iter()
        .filter_map(|m| m.uv.as_deref())
        .flat_map(|uvs| uvs.iter().copied())
        .collect()
}

/// Builds the UV rectangle of a zone mesh.
///
/// A missing mesh or a mesh without UVs yields [`ZoneRect::fallback`].
pub fn build_zone_rect(zone_mesh: Option<&SceneNode>, name: &str, side: ZoneSide, wrap_threshold: f64) -> ZoneRect {
    let Some(node) = zone_mesh else {
        warn!("Zone mesh '{}' not found, using fallback rect", name);
        return ZoneRect::fallback(side);
    };

    let uvs = collect_uvs(node);
    let mut us: Vec<f64> = uvs.iter().map(|uv| uv.u).collect();
    let mut vs: Vec<f64> = uvs.iter().map(|uv| uv.v).collect();

    let (Some((mut u_min, mut u_max)), Some((v_min, v_max))) = (trimmed_bounds(&mut us), trimmed_bounds(&mut vs)) else {
        warn!("Zone mesh '{}' has no UVs, using fallback rect", name);
        return ZoneRect::fallback(side);
    };

    if u_max - u_min > wrap_threshold {
        for u in us.iter_mut() {
            if *u < 0.5 {
                *u += 1.0;
            }
        }
        if let Some((lo, hi)) = trimmed_bounds(&mut us) {
            u_min = if lo > 1.0 { lo - 1.0 } else { lo };
            u_max = if hi > 1.0 { hi - 1.0 } else { hi };
            info!("Zone '{}' crosses the U seam, folded to u[{:.3}..{:.3}]", name, u_min, u_max);
        }
    }

    ZoneRect::new(u_min, u_max, v_min, v_max, name, side)
}

/// Half-open containment of `uv` in `rect`, shrunk inward by `pad`.
pub fn is_inside(uv: Uv, rect: &ZoneRect, pad: f64) -> bool {
    rect.contains(uv, pad)
}

/// Position of an absolute UV inside a zone, in centimetres from the
/// zone's top-left corner.
pub fn uv_to_print_cm(uv: Uv, rect: &ZoneRect, size_cm: ZoneSizeCm) -> (f64, f64) {
    let u_rel = (rect.unwrap_u(uv.u) - rect.u_min) / rect.u_span().max(1e-6);
    let v_rel = (uv.v - rect.v_min) / rect.v_span().max(1e-6);
    (u_rel * size_cm.width, (1.0 - v_rel) * size_cm.height)
}

/// A resolved zone: its rectangle, physical size and margins, and the zone mesh used
/// for pose synchronization.
#[derive(Debug, Clone)]
pub struct ZoneEntry {
    pub spec: ZoneSpec,
    pub rect: ZoneRect,
    pub mesh: Option<SceneNode>,
}

/// Every zone of the loaded product, keyed by zone.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    entries: BTreeMap<ZoneKey, ZoneEntry>,
}

impl ZoneRegistry {
    /// Finds each product zone's `PRINT_ZONE_*` mesh in `root` and builds its
    /// rectangle once.
    pub fn from_scene(root: &SceneNode, product: &ProductSpec, wrap_threshold: f64) -> Self {
        let mut entries = BTreeMap::new();
        for spec in &product.zones {
            let mesh = root.find(spec.key.mesh_name()).cloned();
            let rect = build_zone_rect(mesh.as_ref(), spec.key.mesh_name(), spec.key.side(), wrap_threshold);
            info!("Zone {}: {}", spec.key, rect);
            entries.insert(
                spec.key,
                ZoneEntry {
                    spec: *spec,
                    rect,
                    mesh,
                },
            );
        }
        Self { entries }
    }

    pub fn with_default_threshold(root: &SceneNode, product: &ProductSpec) -> Self {
        Self::from_scene(root, product, UV_WRAP_SPAN_THRESHOLD)
    }

    pub fn get(&self, key: ZoneKey) -> Option<&ZoneEntry> {
        self.entries.get(&key)
    }

    pub fn rect(&self, key: ZoneKey) -> Option<&ZoneRect> {
        self.entries.get(&key).map(|e| &e.rect)
    }

    pub fn keys(&self) -> impl Iterator<Item = ZoneKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneKey, &ZoneEntry)> + '_ {
        self.entries.iter().map(|(k, e)| (*k, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First zone whose rectangle contains `uv`.
    pub fn zone_at(&self, uv: Uv) -> Option<ZoneKey> {
        self.entries
            .iter()
            .find(|(_, e)| e.rect.contains(uv, 0.0))
            .map(|(k, _)| *k)
    }

    pub(crate) fn into_entries(self) -> BTreeMap<ZoneKey, ZoneEntry> {
        self.entries
    }
}
