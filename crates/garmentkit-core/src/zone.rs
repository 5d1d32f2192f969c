//! Print zone identities and UV-space zone rectangles.

use crate::units::{SafeMarginsCm, Uv, ZoneSizeCm};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named printable region of a garment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKey {
    Front,
    Back,
    LeftArm,
    RightArm,
}

impl ZoneKey {
    pub const ALL: [ZoneKey; 4] = [
        ZoneKey::Front,
        ZoneKey::Back,
        ZoneKey::LeftArm,
        ZoneKey::RightArm,
    ];

    /// Key as used in config files and export file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::LeftArm => "left_arm",
            Self::RightArm => "right_arm",
        }
    }

    /// Name of the dedicated zone mesh inside the garment model.
    pub fn mesh_name(&self) -> &'static str {
        match self {
            Self::Front => "PRINT_ZONE_FRONT",
            Self::Back => "PRINT_ZONE_BACK",
            Self::LeftArm => "PRINT_ZONE_LEFT_ARM",
            Self::RightArm => "PRINT_ZONE_RIGHT_ARM",
        }
    }

    pub fn side(&self) -> ZoneSide {
        match self {
            Self::Front => ZoneSide::Front,
            Self::Back => ZoneSide::Back,
            Self::LeftArm => ZoneSide::Left,
            Self::RightArm => ZoneSide::Right,
        }
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            "left_arm" | "left" => Ok(Self::LeftArm),
            "right_arm" | "right" => Ok(Self::RightArm),
            _ => Err(format!("Unknown print zone: {}", s)),
        }
    }
}

/// Which face of the garment a zone sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneSide {
    Front,
    Back,
    Left,
    Right,
}

impl fmt::Display for ZoneSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => write!(f, "front"),
            Self::Back => write!(f, "back"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Physical description of one zone of a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub key: ZoneKey,
    pub size_cm: ZoneSizeCm,
    pub margins_cm: SafeMarginsCm,
}

impl ZoneSpec {
    pub fn new(key: ZoneKey, size_cm: ZoneSizeCm, margins_cm: SafeMarginsCm) -> Self {
        Self {
            key,
            size_cm,
            margins_cm,
        }
    }
}

/// A garment product and the print zones it offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub id: String,
    pub zones: Vec<ZoneSpec>,
}

impl ProductSpec {
    /// Ids accepted by [`ProductSpec::by_id`].
    pub const CATALOG: [&'static str; 3] = ["tshirt", "hoodie", "cap"];

    /// Catalog entry for `id`, if there is one.
    pub fn by_id(id: &str) -> Option<Self> {
        match id {
            "tshirt" => Some(Self::tshirt()),
            "hoodie" => Some(Self::hoodie()),
            "cap" => Some(Self::cap()),
            _ => None,
        }
    }

    /// The t-shirt template: front and back panels plus both sleeves.
    pub fn tshirt() -> Self {
        let body = SafeMarginsCm::new(3.0, 2.0, 2.0, 2.0);
        let back = SafeMarginsCm::new(3.5, 2.0, 2.0, 2.0);
        let arm = SafeMarginsCm::uniform(1.0);
        Self {
            id: "tshirt".into(),
            zones: vec![
                ZoneSpec::new(ZoneKey::Front, ZoneSizeCm::new(30.0, 40.0), body),
                ZoneSpec::new(ZoneKey::Back, ZoneSizeCm::new(30.0, 40.0), back),
                ZoneSpec::new(ZoneKey::LeftArm, ZoneSizeCm::new(10.0, 12.0), arm),
                ZoneSpec::new(ZoneKey::RightArm, ZoneSizeCm::new(10.0, 12.0), arm),
            ],
        }
    }

    /// Hoodie: front panel only.
    pub fn hoodie() -> Self {
        Self {
            id: "hoodie".into(),
            zones: vec![ZoneSpec::new(
                ZoneKey::Front,
                ZoneSizeCm::new(30.0, 40.0),
                SafeMarginsCm::new(3.0, 2.0, 2.0, 2.0),
            )],
        }
    }

    /// Cap: a small front panel.
    pub fn cap() -> Self {
        Self {
            id: "cap".into(),
            zones: vec![ZoneSpec::new(
                ZoneKey::Front,
                ZoneSizeCm::new(14.0, 8.0),
                SafeMarginsCm::uniform(1.0),
            )],
        }
    }

    pub fn zone(&self, key: ZoneKey) -> Option<&ZoneSpec> {
        self.zones.iter().find(|z| z.key == key)
    }
}

/// Absolute UV bounding box of a print zone.
///
/// When `u_min > u_max` the zone crosses the U seam: it covers
/// `[u_min, 1)` and `[0, u_max)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRect {
    pub u_min: f64,
    pub u_max: f64,
    pub v_min: f64,
    pub v_max: f64,
    pub name: String,
    pub side: ZoneSide,
}

impl ZoneRect {
    pub fn new(u_min: f64, u_max: f64, v_min: f64, v_max: f64, name: impl Into<String>, side: ZoneSide) -> Self {
        Self {
            u_min,
            u_max,
            v_min,
            v_max,
            name: name.into(),
            side,
        }
    }

    /// Rectangle used when a model has no usable zone mesh.
    pub fn fallback(side: ZoneSide) -> Self {
        Self::new(0.25, 0.75, 0.2, 0.85, "fallback", side)
    }

    pub fn crosses_seam(&self) -> bool {
        self.u_min > self.u_max
    }

    /// Width in U, accounting for seam crossing.
    pub fn u_span(&self) -> f64 {
        if self.crosses_seam() {
            self.u_max + 1.0 - self.u_min
        } else {
            self.u_max - self.u_min
        }
    }

    pub fn v_span(&self) -> f64 {
        self.v_max - self.v_min
    }

    /// Maps `u` onto the continuous interval starting at `u_min`.
    pub fn unwrap_u(&self, u: f64) -> f64 {
        if self.crosses_seam() && u < self.u_min {
            u + 1.0
        } else {
            u
        }
    }

    /// Half-open containment with inward padding.
    pub fn contains(&self, uv: Uv, pad: f64) -> bool {
        let u = self.unwrap_u(uv.u);
        u >= self.u_min + pad
            && u < self.u_min + self.u_span() - pad
            && uv.v >= self.v_min + pad
            && uv.v < self.v_max - pad
    }

    /// Center of the rectangle in absolute UV.
    pub fn center(&self) -> Uv {
        let u = self.u_min + self.u_span() * 0.5;
        Uv::new(if u >= 1.0 { u - 1.0 } else { u }, (self.v_min + self.v_max) * 0.5)
    }
}

impl fmt::Display for ZoneRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} u[{:.3}..{:.3}] v[{:.3}..{:.3}]",
            self.name, self.u_min, self.u_max, self.v_min, self.v_max
        )
    }
}
