//! # GarmentKit Designer
//!
//! The 2D side of the customizer and the coordinator that keeps it in step
//! with the 3D view.
//!
//! ## Core Components
//!
//! - **Zones**: UV rectangles of the print zones, computed from zone meshes
//! - **Placement**: per-zone artwork drafts, snapping and safe-area math
//! - **Editor**: viewport and tiny-skia canvas for dragging artwork in UV space
//! - **Zone Manager**: the ordered edit pipeline (placement, pose, decal,
//!   redraw, notify)
//! - **Export**: baked PNG templates and JSON print jobs
//!
//! ## Architecture
//!
//! ```text
//! ZoneManager (one record per zone)
//!   ├── ZoneDraft (artwork + placement + lock)
//!   ├── Pose / DecalSlot (from garmentkit-visualizer)
//!   └── FrameScheduler (one rebuild per zone per frame)
//!
//! UvEditor (2D canvas)
//!   ├── Viewport (zoom/pan, pixel <-> UV)
//!   └── EditorAction -> ZoneManager::apply_editor_action
//! ```

pub mod artwork;
pub mod export;
pub mod hud;
pub mod placement;
pub mod safe_zone;
pub mod snap;
pub mod uv_canvas;
pub mod viewport;
pub mod zone_manager;
pub mod zones;

pub use artwork::Artwork;
pub use export::{
    bake_template_png, template_height, write_export, BakedTemplate, ExportOptions, ExportReport, ExportRequest,
    PrintJob,
};
pub use hud::{render_hud, zone_label, SAFE_AREA_WARNING};
pub use placement::{cm_to_placement_width, placement_to_cm, resize_from_corner, DraftState, PlacementCm, ZoneDraft};
pub use safe_zone::{clamp_placement_to_safe, is_placement_inside_safe, placement_bounds, SafeRect};
pub use snap::{apply_snap, Modifiers, SnapOptions};
pub use uv_canvas::{EditorAction, EditorStyle, EditorZone, PointerButton, UvEditor};
pub use viewport::Viewport;
pub use zone_manager::{
    FrameOutcome, ManagerOptions, UploadOutcome, ZoneEvent, ZoneManager, ZoneObserver, ZoneRecord,
};
pub use zones::{build_zone_rect, is_inside, percentile, uv_to_print_cm, ZoneEntry, ZoneRegistry};
