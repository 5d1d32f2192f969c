//! Exporting print templates through the zone manager.

use crate::support::{art, camera, loaded_manager};
use garmentkit_core::{Error, ExportError, ZoneKey};
use garmentkit_designer::{EditorAction, ExportOptions, PrintJob};
use tempfile::TempDir;

fn small_export() -> ExportOptions {
    ExportOptions {
        template_px: 64,
        ..ExportOptions::default()
    }
}

#[test]
fn test_export_writes_template_and_job() {
    let dir = TempDir::new().unwrap();
    let mut m = loaded_manager();
    m.upload_image(art(40, 40), &camera()).unwrap();
    m.apply_width_cm(10.0).unwrap();

    let report = m.export_zone(ZoneKey::Front, dir.path(), &small_export()).unwrap();
    assert_eq!(report.png_path, dir.path().join("print-template-front.png"));
    assert_eq!(report.json_path, dir.path().join("print-job-front.json"));
    assert!(!report.outside_safe());

    let png = image::open(&report.png_path).unwrap().into_rgba8();
    assert_eq!(png.dimensions(), (64, 85));
    assert_eq!(png.get_pixel(32, 42).0, [255, 0, 0, 255]);
    assert_eq!(png.get_pixel(1, 1).0, [255, 255, 255, 255]);

    let job: PrintJob = serde_json::from_str(&std::fs::read_to_string(&report.json_path).unwrap()).unwrap();
    assert_eq!(job, report.job);
    assert_eq!(job.zone.name, "PRINT_ZONE_FRONT");
    assert_eq!(job.meta.template_px.height, 85);
    assert_eq!(job.meta.dpi, 300);
}

#[test]
fn test_export_before_upload_has_nothing() {
    let dir = TempDir::new().unwrap();
    let m = loaded_manager();
    let err = m.export_zone(ZoneKey::Back, dir.path(), &small_export()).unwrap_err();
    assert!(matches!(
        err,
        Error::Export(ExportError::NothingToExport { ref zone }) if zone == "back"
    ));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_export_outside_safe_area_still_writes() {
    let dir = TempDir::new().unwrap();
    let mut m = loaded_manager();
    m.upload_image(art(40, 40), &camera()).unwrap();
    let mut p = m.active_record().unwrap().draft.placement.unwrap();
    p.u = 0.1;
    m.apply_editor_action(EditorAction::Move(p)).unwrap();

    let report = m.export_zone(ZoneKey::Front, dir.path().join("out").as_path(), &small_export()).unwrap();
    assert!(report.outside_safe());
    assert!(report.warning.unwrap().contains("front"));
    assert!(report.png_path.exists());
    assert!(report.json_path.exists());
}
