use garmentkit_core::{ZoneRect, ZoneSide};
use garmentkit_visualizer::{abs_to_rel_uv, rel_to_abs_uv};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_rel_abs_round_trip(
        u_min in 0.01f64..0.4,
        u_span in 0.1f64..0.5,
        v_min in 0.01f64..0.4,
        v_span in 0.1f64..0.5,
        pu in 0.0f64..=1.0,
        pv in 0.0f64..=1.0,
    ) {
        let rect = ZoneRect::new(u_min, u_min + u_span, v_min, v_min + v_span, "z", ZoneSide::Front);
        let (ru, rv) = abs_to_rel_uv(rel_to_abs_uv(pu, pv, &rect), &rect);
        prop_assert!((ru - pu).abs() < 1e-4);
        prop_assert!((rv - pv).abs() < 1e-4);
    }

    #[test]
    fn test_rel_abs_round_trip_across_seam(
        u_min in 0.75f64..0.95,
        u_span in 0.1f64..0.2,
        pu in 0.0f64..=1.0,
        pv in 0.0f64..=1.0,
    ) {
        let u_max = u_min + u_span - 1.0;
        prop_assume!(u_max > 0.01);
        let rect = ZoneRect::new(u_min, u_max, 0.2, 0.8, "z", ZoneSide::Back);
        let abs = rel_to_abs_uv(pu, pv, &rect);
        prop_assume!(abs.u > 1e-3 && abs.u < 1.0 - 1e-3);
        let (ru, rv) = abs_to_rel_uv(abs, &rect);
        prop_assert!((ru - pu).abs() < 1e-4);
        prop_assert!((rv - pv).abs() < 1e-4);
    }
}
