use emfield_geom::{Aabb, LocalFrame, Vec3};
use proptest::prelude::*;
use proptest::strategy::Strategy;

fn coord() -> impl Strategy<Value = f64> {
    -1_000.0f64..1_000.0
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

// Corners are sorted so min <= max on every axis.
fn arb_box() -> impl Strategy<Value = Aabb> {
    (arb_vec3(), arb_vec3()).prop_map(|(a, b)| Aabb::new(a.min(b), a.max(b)))
}

// Grid-snapped points exercise the exactly-zero direction patch.
fn snapped_vec3() -> impl Strategy<Value = Vec3> {
    (-10i32..10, -10i32..10, 0i32..10)
        .prop_map(|(x, y, z)| Vec3::new(x as f64, y as f64, z as f64))
}

proptest! {
    // Swapping segment endpoints never changes the verdict
    #[test]
    fn occlusion_symmetric(p1 in arb_vec3(), p2 in arb_vec3(), b in arb_box()) {
        prop_assert_eq!(b.segment_intersects(p1, p2), b.segment_intersects(p2, p1));
    }

    #[test]
    fn occlusion_symmetric_axis_aligned(p1 in snapped_vec3(), p2 in snapped_vec3(), b in arb_box()) {
        prop_assert_eq!(b.segment_intersects(p1, p2), b.segment_intersects(p2, p1));
    }

    // A segment whose endpoints are both strictly inside the box is blocked
    #[test]
    fn interior_segment_intersects(b in arb_box(), s in 0.1f64..0.9, t in 0.1f64..0.9) {
        let e = b.max - b.min;
        prop_assume!(e.x > 1.0 && e.y > 1.0 && e.z > 1.0);
        let p1 = b.min + Vec3::new(e.x * s, e.y * t, e.z * s);
        let p2 = b.min + Vec3::new(e.x * t, e.y * s, e.z * t);
        prop_assume!(p1 != p2);
        prop_assert!(b.segment_intersects(p1, p2));
    }

    // Both endpoints on the far side of one slab: never blocked
    #[test]
    fn segment_above_box_is_clear(b in arb_box(), p1 in arb_vec3(), p2 in arb_vec3()) {
        let lift = b.max.z + 1.0;
        let a = Vec3::new(p1.x, p1.y, lift + p1.z.abs());
        let c = Vec3::new(p2.x, p2.y, lift + p2.z.abs());
        prop_assert!(!b.segment_intersects(a, c));
    }

    // x grows with longitude, y grows with latitude
    #[test]
    fn projection_monotonic(
        olon in -179.0f64..179.0,
        olat in -80.0f64..80.0,
        lon in -0.5f64..0.5,
        lat in -0.5f64..0.5,
        step in 1e-6f64..0.1,
    ) {
        let f = LocalFrame::new(olon, olat);
        let (x0, y0) = f.project(olon + lon, olat + lat);
        let (x1, _) = f.project(olon + lon + step, olat + lat);
        let (_, y1) = f.project(olon + lon, olat + lat + step);
        prop_assert!(x1 > x0);
        prop_assert!(y1 > y0);
    }
}
