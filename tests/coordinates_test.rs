use approx::assert_relative_eq;
use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rover_perception::Pose;
use rover_perception::coordinates::{
    NavigationSummary, WorldProjection, clip_to_cell, rotate, rover_coords, to_polar, translate,
};
use rover_perception::mask::BinaryMask;
use rover_perception::types::{PolarPoint, WorldCell};

#[test]
fn test_rover_coords_bottom_center_is_straight_ahead() {
    let mut mask = BinaryMask::new(320, 160);
    mask.set(160, 159, true);
    let pts = rover_coords(&mask);
    assert_eq!(pts, vec![DVec2::new(1.0, 0.0)]);
}

#[test]
fn test_rover_coords_axes() {
    let mut mask = BinaryMask::new(320, 160);
    // far left corner, far right corner, near right
    mask.set(0, 0, true);
    mask.set(319, 0, true);
    mask.set(300, 150, true);
    let pts = rover_coords(&mask);
    assert_eq!(
        pts,
        vec![
            DVec2::new(160.0, 160.0),
            DVec2::new(160.0, -159.0),
            DVec2::new(10.0, -140.0),
        ]
    );
}

#[test]
fn test_rover_coords_scan_order() {
    let mut mask = BinaryMask::new(4, 4);
    mask.set(3, 1, true);
    mask.set(0, 2, true);
    mask.set(1, 1, true);
    let pts = rover_coords(&mask);
    // row 1 before row 2, col 1 before col 3
    assert_eq!(pts.len(), 3);
    assert_eq!(pts[0], DVec2::new(3.0, 1.0));
    assert_eq!(pts[1], DVec2::new(3.0, -1.0));
    assert_eq!(pts[2], DVec2::new(2.0, 2.0));
}

#[test]
fn test_to_polar() {
    let polar = to_polar(&[DVec2::new(3.0, 4.0), DVec2::new(1.0, 0.0), DVec2::new(0.0, -2.0)]);
    assert_relative_eq!(polar[0].distance, 5.0);
    assert_relative_eq!(polar[0].angle, (4.0f64).atan2(3.0));
    assert_relative_eq!(polar[1].angle, 0.0);
    assert_relative_eq!(polar[2].distance, 2.0);
    assert_relative_eq!(polar[2].angle, -std::f64::consts::FRAC_PI_2);
}

#[test]
fn test_rotate_counter_clockwise() {
    let p = rotate(DVec2::new(1.0, 0.0), 90.0);
    assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    let p = rotate(DVec2::new(1.0, 2.0), 180.0);
    assert_relative_eq!(p.x, -1.0, epsilon = 1e-12);
    assert_relative_eq!(p.y, -2.0, epsilon = 1e-12);
}

#[test]
fn test_translate_scales_down() {
    let p = translate(DVec2::new(20.0, -10.0), DVec2::new(50.0, 60.0), 10.0);
    assert_eq!(p, DVec2::new(52.0, 59.0));
}

#[test]
fn test_clip_saturates_never_wraps() {
    assert_eq!(clip_to_cell(DVec2::new(-5.0, 250.0), 200), WorldCell::new(0, 199));
    assert_eq!(clip_to_cell(DVec2::new(199.6, -0.4), 200), WorldCell::new(199, 0));
    assert_eq!(clip_to_cell(DVec2::new(1e9, -1e9), 200), WorldCell::new(199, 0));
    assert_eq!(clip_to_cell(DVec2::new(10.4, 10.6), 200), WorldCell::new(10, 11));
}

#[test]
fn test_clip_tiny_maps_pin_to_origin() {
    assert_eq!(clip_to_cell(DVec2::new(3.7, -2.0), 1), WorldCell::new(0, 0));
    assert_eq!(clip_to_cell(DVec2::new(3.7, -2.0), 0), WorldCell::new(0, 0));
    let proj = WorldProjection::new(0, 10.0);
    let cells = proj.project(&[DVec2::new(50.0, 20.0)], &Pose::new(5.0, 5.0, 45.0));
    assert_eq!(cells, vec![WorldCell::new(0, 0)]);
}

#[test]
fn test_projection_out_of_map_points_are_kept() {
    let proj = WorldProjection::new(200, 10.0);
    let pose = Pose::new(195.0, 5.0, 0.0);
    let pts = vec![DVec2::new(100.0, 0.0), DVec2::new(0.0, -100.0), DVec2::new(10.0, 10.0)];
    let cells = proj.project(&pts, &pose);
    assert_eq!(cells.len(), 3);
    assert_eq!(cells[0], WorldCell::new(199, 5));
    assert_eq!(cells[1], WorldCell::new(195, 0));
    assert_eq!(cells[2], WorldCell::new(196, 6));
}

#[test]
fn test_round_trip_right_angles() {
    let proj = WorldProjection::new(200, 10.0);
    let pts = [DVec2::new(10.0, 0.0), DVec2::new(30.0, -20.0), DVec2::new(150.0, 70.0)];
    for yaw in [0.0, 90.0, 180.0, 270.0] {
        let pose = Pose::new(100.0, 100.0, yaw);
        for p in pts {
            let cell = proj.to_cell(p, &pose);
            let back = proj.to_rover(DVec2::new(cell.x as f64, cell.y as f64), &pose);
            // multiples of the scale survive rounding exactly
            assert_relative_eq!(back.x, p.x, epsilon = 1e-9);
            assert_relative_eq!(back.y, p.y, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_round_trip_arbitrary_heading() {
    let proj = WorldProjection::new(1000, 10.0);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..200 {
        let yaw = rng.random_range(0.0..360.0);
        let pose = Pose::new(rng.random_range(300.0..700.0), rng.random_range(300.0..700.0), yaw);
        let p = DVec2::new(rng.random_range(0.0..160.0), rng.random_range(-160.0..160.0));

        let exact = proj.to_rover(proj.to_world(p, &pose), &pose);
        assert_relative_eq!(exact.x, p.x, epsilon = 1e-9);
        assert_relative_eq!(exact.y, p.y, epsilon = 1e-9);

        // rounding to a cell moves at most half a cell per axis
        let cell = proj.to_cell(p, &pose);
        let back = proj.to_rover(DVec2::new(cell.x as f64, cell.y as f64), &pose);
        assert!(back.distance(p) <= 0.5 * 2f64.sqrt() * proj.scale + 1e-9);
    }
}

#[test]
fn test_navigation_summary() {
    let polar = vec![
        PolarPoint { distance: 10.0, angle: 0.5 },
        PolarPoint { distance: 20.0, angle: -0.1 },
    ];
    let s = NavigationSummary::from_polar(&polar);
    assert_eq!(s.count, 2);
    assert_relative_eq!(s.mean_distance, 15.0);
    assert_relative_eq!(s.mean_angle, 0.2);
    assert_relative_eq!(s.mean_angle_deg, 0.2f64.to_degrees());
    assert_eq!(NavigationSummary::from_polar(&[]).count, 0);
}
