//! Integration tests for the galaxy and star field generators.
//!
//! These run the public generators end to end and check the properties the
//! viewer relies on: buffer layout, arm geometry, the radial color gradient
//! and the star cube bounds.

use galaxy_gen::galaxy::{branch_angle, radial_color, sample_particle};
use galaxy_gen::prelude::*;
use galaxy_gen::STAR_FIELD_EXTENT;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::f32::consts::TAU;

fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Parameters with no jitter, so every particle lies on its arm curve.
fn flat(count: u32, branches: u32) -> GalaxyParams {
    GalaxyParams::default()
        .with_count(count)
        .with_branches(branches)
        .with_radius(5.0)
        .with_spin(0.0)
        .with_randomness(0.0, 3.0)
}

fn xz_distance(p: Vec3) -> f32 {
    (p.x * p.x + p.z * p.z).sqrt()
}

// ============================================================================
// Galaxy
// ============================================================================

#[test]
fn test_galaxy_buffers_hold_three_floats_per_particle() {
    for count in [1, 7, 1_000] {
        let params = GalaxyParams::default().with_count(count);
        let cloud = generate_galaxy(&params, &mut rng(1)).unwrap();

        assert_eq!(cloud.len(), count as usize);
        assert_eq!(cloud.positions().len(), 3 * count as usize);
        assert_eq!(cloud.colors().map(<[f32]>::len), Some(3 * count as usize));
    }
}

#[test]
fn test_galaxy_default_size() {
    let params = GalaxyParams::default();
    let cloud = GalaxyGenerator.generate(&params).unwrap();
    assert_eq!(cloud.len(), params.count as usize);
    assert!(cloud.iter_positions().all(|p| p.is_finite()));
}

#[test]
fn test_zero_randomness_is_flat_and_on_radius() {
    let params = flat(2_000, 3);
    let cloud = generate_galaxy(&params, &mut rng(2)).unwrap();

    for p in cloud.iter_positions() {
        assert_eq!(p.y, 0.0);
        assert!(xz_distance(p) <= params.radius + 1e-4, "{p:?} outside radius");
    }
}

#[test]
fn test_zero_randomness_uses_exactly_branch_angles() {
    let branches = 5;
    let params = flat(500, branches);
    let cloud = generate_galaxy(&params, &mut rng(3)).unwrap();

    for (i, p) in cloud.iter_positions().enumerate() {
        // Direction is undefined at the center
        if xz_distance(p) < 1e-3 {
            continue;
        }
        let angle = branch_angle(i as u32, branches);
        let expected = Vec3::new(angle.cos(), 0.0, angle.sin());
        let dir = p.normalize();
        assert!(
            dir.dot(expected) > 0.9999,
            "particle {i} at {p:?} is off arm {}",
            i as u32 % branches
        );
    }
}

#[test]
fn test_branch_angles_evenly_spaced() {
    for branches in [2, 3, 7, 20] {
        let params = GalaxyParams::default().with_branches(branches);
        let mut rng = rng(u64::from(branches));

        let mut angles: Vec<f32> = (0..branches * 10)
            .map(|i| sample_particle(i, &params, &mut rng).branch_angle)
            .collect();
        angles.sort_by(f32::total_cmp);
        angles.dedup_by(|a, b| (*a - *b).abs() < 1e-5);

        assert_eq!(angles.len(), branches as usize, "B = {branches}");
        assert_eq!(angles[0], 0.0);
        let step = TAU / branches as f32;
        for pair in angles.windows(2) {
            assert!(
                (pair[1] - pair[0] - step).abs() < 1e-5,
                "B = {branches}: gap {} != {step}",
                pair[1] - pair[0]
            );
        }
        assert!((TAU - angles[angles.len() - 1] - step).abs() < 1e-5);
    }
}

#[test]
fn test_two_arm_scenario() {
    let params = GalaxyParams::default()
        .with_count(4)
        .with_branches(2)
        .with_radius(10.0)
        .with_spin(0.0)
        .with_randomness(0.0, 3.0);
    let cloud = generate_galaxy(&params, &mut rng(4)).unwrap();

    assert_eq!(cloud.positions().len(), 12);
    for i in 0..4 {
        let p = cloud.position(i);
        assert_eq!(p.y, 0.0);
        assert!(p.z.abs() < 1e-4 * params.radius, "z = {}", p.z);
        if i % 2 == 0 {
            assert!(p.x >= 0.0);
        } else {
            assert!(p.x <= 0.0);
        }
        assert!(p.x.abs() <= 10.0 + 1e-4);
    }
}

#[test]
fn test_colors_follow_radial_gradient() {
    let inside = srgb_hex(0xff6030);
    let outside = srgb_hex(0x1b3984);
    let params = flat(1_000, 3).with_colors(inside, outside);
    let cloud = generate_galaxy(&params, &mut rng(5)).unwrap();

    for i in 0..cloud.len() {
        let distance = xz_distance(cloud.position(i));
        let expected = inside.lerp(outside, distance / params.radius);
        let color = cloud.color(i).unwrap();
        assert!(color.abs_diff_eq(expected, 1e-4), "{color:?} != {expected:?}");
    }
}

#[test]
fn test_gradient_endpoints() {
    let params = GalaxyParams::default();
    assert_eq!(radial_color(0.0, &params), params.inside_color);
    assert!(radial_color(params.radius, &params).abs_diff_eq(params.outside_color, 1e-6));
}

#[test]
fn test_jitter_stays_within_randomness_radius() {
    let params = flat(5_000, 3).with_randomness(0.5, 3.0);
    let cloud = generate_galaxy(&params, &mut rng(6)).unwrap();

    let bound = params.radius * (1.0 + params.randomness * 3f32.sqrt()) + 1e-3;
    for p in cloud.iter_positions() {
        assert!(p.length() <= bound, "{p:?} beyond {bound}");
        assert!(p.y.abs() <= params.randomness * params.radius + 1e-4);
    }
}

#[test]
fn test_fresh_generations_differ() {
    let params = GalaxyParams::default().with_count(1_000);
    let a = GalaxyGenerator.generate(&params).unwrap();
    let b = GalaxyGenerator.generate(&params).unwrap();

    assert_eq!(a.len(), b.len());
    assert_ne!(a.positions(), b.positions());
}

#[test]
fn test_zero_counts_give_empty_clouds() {
    let params = GalaxyParams::default().with_count(0).with_stars(0);

    let galaxy = generate_galaxy(&params, &mut rng(7)).unwrap();
    assert!(galaxy.is_empty());
    assert!(galaxy.positions().is_empty());
    assert_eq!(galaxy.colors().map(<[f32]>::len), Some(0));

    let stars = generate_stars(&params, &mut rng(7)).unwrap();
    assert!(stars.is_empty());
}

// ============================================================================
// Star field
// ============================================================================

#[test]
fn test_stars_inside_cube() {
    let params = GalaxyParams::default().with_stars(20_000);
    let cloud = generate_stars(&params, &mut rng(8)).unwrap();
    let half = STAR_FIELD_EXTENT / 2.0;

    assert_eq!(cloud.positions().len(), 3 * 20_000);
    assert!(!cloud.has_colors());
    for p in cloud.iter_positions() {
        assert!(p.abs().max_element() <= half, "{p:?} outside cube");
    }
}

#[test]
fn test_stars_spread_across_cube() {
    let params = GalaxyParams::default().with_stars(10_000);
    let cloud = generate_stars(&params, &mut rng(9)).unwrap();

    let min = cloud.iter_positions().fold(Vec3::splat(f32::MAX), Vec3::min);
    let max = cloud.iter_positions().fold(Vec3::splat(f32::MIN), Vec3::max);
    let half = STAR_FIELD_EXTENT / 2.0;

    assert!(min.max_element() < -0.9 * half);
    assert!(max.min_element() > 0.9 * half);
}

#[test]
fn test_star_generator_default() {
    let cloud = StarFieldGenerator.generate(&GalaxyParams::default()).unwrap();
    assert_eq!(cloud.len(), GalaxyParams::default().stars as usize);
}
