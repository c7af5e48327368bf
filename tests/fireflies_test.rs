use portal_scene::{
    data_structures::fireflies::{
        FIREFLY_CEILING, FIREFLY_SPREAD, FireflyRaw, bob_offset, point_size, scatter_fireflies,
    },
    pipelines::fireflies::FirefliesUniform,
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn should_scatter_fireflies_above_the_ground() {
    let mut rng = StdRng::seed_from_u64(35);
    let fireflies = scatter_fireflies(35, &mut rng);
    assert_eq!(fireflies.len(), 35);

    let half = FIREFLY_SPREAD / 2.0;
    for firefly in &fireflies {
        let [x, y, z] = firefly.position;
        assert!((-half..=half).contains(&x));
        assert!((0.0..=FIREFLY_CEILING).contains(&y));
        assert!((-half..=half).contains(&z));
        assert!((0.0..1.0).contains(&firefly.scale));
    }
}

#[test]
fn should_scatter_the_same_layout_for_the_same_seed() {
    let a = scatter_fireflies(10, &mut StdRng::seed_from_u64(3));
    let b = scatter_fireflies(10, &mut StdRng::seed_from_u64(3));
    assert_eq!(a, b);
    assert!(scatter_fireflies(0, &mut StdRng::seed_from_u64(3)).is_empty());
}

#[test]
fn should_bob_by_at_most_a_fifth_of_the_scale() {
    let firefly = FireflyRaw {
        position: [0.3, 1.0, -0.5],
        scale: 0.8,
    };
    for step in 0..100 {
        let offset = bob_offset(step as f32 * 0.1, &firefly);
        assert!(offset.abs() <= 0.8 * 0.2 + 1e-6);
    }
    let still = FireflyRaw {
        position: [0.3, 1.0, -0.5],
        scale: 0.0,
    };
    assert_eq!(bob_offset(1.0, &still), 0.0);
}

#[test]
fn should_shrink_with_distance() {
    let near = point_size(140.0, 0.5, 2.0, 2.0);
    let far = point_size(140.0, 0.5, 2.0, 4.0);
    assert!((near - 70.0).abs() < 1e-4);
    assert!((far - near / 2.0).abs() < 1e-4);
}

#[test]
fn should_pad_the_firefly_uniform_to_16_bytes() {
    assert_eq!(std::mem::size_of::<FirefliesUniform>() % 16, 0);
    let uniform = FirefliesUniform::new(140.0, 2.0, [800.0, 600.0]);
    assert_eq!(uniform.size, 140.0);
    assert_eq!(uniform.pixel_ratio, 2.0);
    assert_eq!(uniform.resolution, [800.0, 600.0]);
    assert_eq!(uniform.time, 0.0);
}
