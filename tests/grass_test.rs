use portal_scene::data_structures::grass::{
    Blade, GrassConfig, build_field, generate, indices_per_blade, scatter_blades,
    vertices_per_blade,
};
use rand::{SeedableRng, rngs::StdRng};

fn assert_close(actual: [f32; 3], expected: [f32; 3], what: &str) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-5, "{what}: {actual:?} != {expected:?}");
    }
}

fn small_config() -> GrassConfig {
    GrassConfig {
        blade_count: 200,
        seed: Some(7),
        ..GrassConfig::default()
    }
}

#[test]
fn should_count_vertices_and_indices_per_blade() {
    assert_eq!(vertices_per_blade(0), 1);
    assert_eq!(indices_per_blade(0), 0);
    assert_eq!(vertices_per_blade(1), 3);
    assert_eq!(indices_per_blade(1), 3);
    assert_eq!(vertices_per_blade(4), 9);
    assert_eq!(indices_per_blade(4), 21);
}

#[test]
fn should_build_one_blade_with_tip_on_top() {
    let config = small_config();
    let blade = Blade {
        root: [1.0, 0.5].into(),
        yaw: 0.0,
        height: 0.2,
        bend: 0.0,
    };
    let mesh = build_field(&[blade], &config).expect("valid config");
    let (vertices, indices) = (&mesh.vertices, &mesh.indices);

    assert_eq!(vertices.len(), config.vertices_per_blade());
    assert_eq!(indices.len(), config.indices_per_blade());

    let tip = vertices.last().expect("blade has vertices");
    assert!((tip.position[1] - 0.2).abs() < 1e-6);
    assert_eq!(tip.tex_coords, [0.5, 1.0]);
    assert_eq!(tip.sway, 1.0);

    // Root vertices stay on the ground and never sway
    for vertex in &vertices[..2] {
        assert_eq!(vertex.position[1], 0.0);
        assert_eq!(vertex.sway, 0.0);
        assert_eq!(vertex.root, [1.0, 0.5]);
    }
}

#[test]
fn should_taper_and_bend_each_level_of_a_turned_blade() {
    let config = GrassConfig {
        blade_width: 0.1,
        segments: 4,
        ..small_config()
    };
    let blade = Blade {
        root: [1.0, -2.0].into(),
        yaw: 0.7,
        height: 0.5,
        bend: 0.3,
    };
    let mesh = build_field(&[blade], &config).expect("valid config");

    let facing = [blade.yaw.sin(), 0.0, blade.yaw.cos()];
    let side = [blade.yaw.cos(), 0.0, -blade.yaw.sin()];
    let segments = config.segments as usize;
    for level in 0..=segments {
        let t = level as f32 / segments as f32;
        let forward = blade.bend * t * t;
        let center = [
            blade.root.x + facing[0] * forward,
            t * blade.height,
            blade.root.y + facing[2] * forward,
        ];
        if level == segments {
            assert_close(mesh.vertices[2 * level].position, center, "tip");
            continue;
        }
        let half_width = config.blade_width * 0.5 * (1.0 - t);
        let left = [
            center[0] - side[0] * half_width,
            center[1],
            center[2] - side[2] * half_width,
        ];
        let right = [
            center[0] + side[0] * half_width,
            center[1],
            center[2] + side[2] * half_width,
        ];
        assert_close(mesh.vertices[2 * level].position, left, &format!("left edge of level {level}"));
        assert_close(mesh.vertices[2 * level + 1].position, right, &format!("right edge of level {level}"));
    }
}

#[test]
fn should_spread_blades_evenly_over_the_area() {
    let config = GrassConfig {
        blade_count: 4000,
        ..small_config()
    };
    let mut rng = StdRng::seed_from_u64(42);
    let mut r_squared: Vec<f32> = scatter_blades(&config, &mut rng)
        .iter()
        .map(|blade| blade.root.x * blade.root.x + blade.root.y * blade.root.y)
        .collect();
    r_squared.sort_by(f32::total_cmp);

    // Uniform by area means r^2 is uniform between the squared radii
    let inner_sq = config.inner_radius * config.inner_radius;
    let outer_sq = config.radius * config.radius;
    for quantile in [0.25, 0.5, 0.75] {
        let expected = inner_sq + (outer_sq - inner_sq) * quantile;
        let actual = r_squared[(quantile * r_squared.len() as f32) as usize];
        assert!(
            (actual - expected).abs() < 0.2,
            "r^2 quantile {quantile}: {actual} far from {expected}"
        );
    }
}

#[test]
fn should_scatter_blades_inside_the_annulus() {
    let config = small_config();
    let mut rng = StdRng::seed_from_u64(1);
    let blades = scatter_blades(&config, &mut rng);
    assert_eq!(blades.len(), config.blade_count as usize);

    let min_height = config.blade_height * (1.0 - config.height_variation);
    let max_height = config.blade_height * (1.0 + config.height_variation);
    for blade in &blades {
        let r = (blade.root.x * blade.root.x + blade.root.y * blade.root.y).sqrt();
        assert!(r >= config.inner_radius - 1e-4, "blade at r={r} inside the clearing");
        assert!(r <= config.radius + 1e-4, "blade at r={r} outside the field");
        assert!(blade.height >= min_height - 1e-6 && blade.height <= max_height + 1e-6);
    }
}

#[test]
fn should_keep_every_index_inside_the_vertex_buffer() {
    let config = small_config();
    let mesh = generate(&config).expect("valid config");
    assert_eq!(mesh.blade_count(&config), config.blade_count as usize);
    assert_eq!(
        mesh.indices.len(),
        config.blade_count as usize * config.indices_per_blade()
    );
    let vertex_count = mesh.vertices.len() as u32;
    assert!(mesh.indices.iter().all(|&i| i < vertex_count));
}

#[test]
fn should_generate_the_same_field_for_the_same_seed() {
    let config = small_config();
    let a = generate(&config).expect("valid config");
    let b = generate(&config).expect("valid config");
    assert_eq!(a.vertices, b.vertices);
    assert_eq!(a.indices, b.indices);
}

#[test]
fn should_build_an_empty_field_without_blades() {
    let config = GrassConfig {
        blade_count: 0,
        ..small_config()
    };
    let mesh = build_field(&[], &config).expect("valid config");
    assert!(mesh.vertices.is_empty());
    assert!(mesh.indices.is_empty());
}

#[test]
fn should_reject_invalid_grass_configs() {
    let invalid = [
        GrassConfig {
            segments: 0,
            ..GrassConfig::default()
        },
        GrassConfig {
            radius: 0.0,
            ..GrassConfig::default()
        },
        GrassConfig {
            inner_radius: 3.0,
            ..GrassConfig::default()
        },
        GrassConfig {
            height_variation: 1.0,
            ..GrassConfig::default()
        },
        GrassConfig {
            blade_width: -0.1,
            ..GrassConfig::default()
        },
    ];
    for config in invalid {
        assert!(generate(&config).is_err(), "{config:?} should be rejected");
    }
    let blade = Blade {
        root: [0.0, 0.0].into(),
        yaw: 0.0,
        height: 0.2,
        bend: 0.0,
    };
    let flat = GrassConfig {
        segments: 0,
        ..GrassConfig::default()
    };
    assert!(build_field(&[blade], &flat).is_err());
    assert!(GrassConfig::default().validate().is_ok());
}
