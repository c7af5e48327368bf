use portal_scene::{
    camera::AutoOrbit,
    config::{CameraConfig, SceneConfig, pixel_ratio, surface_size},
    data_structures::grass::GrassConfig,
    scene::SceneState,
};

#[test]
fn should_accept_the_default_scene() {
    let config = SceneConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.firefly_count, 35);
    assert_eq!(config.firefly_size, 140.0);
    assert_eq!(config.fill_color.to_srgb_hex(), 0x1c7f8d);
    assert_eq!(config.glow_color.to_srgb_hex(), 0xbef5f5);
    assert_eq!(config.camera.position, [1.5, 2.0, 4.0]);
    assert_eq!(config.camera.fovy_degrees, 45.0);
    assert!(!config.debug_panel_open);
}

#[test]
fn should_reject_invalid_scenes() {
    let invalid = [
        SceneConfig {
            firefly_size: 201.0,
            ..SceneConfig::default()
        },
        SceneConfig {
            scene_model: String::new(),
            ..SceneConfig::default()
        },
        SceneConfig {
            camera: CameraConfig {
                znear: 0.0,
                ..CameraConfig::default()
            },
            ..SceneConfig::default()
        },
        SceneConfig {
            camera: CameraConfig {
                fovy_degrees: 180.0,
                ..CameraConfig::default()
            },
            ..SceneConfig::default()
        },
        SceneConfig {
            camera: CameraConfig {
                auto_orbit: Some(AutoOrbit {
                    radius: 0.0,
                    angular_speed: 0.5,
                }),
                ..CameraConfig::default()
            },
            ..SceneConfig::default()
        },
        SceneConfig {
            grass: GrassConfig {
                segments: 0,
                ..GrassConfig::default()
            },
            ..SceneConfig::default()
        },
    ];
    for config in invalid {
        assert!(config.validate().is_err(), "{config:?} should be rejected");
    }
}

#[test]
fn should_allow_a_still_camera() {
    let config = SceneConfig {
        camera: CameraConfig {
            auto_orbit: None,
            ..CameraConfig::default()
        },
        ..SceneConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn should_cap_the_pixel_ratio() {
    assert_eq!(pixel_ratio(1.0), 1.0);
    assert_eq!(pixel_ratio(1.5), 1.5);
    assert_eq!(pixel_ratio(3.0), 2.0);
}

#[test]
fn should_shrink_the_drawing_buffer_above_the_pixel_ratio_cap() {
    assert_eq!(surface_size(1920, 1080, 1.0), [1920, 1080]);
    assert_eq!(surface_size(2560, 1600, 2.0), [2560, 1600]);
    // 1000x600 CSS pixels at a device ratio of 3 are drawn at ratio 2
    assert_eq!(surface_size(3000, 1800, 3.0), [2000, 1200]);
    assert_eq!(surface_size(1, 1, 4.0), [1, 1]);
}

#[test]
fn should_seed_the_state_from_the_config() {
    let config = SceneConfig {
        firefly_size: 20.0,
        ..SceneConfig::default()
    };
    let state = SceneState::from_config(&config);
    assert_eq!(state.firefly_size, 20.0);
    assert_eq!(state.clear_color, config.clear_color);
    assert_eq!(SceneState::default().firefly_size, 140.0);
}
