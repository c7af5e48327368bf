use portal_scene::{
    config::{CLEAR_COLOR, FIREFLY_SIZE_RANGE},
    data_structures::color::Color,
    scene::{
        SceneState,
        debug::{CONTROLS, ClearColourSync, ControlKind, ControlValue, DebugPanel, PanelValues},
    },
};

#[test]
fn should_bind_four_controls() {
    let names: Vec<&str> = CONTROLS.iter().map(|c| c.name).collect();
    assert_eq!(names, ["fillColor", "glowColor", "fireFlySize", "clearColor"]);
    assert_eq!(
        CONTROLS[2].kind,
        ControlKind::Slider {
            min: 0.0,
            max: 200.0,
            step: 1.0
        }
    );
}

#[test]
fn should_leave_the_state_alone_when_nothing_was_edited() {
    let mut state = SceneState::default();
    let untouched = state.clone();
    let values = PanelValues::from_state(&state);

    assert!(values.apply(&mut state).is_empty());
    assert_eq!(state, untouched);
}

#[test]
fn should_recolour_a_grey_clear_colour_from_the_picker() {
    let mut state = SceneState::default();
    assert_eq!(state.clear_color.to_srgb_hex(), CLEAR_COLOR);

    let mut values = PanelValues::from_state(&state);
    assert_eq!(values.clear_color, [0x1a, 0x1a, 0x1a]);
    values.clear_color = [0x33, 0x66, 0x99];

    assert_eq!(values.apply(&mut state), ["clearColor"]);
    assert_eq!(state.clear_color.to_srgb_hex(), 0x336699);
    assert_eq!(state.fill_color, SceneState::default().fill_color);
}

#[test]
fn should_clamp_the_firefly_slider() {
    let mut state = SceneState::default();
    let mut values = PanelValues::from_state(&state);

    values.firefly_size = 250.0;
    assert_eq!(values.apply(&mut state), ["fireFlySize"]);
    assert_eq!(state.firefly_size, FIREFLY_SIZE_RANGE.1);

    values.firefly_size = -3.0;
    values.apply(&mut state);
    assert_eq!(state.firefly_size, FIREFLY_SIZE_RANGE.0);
}

#[test]
fn should_push_clear_colour_changes_once() {
    let mut state = SceneState::default();
    let mut sync = ClearColourSync::default();

    assert_eq!(sync.change(&state), Some(Color::from_hex(CLEAR_COLOR)));
    assert_eq!(sync.change(&state), None);

    // A programmatic update reaches the context like a panel edit does
    DebugPanel::set_color(&mut state, "clearColor", "#336699").expect("valid colour");
    assert_eq!(sync.change(&state).map(|c| c.to_srgb_hex()), Some(0x336699));
    assert_eq!(sync.change(&state), None);
}

#[test]
fn should_set_controls_by_name() {
    let mut state = SceneState::default();
    DebugPanel::set_color(&mut state, "clearColor", "#ffffff").expect("valid colour");
    assert_eq!(state.clear_color, Color::WHITE);
    DebugPanel::set_value(&mut state, "fireFlySize", 42.0).expect("in range");
    assert_eq!(
        DebugPanel::get(&state, "fireFlySize").expect("known control"),
        ControlValue::Value(42.0)
    );
    assert_eq!(
        DebugPanel::get(&state, "clearColor").expect("known control"),
        ControlValue::Color(Color::WHITE)
    );
    assert_eq!(ControlValue::Color(Color::WHITE).to_string(), "#ffffff");
}

#[test]
fn should_reject_invalid_control_updates() {
    let mut state = SceneState::default();
    let untouched = state.clone();

    assert!(DebugPanel::set_color(&mut state, "skyColor", "#ffffff").is_err());
    assert!(DebugPanel::set_color(&mut state, "fireFlySize", "#ffffff").is_err());
    assert!(DebugPanel::set_color(&mut state, "fillColor", "teal").is_err());
    assert!(DebugPanel::set_value(&mut state, "fillColor", 1.0).is_err());
    assert!(DebugPanel::set_value(&mut state, "fireFlySize", 250.0).is_err());
    assert!(DebugPanel::set_value(&mut state, "fireFlySize", -1.0).is_err());
    assert!(DebugPanel::set_value(&mut state, "fireFlySize", f32::NAN).is_err());
    assert!(DebugPanel::get(&state, "skyColor").is_err());
    assert_eq!(state, untouched);
}
