use super::*;

#[test]
fn defaults_match_the_page_geometry() {
    let c = EngineConfig::default();
    c.validate().unwrap();
    assert_eq!(c.tree_size(), Size::new(700.0, 500.0));
    assert_eq!(c.durations.list_move_ms, 1000);
    assert_eq!(c.hover_style().tooltip_opacity, 0.7);
    assert_eq!(c.scene_style().tree_link_offset, Vec2::new(0.0, 50.0));
}

#[test]
fn partial_json_fills_in_defaults() {
    let c = EngineConfig::from_json_str(
        r#"{ "viewport": { "width": 400, "height": 300 }, "durations": { "fade_ms": 0 } }"#,
    )
    .unwrap();
    assert_eq!(c.viewport.width, 400.0);
    assert_eq!(c.viewport.margin.left, 20.0);
    assert_eq!(c.durations.fade_ms, 0);
    assert_eq!(c.durations.hover_ms, 200);
    assert_eq!(c.sizes.focused, 80.0);
}

#[test]
fn negative_durations_are_rejected_at_parse_time() {
    let err = EngineConfig::from_json_str(r#"{ "durations": { "hover_ms": -5 } }"#).unwrap_err();
    assert!(matches!(err, VisError::Serde(_)));
}

#[test]
fn validation_rejects_bad_geometry() {
    let mut c = EngineConfig::default();
    c.viewport.width = 0.0;
    assert!(c.validate().is_err());

    let mut c = EngineConfig::default();
    c.tree_inset = 600.0;
    assert!(c.validate().is_err());

    let mut c = EngineConfig::default();
    c.sizes.list = -1.0;
    assert!(c.validate().is_err());

    let mut c = EngineConfig::default();
    c.tooltip_opacity = 1.5;
    assert!(c.validate().is_err());

    let mut c = EngineConfig::default();
    c.force.velocity_decay = 2.0;
    assert!(c.validate().is_err());
}
