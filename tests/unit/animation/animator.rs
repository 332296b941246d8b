use std::collections::HashMap;

use super::*;

#[derive(Default)]
struct Props(HashMap<PropKey, AnimValue>);

impl Animatable for Props {
    fn read(&self, key: PropKey) -> Option<AnimValue> {
        self.0.get(&key).copied()
    }

    fn write(&mut self, key: PropKey, value: AnimValue) {
        self.0.insert(key, value);
    }
}

const OPACITY: PropKey = PropKey::new(Target::Item(0), Channel::Opacity);
const POSITION: PropKey = PropKey::new(Target::Item(0), Channel::Position);

fn props() -> Props {
    let mut p = Props::default();
    p.write(OPACITY, AnimValue::Scalar(0.0));
    p.write(POSITION, AnimValue::Point(Point::new(0.0, 0.0)));
    p
}

fn scalar(p: &Props, key: PropKey) -> f64 {
    match p.read(key) {
        Some(AnimValue::Scalar(v)) => v,
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn zero_duration_writes_immediately() {
    let mut p = props();
    let mut a = Animator::new(Ease::Linear);
    a.animate(&mut p, OPACITY, AnimValue::Scalar(1.0), 0);
    assert_eq!(scalar(&p, OPACITY), 1.0);
    assert_eq!(a.in_flight(), 0);
}

#[test]
fn linear_tween_samples_midpoint_and_retires() {
    let mut p = props();
    let mut a = Animator::new(Ease::Linear);
    a.animate(&mut p, OPACITY, AnimValue::Scalar(1.0), 600);
    assert_eq!(scalar(&p, OPACITY), 0.0);
    a.advance(&mut p, Millis(300));
    assert!((scalar(&p, OPACITY) - 0.5).abs() < 1e-12);
    assert!(a.is_animating(OPACITY));
    a.advance(&mut p, Millis(600));
    assert_eq!(scalar(&p, OPACITY), 1.0);
    assert!(!a.is_animating(OPACITY));
}

#[test]
fn later_transition_supersedes_in_flight_one() {
    let mut p = props();
    let mut a = Animator::new(Ease::Linear);
    a.animate(&mut p, OPACITY, AnimValue::Scalar(1.0), 1000);
    a.advance(&mut p, Millis(500));
    a.animate(&mut p, OPACITY, AnimValue::Scalar(0.0), 100);
    assert_eq!(a.in_flight(), 1);
    assert_eq!(a.pending_target(OPACITY), Some(AnimValue::Scalar(0.0)));
    a.advance(&mut p, Millis(550));
    assert!((scalar(&p, OPACITY) - 0.25).abs() < 1e-12);
    a.advance(&mut p, Millis(2000));
    assert_eq!(scalar(&p, OPACITY), 0.0);
}

#[test]
fn instant_write_cancels_in_flight_tween() {
    let mut p = props();
    let mut a = Animator::new(Ease::Linear);
    a.animate(&mut p, OPACITY, AnimValue::Scalar(1.0), 1000);
    a.animate(&mut p, OPACITY, AnimValue::Scalar(0.0), 0);
    a.advance(&mut p, Millis(500));
    assert_eq!(scalar(&p, OPACITY), 0.0);
}

#[test]
fn properties_animate_independently() {
    let mut p = props();
    let mut a = Animator::new(Ease::Linear);
    a.animate(&mut p, OPACITY, AnimValue::Scalar(1.0), 100);
    a.animate(
        &mut p,
        POSITION,
        AnimValue::Point(Point::new(100.0, 50.0)),
        200,
    );
    a.advance(&mut p, Millis(100));
    assert_eq!(scalar(&p, OPACITY), 1.0);
    assert_eq!(
        p.read(POSITION),
        Some(AnimValue::Point(Point::new(50.0, 25.0)))
    );
    assert_eq!(a.in_flight(), 1);
}

#[test]
fn unknown_keys_are_ignored() {
    let mut p = props();
    let mut a = Animator::new(Ease::Linear);
    let ghost = PropKey::new(Target::Item(9), Channel::Opacity);
    a.animate(&mut p, ghost, AnimValue::Scalar(1.0), 100);
    assert_eq!(a.in_flight(), 0);
    assert_eq!(p.read(ghost), None);
}

#[test]
fn cancel_where_filters_by_channel_and_target() {
    let mut p = props();
    let mut a = Animator::new(Ease::Linear);
    a.animate(&mut p, OPACITY, AnimValue::Scalar(1.0), 100);
    a.animate(&mut p, POSITION, AnimValue::Point(Point::new(1.0, 1.0)), 100);
    a.cancel_where(Channel::Position, |t| matches!(t, Target::Item(_)));
    assert!(a.is_animating(OPACITY));
    assert!(!a.is_animating(POSITION));
    a.finish_all(&mut p);
    assert_eq!(scalar(&p, OPACITY), 1.0);
    assert_eq!(a.in_flight(), 0);
}

#[test]
fn clock_never_runs_backwards() {
    let mut p = props();
    let mut a = Animator::new(Ease::Linear);
    a.advance(&mut p, Millis(500));
    a.advance(&mut p, Millis(100));
    assert_eq!(a.now(), Millis(500));
}

#[test]
fn points_and_offsets_interpolate_componentwise() {
    let offset = PropKey::new(Target::NodeGroup, Channel::Offset);
    let mut p = props();
    p.write(POSITION, AnimValue::Point(Point::new(0.0, 10.0)));
    p.write(offset, AnimValue::Offset(Vec2::new(0.0, 0.0)));

    let mut a = Animator::new(Ease::Linear);
    a.animate(&mut p, POSITION, AnimValue::Point(Point::new(10.0, 0.0)), 400);
    a.animate(&mut p, offset, AnimValue::Offset(Vec2::new(0.0, 50.0)), 400);
    a.advance(&mut p, Millis(100));

    assert_eq!(p.read(POSITION), Some(AnimValue::Point(Point::new(2.5, 7.5))));
    assert_eq!(p.read(offset), Some(AnimValue::Offset(Vec2::new(0.0, 12.5))));
}

#[test]
fn mismatched_value_kinds_jump_to_the_target() {
    let mut p = props();
    let mut a = Animator::new(Ease::Linear);
    a.animate(&mut p, OPACITY, AnimValue::Point(Point::new(3.0, 4.0)), 400);
    a.advance(&mut p, Millis(100));
    assert_eq!(p.read(OPACITY), Some(AnimValue::Point(Point::new(3.0, 4.0))));
}
