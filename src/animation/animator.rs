use std::collections::BTreeMap;

use crate::{
    animation::ease::Ease,
    foundation::core::{Point, Vec2},
};

/// Host-supplied monotonic clock reading, in milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Millis(pub u64);

/// Which visual handle a property belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum Target {
    Item(usize),
    Edge(usize),
    TreeLink(usize),
    Title(usize),
    Legend,
    Tooltip,
    NodeGroup,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum Channel {
    Opacity,
    Position,
    /// Edge length of the square image centered on the handle origin.
    ImageSize,
    /// Translation applied to a whole group of handles.
    Offset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct PropKey {
    pub target: Target,
    pub channel: Channel,
}

impl PropKey {
    pub const fn new(target: Target, channel: Channel) -> Self {
        Self { target, channel }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum AnimValue {
    Scalar(f64),
    Point(Point),
    Offset(Vec2),
}

impl AnimValue {
    fn lerp(a: Self, b: Self, t: f64) -> Self {
        match (a, b) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(a + (b - a) * t),
            (Self::Point(a), Self::Point(b)) => Self::Point(a.lerp(b, t)),
            (Self::Offset(a), Self::Offset(b)) => Self::Offset(a.lerp(b, t)),
            // mismatched kinds jump straight to the target
            (_, b) => b,
        }
    }
}

/// Anything whose properties the animator can drive.
pub trait Animatable {
    /// Current value, or `None` if the key names no live handle.
    fn read(&self, key: PropKey) -> Option<AnimValue>;
    fn write(&mut self, key: PropKey, value: AnimValue);
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Tween {
    from: AnimValue,
    to: AnimValue,
    start: Millis,
    duration_ms: u64,
    ease: Ease,
}

impl Tween {
    fn sample(&self, now: Millis) -> (AnimValue, bool) {
        let elapsed = now.0.saturating_sub(self.start.0);
        if elapsed >= self.duration_ms {
            return (self.to, true);
        }
        let t = elapsed as f64 / self.duration_ms as f64;
        (AnimValue::lerp(self.from, self.to, self.ease.apply(t)), false)
    }
}

/// Timed interpolation of handle properties.
///
/// At most one tween exists per [`PropKey`]; scheduling another on the same key replaces it, and
/// the replacement starts from whatever value is currently shown.
#[derive(Clone, Debug, Default)]
pub struct Animator {
    tweens: BTreeMap<PropKey, Tween>,
    now: Millis,
    ease: Ease,
}

impl Animator {
    pub fn new(ease: Ease) -> Self {
        Self {
            tweens: BTreeMap::new(),
            now: Millis(0),
            ease,
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn in_flight(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_animating(&self, key: PropKey) -> bool {
        self.tweens.contains_key(&key)
    }

    /// Final value of the in-flight tween on `key`.
    pub fn pending_target(&self, key: PropKey) -> Option<AnimValue> {
        self.tweens.get(&key).map(|t| t.to)
    }

    /// Move `key` to `to` over `duration_ms`. A zero duration writes immediately.
    pub fn animate(
        &mut self,
        scene: &mut impl Animatable,
        key: PropKey,
        to: AnimValue,
        duration_ms: u64,
    ) {
        let Some(from) = scene.read(key) else {
            self.tweens.remove(&key);
            return;
        };
        if duration_ms == 0 {
            self.tweens.remove(&key);
            scene.write(key, to);
            return;
        }
        self.tweens.insert(
            key,
            Tween {
                from,
                to,
                start: self.now,
                duration_ms,
                ease: self.ease,
            },
        );
    }

    /// Drop an in-flight tween without writing anything.
    pub fn cancel(&mut self, key: PropKey) {
        self.tweens.remove(&key);
    }

    /// Drop every in-flight tween on `channel` for targets accepted by `filter`.
    pub fn cancel_where(&mut self, channel: Channel, filter: impl Fn(Target) -> bool) {
        self.tweens
            .retain(|k, _| !(k.channel == channel && filter(k.target)));
    }

    /// Move the clock to `now`, write sampled values and retire finished tweens. Returns how many
    /// properties were written. The clock never runs backwards.
    pub fn advance(&mut self, scene: &mut impl Animatable, now: Millis) -> usize {
        self.now = self.now.max(now);
        let mut written = 0;
        let mut finished = Vec::new();
        for (key, tween) in &self.tweens {
            let (value, done) = tween.sample(self.now);
            scene.write(*key, value);
            written += 1;
            if done {
                finished.push(*key);
            }
        }
        for key in finished {
            self.tweens.remove(&key);
        }
        written
    }

    /// Jump every in-flight tween to its end value.
    pub fn finish_all(&mut self, scene: &mut impl Animatable) {
        for (key, tween) in std::mem::take(&mut self.tweens) {
            scene.write(key, tween.to);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animator.rs"]
mod tests;
