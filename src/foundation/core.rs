use std::{borrow::Borrow, fmt};

use crate::foundation::error::{VisError, VisResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Stable identity of one item across every layout.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Outer margins around the drawing area, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Margin {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 0.0,
            left: 20.0,
            bottom: 40.0,
            right: 10.0,
        }
    }
}

/// Fixed logical drawing area. Every layout computes coordinates inside `width x height`; the
/// margin only matters to whoever turns the scene into pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin: Margin,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin: Margin::default(),
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> VisResult<Self> {
        let vp = Self {
            width,
            height,
            margin: Margin::default(),
        };
        vp.validate()?;
        Ok(vp)
    }

    pub fn validate(&self) -> VisResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(VisError::validation("viewport width must be finite and > 0"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(VisError::validation(
                "viewport height must be finite and > 0",
            ));
        }
        let m = self.margin;
        if [m.top, m.left, m.bottom, m.right]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(VisError::validation("viewport margins must be finite and >= 0"));
        }
        Ok(())
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Total surface size including margins.
    pub fn outer_size(&self) -> Size {
        Size::new(
            self.width + self.margin.left + self.margin.right,
            self.height + self.margin.top + self.margin.bottom,
        )
    }
}

/// Square image extent centered on a handle's origin, `size` pixels wide.
pub fn centered_square(size: f64) -> Rect {
    let h = size / 2.0;
    Rect::new(-h, -h, h, h)
}
