use std::collections::HashMap;

use crate::foundation::core::{ItemId, Point, Viewport};

/// Evenly spaced points for an ordered domain, with half a step of padding at both ends and
/// whole-pixel rounding.
#[derive(Clone, Debug, PartialEq)]
pub struct PointScale {
    domain: Vec<ItemId>,
    index: HashMap<ItemId, usize>,
    start: f64,
    step: f64,
}

impl PointScale {
    pub fn new(domain: &[ItemId], range: (f64, f64)) -> Self {
        let n = domain.len() as f64;
        let (lo, hi) = if range.1 < range.0 {
            (range.1, range.0)
        } else {
            range
        };

        // n - 1 inner gaps plus two half-step outer paddings
        let step = ((hi - lo) / n.max(1.0)).floor();
        let start = js_round(lo + (hi - lo - step * (n - 1.0)) * 0.5);

        let mut index = HashMap::with_capacity(domain.len());
        for (i, id) in domain.iter().enumerate() {
            index.entry(id.clone()).or_insert(i);
        }

        Self {
            domain: domain.to_vec(),
            index,
            start,
            step,
        }
    }

    pub fn domain(&self) -> &[ItemId] {
        &self.domain
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.index
            .get(id)
            .map(|&i| self.start + self.step * i as f64)
    }
}

// Halves round toward +inf.
fn js_round(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListAxis {
    Horizontal,
    Vertical,
}

/// One-dimensional list placement of the hierarchy's pre-order sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct OrdinalLayout {
    axis: ListAxis,
    scale: PointScale,
    cross: f64,
}

impl OrdinalLayout {
    /// Items spread over `[0, width]`, vertically centered.
    pub fn horizontal(order: &[ItemId], viewport: &Viewport) -> Self {
        Self {
            axis: ListAxis::Horizontal,
            scale: PointScale::new(order, (0.0, viewport.width)),
            cross: viewport.height / 2.0,
        }
    }

    /// Items spread over `[0, height]` in a column at `column_x`.
    pub fn vertical(order: &[ItemId], viewport: &Viewport, column_x: f64) -> Self {
        Self {
            axis: ListAxis::Vertical,
            scale: PointScale::new(order, (0.0, viewport.height)),
            cross: column_x,
        }
    }

    pub fn axis(&self) -> ListAxis {
        self.axis
    }

    pub fn order(&self) -> &[ItemId] {
        self.scale.domain()
    }

    pub fn position_of(&self, id: &str) -> Option<Point> {
        let along = self.scale.get(id)?;
        Some(match self.axis {
            ListAxis::Horizontal => Point::new(along, self.cross),
            ListAxis::Vertical => Point::new(self.cross, along),
        })
    }

    /// `(id, position)` in list order.
    pub fn placements(&self) -> impl Iterator<Item = (&ItemId, Point)> + '_ {
        self.order()
            .iter()
            .filter_map(|id| self.position_of(id.as_str()).map(|p| (id, p)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/ordinal.rs"]
mod tests;
