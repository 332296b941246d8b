use crate::foundation::error::{VisError, VisResult};

/// Activation effect of one section.
pub type ActivateFn<C> = Box<dyn FnMut(&mut C) -> VisResult<()>>;
/// Continuous effect, called with progress in `[0, 1]`.
pub type UpdateFn<C> = Box<dyn FnMut(&mut C, f64) -> VisResult<()>>;

/// What an out-of-range section index does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// Caller bug: panic.
    Panic,
    /// Report [`VisError::SectionOutOfRange`].
    Error,
    /// Log and leave the machine untouched.
    Ignore,
}

impl Default for OutOfRangePolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Panic
        } else {
            Self::Ignore
        }
    }
}

pub struct Section<C> {
    pub name: String,
    activate: ActivateFn<C>,
    update: Option<UpdateFn<C>>,
}

impl<C> Section<C> {
    pub fn new(name: impl Into<String>, activate: ActivateFn<C>) -> Self {
        Self {
            name: name.into(),
            activate,
            update: None,
        }
    }

    pub fn with_update(mut self, update: UpdateFn<C>) -> Self {
        self.update = Some(update);
        self
    }
}

impl<C> std::fmt::Debug for Section<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Section")
            .field("name", &self.name)
            .field("has_update", &self.update.is_some())
            .finish_non_exhaustive()
    }
}

/// Indices whose activation runs when moving from `last` to `target`, in run order.
///
/// Never having activated anything counts as sitting just before section 0, so the first
/// activation walks forward from 0.
pub fn plan(last: Option<usize>, target: usize) -> Vec<usize> {
    match last {
        None => (0..=target).collect(),
        Some(last) if target >= last => (last + 1..=target).collect(),
        Some(last) => (target..last).rev().collect(),
    }
}

/// Index-generic sequencer of section effects over a context `C`.
///
/// Every passed-over section runs exactly once, in scroll order, so a reader who skips ahead or
/// back ends in the same state as one who scrolled through.
#[derive(Debug)]
pub struct SectionMachine<C> {
    sections: Vec<Section<C>>,
    last_index: Option<usize>,
    active_index: usize,
    policy: OutOfRangePolicy,
}

impl<C> SectionMachine<C> {
    pub fn new(sections: Vec<Section<C>>, policy: OutOfRangePolicy) -> Self {
        Self {
            sections,
            last_index: None,
            active_index: 0,
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn section_name(&self, index: usize) -> Option<&str> {
        self.sections.get(index).map(|s| s.name.as_str())
    }

    /// Run every activation effect between the last activated section and `index`. Returns the
    /// indices that ran; empty when an out-of-range index was ignored.
    ///
    /// If an effect fails, the sections before it stay applied and the machine records the last
    /// one that completed.
    #[tracing::instrument(skip(self, ctx), fields(last = ?self.last_index))]
    pub fn activate(&mut self, ctx: &mut C, index: usize) -> VisResult<Vec<usize>> {
        if !self.check(index)? {
            return Ok(Vec::new());
        }

        let steps = plan(self.last_index, index);
        for &i in &steps {
            let section = &mut self.sections[i];
            tracing::debug!(index = i, name = %section.name, "section effect");
            if let Err(err) = (section.activate)(ctx) {
                if let Some(done) = self.completed_before(i, &steps) {
                    self.last_index = Some(done);
                    self.active_index = done;
                }
                return Err(err);
            }
        }

        self.last_index = Some(index);
        self.active_index = index;
        Ok(steps)
    }

    fn completed_before(&self, failed: usize, steps: &[usize]) -> Option<usize> {
        match steps.iter().position(|&s| s == failed) {
            Some(0) | None => self.last_index,
            Some(p) => Some(steps[p - 1]),
        }
    }

    /// Forward scroll progress inside section `index`. Progress is clamped to `[0, 1]`; NaN
    /// counts as 0.
    pub fn update(&mut self, ctx: &mut C, index: usize, progress: f64) -> VisResult<()> {
        if !self.check(index)? {
            return Ok(());
        }
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        match self.sections[index].update.as_mut() {
            Some(update) => update(ctx, progress),
            None => Ok(()),
        }
    }

    fn check(&self, index: usize) -> VisResult<bool> {
        if index < self.sections.len() {
            return Ok(true);
        }
        let err = VisError::SectionOutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len: self.sections.len(),
        };
        match self.policy {
            OutOfRangePolicy::Panic => panic!("{err}"),
            OutOfRangePolicy::Error => Err(err),
            OutOfRangePolicy::Ignore => {
                tracing::warn!(%err, "section request ignored");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sections/machine.rs"]
mod tests;
