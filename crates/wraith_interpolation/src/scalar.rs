//! # Scalar and Action Interpolants
//!
//! Action interpolants turn an instantaneous boolean ("is crouch held?") into a
//! continuous scalar that animation and behaviour code can blend with.
//!
//! ```text
//! held:        ____/‾‾‾‾‾‾‾‾‾‾‾\_______
//! Bidirectional:   /‾‾‾‾‾‾‾‾\___        ramps up, ramps down
//! Unidirectional:  /‾‾‾‾‾‾‾‾|___        ramps up, snaps back
//! Infinite:        /        |___        grows while held, snaps back
//! ```
//!
//! The value advances by exactly `time_diff` per update, so its unit is the
//! caller's time unit.

use tracing::debug;

use crate::error::{InterpolationError, InterpolationResult};
use crate::source::SampleSource;

/// A bounded scalar with no temporal memory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarInterpolant {
    value: f64,
    min_value: f64,
    max_value: f64,
}

impl ScalarInterpolant {
    /// Creates a scalar starting at `min_value`.
    ///
    /// `min_value == max_value` is allowed and yields a constant.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::InvalidBounds`] if either bound is NaN or
    /// `min_value > max_value`.
    pub fn new(min_value: f64, max_value: f64) -> InterpolationResult<Self> {
        if min_value.is_nan() || max_value.is_nan() || min_value > max_value {
            return Err(InterpolationError::InvalidBounds {
                min: min_value,
                max: max_value,
            });
        }
        Ok(Self {
            value: min_value,
            min_value,
            max_value,
        })
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.value
    }

    /// `value / (max - min)`. A constant (`min == max`) reads as `0.0`.
    #[must_use]
    pub fn get_normalized(&self) -> f64 {
        let range = self.max_value - self.min_value;
        if range == 0.0 {
            return 0.0;
        }
        self.value / range
    }

    /// `max - value`.
    #[must_use]
    pub fn get_inverse(&self) -> f64 {
        self.max_value - self.value
    }

    /// Lower bound.
    #[must_use]
    pub const fn min_value(&self) -> f64 {
        self.min_value
    }

    /// Upper bound. `f64::INFINITY` for unbounded scalars.
    #[must_use]
    pub const fn max_value(&self) -> f64 {
        self.max_value
    }

    fn set_clamped(&mut self, value: f64) {
        // Bounds are validated at construction, clamp cannot panic.
        self.value = value.clamp(self.min_value, self.max_value);
    }

    fn reset(&mut self) {
        self.value = self.min_value;
    }
}

/// How an [`ActionInterpolant`] reacts to its predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Ramps up while held, ramps back down while released.
    Bidirectional,
    /// Ramps up while held, resets to `min` the moment it is released.
    Unidirectional,
    /// Like `Unidirectional` with no upper bound.
    Infinite,
}

/// Scalar driven toward its bounds by a boolean sampled every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionInterpolant {
    scalar: ScalarInterpolant,
    kind: ActionKind,
}

impl ActionInterpolant {
    /// Bidirectional ramp within `[min_value, max_value]`, e.g. a crouch blend weight.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::InvalidBounds`] for inverted or NaN bounds.
    pub fn bidirectional(min_value: f64, max_value: f64) -> InterpolationResult<Self> {
        Ok(Self {
            scalar: ScalarInterpolant::new(min_value, max_value)?,
            kind: ActionKind::Bidirectional,
        })
    }

    /// Charge while held, release instantly, e.g. a jump charge.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::InvalidBounds`] for inverted or NaN bounds.
    pub fn unidirectional(min_value: f64, max_value: f64) -> InterpolationResult<Self> {
        Ok(Self {
            scalar: ScalarInterpolant::new(min_value, max_value)?,
            kind: ActionKind::Unidirectional,
        })
    }

    /// Unbounded hold timer that resets to `min_value` on release.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::InvalidBounds`] if `min_value` is NaN.
    pub fn infinite(min_value: f64) -> InterpolationResult<Self> {
        Ok(Self {
            scalar: ScalarInterpolant::new(min_value, f64::INFINITY)?,
            kind: ActionKind::Infinite,
        })
    }

    /// Advances by `time_diff` according to whether the action is `active`.
    ///
    /// A NaN or infinite `time_diff` is ignored.
    pub fn update(&mut self, time_diff: f64, active: bool) {
        if !time_diff.is_finite() {
            debug!(time_diff, kind = ?self.kind, "ignoring non-finite action time step");
            return;
        }

        match (self.kind, active) {
            (ActionKind::Bidirectional, true) => self.scalar.set_clamped(self.scalar.value + time_diff),
            (ActionKind::Bidirectional, false) => self.scalar.set_clamped(self.scalar.value - time_diff),
            (ActionKind::Unidirectional | ActionKind::Infinite, true) => {
                self.scalar.set_clamped(self.scalar.value + time_diff);
            }
            (ActionKind::Unidirectional | ActionKind::Infinite, false) => self.scalar.reset(),
        }
    }

    /// Samples the predicate once and applies [`ActionInterpolant::update`].
    pub fn update_from<S>(&mut self, time_diff: f64, source: &mut S)
    where
        S: SampleSource<bool> + ?Sized,
    {
        let active = source.sample();
        self.update(time_diff, active);
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.scalar.get()
    }

    /// See [`ScalarInterpolant::get_normalized`].
    #[must_use]
    pub fn get_normalized(&self) -> f64 {
        self.scalar.get_normalized()
    }

    /// See [`ScalarInterpolant::get_inverse`].
    #[must_use]
    pub fn get_inverse(&self) -> f64 {
        self.scalar.get_inverse()
    }

    /// The underlying bounded scalar.
    #[must_use]
    pub const fn scalar(&self) -> &ScalarInterpolant {
        &self.scalar
    }

    /// The reaction policy.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Drops back to `min` immediately.
    pub fn reset(&mut self) {
        self.scalar.reset();
    }
}
