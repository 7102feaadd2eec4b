//! # Blend Strategies
//!
//! A snapshot interpolant is generic over the value it tracks. The value type
//! decides two things through [`Snapshottable`]:
//!
//! - **merge**: how a raw network sample is written into a ring slot, and
//!   whether it is accepted at all.
//! - **blend**: how two bracketing slots are mixed at fraction `f`.
//!
//! [`BlendMode`] selects the blend at construction time:
//!
//! | Type         | Step | Linear          | Spherical |
//! |--------------|------|-----------------|-----------|
//! | `bool`       | yes  | -               | -         |
//! | `Vec3`       | yes  | component lerp  | -         |
//! | `Quaternion` | yes  | nlerp           | slerp     |

use std::fmt::Debug;

use wraith_shared::{Quaternion, Vec3};

use crate::error::{InterpolationError, InterpolationResult};

/// How two bracketing snapshots are mixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Hold the start-of-interval value until the next interval begins.
    Step,
    /// Straight-line interpolation.
    Linear,
    /// Constant angular velocity along the shortest arc (rotations only).
    Spherical,
}

/// A value that can live in a snapshot ring buffer.
///
/// Implementors are plain `Copy` data so ring slots are stored inline and
/// mutated in place.
pub trait Snapshottable: Copy + Default + Debug {
    /// Raw form delivered by the network layer.
    type Sample;

    /// Human-readable type name for diagnostics.
    const NAME: &'static str;

    /// Whether `mode` is meaningful for this type.
    fn supports(mode: BlendMode) -> bool;

    /// Writes `sample` into `target`.
    ///
    /// # Errors
    ///
    /// Returns an error when the sample must not enter the buffer. `target`
    /// may have been partially written; callers merge into a staged copy.
    fn merge(target: &mut Self, sample: Self::Sample) -> InterpolationResult<()>;

    /// Mixes `src` (fraction 0) and `dst` (fraction 1).
    ///
    /// # Errors
    ///
    /// Returns an error if the result is not a valid value.
    fn blend(src: Self, dst: Self, f: f64, mode: BlendMode) -> InterpolationResult<Self>;
}

impl Snapshottable for bool {
    type Sample = bool;

    const NAME: &'static str = "bool";

    fn supports(mode: BlendMode) -> bool {
        mode == BlendMode::Step
    }

    fn merge(target: &mut Self, sample: bool) -> InterpolationResult<()> {
        *target = sample;
        Ok(())
    }

    // A flag has no intermediate state: always the start of the interval.
    fn blend(src: Self, _dst: Self, _f: f64, _mode: BlendMode) -> InterpolationResult<Self> {
        Ok(src)
    }
}

impl Snapshottable for Vec3 {
    type Sample = [f32; 3];

    const NAME: &'static str = "Vec3";

    fn supports(mode: BlendMode) -> bool {
        matches!(mode, BlendMode::Step | BlendMode::Linear)
    }

    fn merge(target: &mut Self, sample: [f32; 3]) -> InterpolationResult<()> {
        *target = Self::from_array(sample);
        if !target.is_finite() {
            return Err(InterpolationError::NumericCorruption {
                context: "position sample",
            });
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn blend(src: Self, dst: Self, f: f64, mode: BlendMode) -> InterpolationResult<Self> {
        let blended = match mode {
            BlendMode::Step => src,
            BlendMode::Linear => src.lerp(dst, f as f32),
            BlendMode::Spherical => {
                return Err(InterpolationError::UnsupportedBlend {
                    mode,
                    value_type: Self::NAME,
                })
            }
        };
        if !blended.is_finite() {
            return Err(InterpolationError::NumericCorruption {
                context: "position blend",
            });
        }
        Ok(blended)
    }
}

impl Snapshottable for Quaternion {
    type Sample = [f32; 4];

    const NAME: &'static str = "Quaternion";

    fn supports(_mode: BlendMode) -> bool {
        true
    }

    fn merge(target: &mut Self, sample: [f32; 4]) -> InterpolationResult<()> {
        let raw = Self::from_array(sample);
        if !raw.is_finite() {
            return Err(InterpolationError::NumericCorruption {
                context: "rotation sample",
            });
        }
        *target = raw
            .normalized()
            .ok_or(InterpolationError::DegenerateQuaternion {
                length: raw.length(),
            })?;
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn blend(src: Self, dst: Self, f: f64, mode: BlendMode) -> InterpolationResult<Self> {
        let blended = match mode {
            BlendMode::Step => src,
            BlendMode::Linear => src.nlerp(dst, f as f32),
            BlendMode::Spherical => src.slerp(dst, f as f32),
        };
        if !blended.is_finite() {
            return Err(InterpolationError::NumericCorruption {
                context: "rotation blend",
            });
        }
        Ok(blended)
    }
}
