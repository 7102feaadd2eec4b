//! Ready-made snapshot interpolants for the three tracked property kinds.

use wraith_shared::{Quaternion, Vec3};

use crate::blend::BlendMode;
use crate::error::InterpolationResult;
use crate::snapshot::SnapshotInterpolant;

/// Boolean state flag. Changes instantly at interval boundaries.
pub type BinaryInterpolant = SnapshotInterpolant<bool>;

/// World position, linearly interpolated. NaN samples are rejected.
pub type PositionInterpolant = SnapshotInterpolant<Vec3>;

/// Orientation, spherically interpolated along the shortest arc.
pub type QuaternionInterpolant = SnapshotInterpolant<Quaternion>;

impl SnapshotInterpolant<bool> {
    /// Step-blended flag interpolant.
    ///
    /// # Errors
    ///
    /// See [`SnapshotInterpolant::new`].
    pub fn binary(time_delay: f64, num_frames: usize) -> InterpolationResult<Self> {
        Self::new(time_delay, num_frames, BlendMode::Step)
    }
}

impl SnapshotInterpolant<Vec3> {
    /// Linearly blended position interpolant.
    ///
    /// # Errors
    ///
    /// See [`SnapshotInterpolant::new`].
    pub fn position(time_delay: f64, num_frames: usize) -> InterpolationResult<Self> {
        Self::new(time_delay, num_frames, BlendMode::Linear)
    }
}

impl SnapshotInterpolant<Quaternion> {
    /// Slerp-blended rotation interpolant.
    ///
    /// # Errors
    ///
    /// See [`SnapshotInterpolant::new`].
    pub fn rotation(time_delay: f64, num_frames: usize) -> InterpolationResult<Self> {
        Self::new(time_delay, num_frames, BlendMode::Spherical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ReadOutcome;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_binary_steps_at_interval_start() {
        let mut flag = BinaryInterpolant::binary(0.0, 3).unwrap();
        flag.snapshot(10.0, false).unwrap();
        flag.snapshot(10.0, true).unwrap();
        flag.snapshot(10.0, false).unwrap();

        // [10, 20) holds the false written at 10.
        flag.update(15.0);
        assert!(!flag.get());

        // [20, 30) holds the true written at 20.
        flag.update(10.0);
        assert!(flag.get());
        flag.update(4.9);
        assert!(flag.get());

        // Data ran dry: freeze at the newest write, which is false.
        assert!(matches!(flag.update(100.0), ReadOutcome::Frozen(_)));
        assert!(!flag.get());
    }

    #[test]
    fn test_position_constructor_is_linear() {
        let interp = PositionInterpolant::position(100.0, 3).unwrap();
        assert_eq!(interp.mode(), BlendMode::Linear);
        assert_eq!(interp.num_frames(), 3);
    }

    #[test]
    fn test_rotation_slerps_between_snapshots() {
        let mut rotation = QuaternionInterpolant::rotation(0.0, 3).unwrap();
        let quarter = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);

        rotation.snapshot(10.0, Quaternion::IDENTITY.to_array()).unwrap();
        rotation.snapshot(100.0, quarter.to_array()).unwrap();

        // Halfway through the (10, 110] interval.
        assert_eq!(rotation.update(60.0), ReadOutcome::Interpolated);
        let q = rotation.get();
        assert!((q.length() - 1.0).abs() < 1e-5);
        assert!((Quaternion::IDENTITY.angle_to(q) - FRAC_PI_2 * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_rejects_degenerate_sample() {
        let mut rotation = QuaternionInterpolant::rotation(0.0, 3).unwrap();
        assert!(rotation.snapshot(10.0, [0.0; 4]).is_err());
        assert!(rotation.snapshot(10.0, [f32::NAN, 0.0, 0.0, 1.0]).is_err());
        assert_eq!(rotation.stats().rejected_writes, 2);
        assert_eq!(rotation.get(), Quaternion::IDENTITY);
    }

    #[test]
    fn test_binary_rejects_blending_modes() {
        assert!(BinaryInterpolant::new(0.0, 3, BlendMode::Spherical).is_err());
    }
}
