//! # Remote Avatar State
//!
//! Everything the renderer needs to draw one remote player, smoothed.
//!
//! The network layer calls [`RemoteAvatar::snapshot`] whenever a state update
//! for the player arrives. The render loop calls [`RemoteAvatar::update`] once
//! per frame and reads the getters.
//!
//! ```text
//! network ──snapshot──▶ position / rotation / flags (ring buffers)
//!                                   │ update (delayed read)
//!                                   ▼
//!                        smoothed crouching/jumping/flying
//!                                   │ drive
//!                                   ▼
//!                        crouch (Bi) / jump (Uni) / fly (Infinite)
//! ```

use tracing::{debug, warn};
use wraith_shared::{Quaternion, Vec3};

use crate::blend::Snapshottable;
use crate::config::AvatarConfig;
use crate::error::{InterpolationError, InterpolationResult};
use crate::scalar::ActionInterpolant;
use crate::snapshot::{InterpolantStats, ReadOutcome, SnapshotInterpolant};
use crate::typed::{BinaryInterpolant, PositionInterpolant, QuaternionInterpolant};

/// One network update for a remote player, as deserialized.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AvatarSample {
    /// World position `[x, y, z]`.
    pub position: [f32; 3],
    /// Orientation `[x, y, z, w]`. Need not be normalised.
    pub rotation: [f32; 4],
    /// Crouch key held.
    pub crouching: bool,
    /// Jump key held.
    pub jumping: bool,
    /// Flight toggled on.
    pub flying: bool,
}

/// Per-property outcome of [`RemoteAvatar::update`].
#[derive(Clone, Debug, PartialEq)]
pub struct AvatarReadReport {
    /// Position interpolant.
    pub position: ReadOutcome,
    /// Rotation interpolant.
    pub rotation: ReadOutcome,
    /// Crouching flag.
    pub crouching: ReadOutcome,
    /// Jumping flag.
    pub jumping: ReadOutcome,
    /// Flying flag.
    pub flying: ReadOutcome,
}

impl AvatarReadReport {
    /// True unless some property failed to seek and is holding a stale value.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        [
            &self.position,
            &self.rotation,
            &self.crouching,
            &self.jumping,
            &self.flying,
        ]
        .into_iter()
        .all(|outcome| !matches!(outcome, ReadOutcome::Held(_)))
    }
}

/// Smoothed render state of one remote player.
#[derive(Clone, Debug)]
pub struct RemoteAvatar {
    position: PositionInterpolant,
    rotation: QuaternionInterpolant,
    crouching: BinaryInterpolant,
    jumping: BinaryInterpolant,
    flying: BinaryInterpolant,
    crouch: ActionInterpolant,
    jump: ActionInterpolant,
    fly: ActionInterpolant,
    rejected_samples: u64,
}

impl RemoteAvatar {
    /// Builds every interpolant from `config`.
    ///
    /// # Errors
    ///
    /// Returns the first construction contract violation in `config`.
    pub fn new(config: &AvatarConfig) -> InterpolationResult<Self> {
        let position = &config.position;
        let rotation = &config.rotation;
        let flags = &config.flags;

        Ok(Self {
            position: SnapshotInterpolant::position(position.time_delay_ms, position.num_frames)?,
            rotation: SnapshotInterpolant::rotation(rotation.time_delay_ms, rotation.num_frames)?,
            crouching: SnapshotInterpolant::binary(flags.time_delay_ms, flags.num_frames)?,
            jumping: SnapshotInterpolant::binary(flags.time_delay_ms, flags.num_frames)?,
            flying: SnapshotInterpolant::binary(flags.time_delay_ms, flags.num_frames)?,
            crouch: ActionInterpolant::bidirectional(0.0, config.actions.crouch_time_ms)?,
            jump: ActionInterpolant::unidirectional(0.0, config.actions.jump_time_ms)?,
            fly: ActionInterpolant::infinite(0.0)?,
            rejected_samples: 0,
        })
    }

    /// Records a network update `time_diff` after the previous one.
    ///
    /// The sample is validated as a whole first, so a corrupt position or
    /// rotation leaves every property untouched.
    ///
    /// # Errors
    ///
    /// [`InterpolationError::NonFiniteTime`], [`InterpolationError::NumericCorruption`]
    /// or [`InterpolationError::DegenerateQuaternion`].
    pub fn snapshot(&mut self, time_diff: f64, sample: &AvatarSample) -> InterpolationResult<()> {
        if let Err(err) = Self::validate(time_diff, sample) {
            self.rejected_samples += 1;
            warn!(error = %err, "rejected avatar sample");
            return Err(err);
        }

        self.position.snapshot(time_diff, sample.position)?;
        self.rotation.snapshot(time_diff, sample.rotation)?;
        self.crouching.snapshot(time_diff, sample.crouching)?;
        self.jumping.snapshot(time_diff, sample.jumping)?;
        self.flying.snapshot(time_diff, sample.flying)
    }

    fn validate(time_diff: f64, sample: &AvatarSample) -> InterpolationResult<()> {
        if !time_diff.is_finite() {
            return Err(InterpolationError::NonFiniteTime { time_diff });
        }
        Vec3::merge(&mut Vec3::default(), sample.position)?;
        Quaternion::merge(&mut Quaternion::default(), sample.rotation)
    }

    /// Advances every interpolant by one render frame.
    ///
    /// A NaN or infinite `time_diff` leaves every property where it was.
    pub fn update(&mut self, time_diff: f64) -> AvatarReadReport {
        if !time_diff.is_finite() {
            debug!(time_diff, "ignoring non-finite avatar frame step");
        }

        let report = AvatarReadReport {
            position: self.position.update(time_diff),
            rotation: self.rotation.update(time_diff),
            crouching: self.crouching.update(time_diff),
            jumping: self.jumping.update(time_diff),
            flying: self.flying.update(time_diff),
        };

        self.crouch.update(time_diff, self.crouching.get());
        self.jump.update(time_diff, self.jumping.get());
        self.fly.update(time_diff, self.flying.get());

        report
    }

    /// Smoothed world position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position.get()
    }

    /// Smoothed orientation.
    #[must_use]
    pub fn rotation(&self) -> Quaternion {
        self.rotation.get()
    }

    /// Smoothed crouch flag.
    #[must_use]
    pub fn is_crouching(&self) -> bool {
        self.crouching.get()
    }

    /// Crouch blend weight in `[0, 1]`.
    #[must_use]
    pub fn crouch_factor(&self) -> f64 {
        self.crouch.get_normalized()
    }

    /// How long the jump has been charging, capped at the configured maximum.
    #[must_use]
    pub const fn jump_time(&self) -> f64 {
        self.jump.get()
    }

    /// How long the avatar has been flying.
    #[must_use]
    pub const fn fly_time(&self) -> f64 {
        self.fly.get()
    }

    /// Samples rejected before reaching any ring buffer.
    #[must_use]
    pub const fn rejected_samples(&self) -> u64 {
        self.rejected_samples
    }

    /// Counters summed over every snapshot interpolant.
    #[must_use]
    pub fn stats(&self) -> InterpolantStats {
        *self.position.stats()
            + *self.rotation.stats()
            + *self.crouching.stats()
            + *self.jumping.stats()
            + *self.flying.stats()
    }
}
