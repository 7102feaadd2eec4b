//! # Snapshot Interpolation
//!
//! Network snapshots arrive at irregular, sometimes bursty intervals. Rendering
//! a fixed `time_delay` behind the newest known sample means that most of the
//! time two real snapshots bracket the read time, so the renderer interpolates
//! instead of extrapolating.
//!
//! ```text
//! Writes (end_time):   0      50        150              300
//!                      │      │          │                │
//! Ring (3 slots):             [50]      [150]            [300]
//!                                          ╲______________╱
//! read_time = 300                               ▲
//! delayed target = read_time - time_delay = 200 │
//!                      interpolate 150 → 300 at f = 1/3
//! ```
//!
//! ## Time model
//!
//! - Every write appends `time_diff` to the previous slot's `end_time`, so the
//!   write history forms one monotonic timeline starting at zero.
//! - Every read advances `read_time` by the frame's `time_diff`.
//! - If the delayed target leaves the buffered window the cursor is pinned to
//!   the newest snapshot (freeze-at-latest). Nothing is ever extrapolated.

use tracing::{debug, trace, warn};

use crate::blend::{BlendMode, Snapshottable};
use crate::config::InterpolationConfig;
use crate::error::{InterpolationError, InterpolationResult};
use crate::source::SampleSource;

/// A timestamped recording: the true value became `start_value` as of `end_time`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Snapshot<T> {
    /// Value recorded by the write.
    pub start_value: T,
    /// Accumulated write time at which the value was recorded.
    pub end_time: f64,
}

/// Which edge of the buffered window the delayed read time fell off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowFault {
    /// Reading ahead of the newest snapshot: data ran dry.
    Underrun,
    /// Reading behind the oldest retained snapshot: it was already overwritten.
    Overrun,
}

/// What a call to [`SnapshotInterpolant::update`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum ReadOutcome {
    /// No snapshot has been written yet. The value is untouched.
    Empty,
    /// The delayed read time was bracketed and the value re-blended.
    Interpolated,
    /// The read cursor was pinned to the newest snapshot before seeking.
    Frozen(WindowFault),
    /// The seek failed. The previous value is still being served.
    Held(InterpolationError),
}

/// Diagnostic counters for one interpolant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterpolantStats {
    /// Accepted writes.
    pub writes: u64,
    /// Writes rejected by the value type's merge.
    pub rejected_writes: u64,
    /// Reads that ran ahead of the newest snapshot.
    pub underruns: u64,
    /// Reads that fell behind the oldest retained snapshot.
    pub overruns: u64,
    /// Reads with no bracketing pair (value held).
    pub seek_misses: u64,
}

impl std::ops::Add for InterpolantStats {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            writes: self.writes + rhs.writes,
            rejected_writes: self.rejected_writes + rhs.rejected_writes,
            underruns: self.underruns + rhs.underruns,
            overruns: self.overruns + rhs.overruns,
            seek_misses: self.seek_misses + rhs.seek_misses,
        }
    }
}

/// Time-delayed ring buffer of snapshots with an interpolated read value.
///
/// The ring is allocated once at construction. Writes and reads after that
/// are allocation-free and O(`num_frames`).
#[derive(Clone, Debug)]
pub struct SnapshotInterpolant<T: Snapshottable> {
    /// Ring buffer of snapshots.
    snapshots: Box<[Snapshot<T>]>,
    /// Slot the next write goes to.
    write_index: usize,
    /// Undelayed read cursor.
    read_time: f64,
    /// Lag between the newest snapshot and the exposed value.
    time_delay: f64,
    /// Blend used when seeking.
    mode: BlendMode,
    /// Last successfully blended (or held) value.
    value: T,
    /// Diagnostic counters.
    stats: InterpolantStats,
}

impl<T: Snapshottable> SnapshotInterpolant<T> {
    /// Creates an interpolant with `num_frames` ring slots.
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::InsufficientFrames`] if `num_frames < 2`
    /// - [`InterpolationError::InvalidTimeDelay`] if `time_delay` is negative or not finite
    /// - [`InterpolationError::UnsupportedBlend`] if `T` cannot blend with `mode`
    pub fn new(time_delay: f64, num_frames: usize, mode: BlendMode) -> InterpolationResult<Self> {
        InterpolationConfig {
            time_delay_ms: time_delay,
            num_frames,
        }
        .validate()?;

        if !T::supports(mode) {
            return Err(InterpolationError::UnsupportedBlend {
                mode,
                value_type: T::NAME,
            });
        }

        Ok(Self {
            snapshots: vec![Snapshot::default(); num_frames].into_boxed_slice(),
            write_index: 0,
            read_time: 0.0,
            time_delay,
            mode,
            value: T::default(),
            stats: InterpolantStats::default(),
        })
    }

    /// Creates an interpolant from a config section.
    ///
    /// # Errors
    ///
    /// See [`SnapshotInterpolant::new`].
    pub fn from_config(config: &InterpolationConfig, mode: BlendMode) -> InterpolationResult<Self> {
        Self::new(config.time_delay_ms, config.num_frames, mode)
    }

    /// Records `sample` as the true value `time_diff` after the previous write.
    ///
    /// A rejected sample commits nothing: the ring, the timeline and the
    /// current value are left exactly as they were.
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::NonFiniteTime`] if `time_diff` is NaN or infinite
    /// - whatever `T::merge` rejects (e.g. [`InterpolationError::NumericCorruption`])
    pub fn snapshot(&mut self, time_diff: f64, sample: T::Sample) -> InterpolationResult<()> {
        if !time_diff.is_finite() {
            self.stats.rejected_writes += 1;
            warn!(time_diff, value_type = T::NAME, "rejected snapshot with non-finite time step");
            return Err(InterpolationError::NonFiniteTime { time_diff });
        }

        let n = self.snapshots.len();
        let start_time = self.snapshots[(self.write_index + n - 1) % n].end_time;
        let slot = &mut self.snapshots[self.write_index];

        let mut staged = slot.start_value;
        if let Err(err) = T::merge(&mut staged, sample) {
            self.stats.rejected_writes += 1;
            warn!(error = %err, value_type = T::NAME, "rejected snapshot sample");
            return Err(err);
        }

        slot.start_value = staged;
        slot.end_time = start_time + time_diff;
        self.write_index = (self.write_index + 1) % n;
        self.stats.writes += 1;
        Ok(())
    }

    /// Samples `source` once and records the result.
    ///
    /// # Errors
    ///
    /// See [`SnapshotInterpolant::snapshot`].
    pub fn snapshot_from<S>(&mut self, time_diff: f64, source: &mut S) -> InterpolationResult<()>
    where
        S: SampleSource<T::Sample> + ?Sized,
    {
        let sample = source.sample();
        self.snapshot(time_diff, sample)
    }

    /// Advances the read cursor by `time_diff` and re-blends the value.
    ///
    /// Never fails: every anomaly is recovered locally and reported through the
    /// returned [`ReadOutcome`] and [`InterpolantStats`].
    pub fn update(&mut self, time_diff: f64) -> ReadOutcome {
        if time_diff.is_finite() {
            self.read_time += time_diff;
        } else {
            debug!(time_diff, value_type = T::NAME, "ignoring non-finite read time step");
        }

        let (min_end_time, max_end_time) = self.end_time_range();
        if max_end_time <= 0.0 {
            return ReadOutcome::Empty;
        }

        let target = self.read_time - self.time_delay;
        let fault = if target > max_end_time {
            Some(WindowFault::Underrun)
        } else if target < min_end_time {
            Some(WindowFault::Overrun)
        } else {
            None
        };

        if let Some(fault) = fault {
            match fault {
                WindowFault::Underrun => self.stats.underruns += 1,
                WindowFault::Overrun => self.stats.overruns += 1,
            }
            debug!(
                ?fault,
                target,
                min_end_time,
                max_end_time,
                value_type = T::NAME,
                "read time outside buffered window, freezing at latest"
            );
            self.read_time = max_end_time + self.time_delay;
        }

        // Seek the newest end time itself when frozen: (max + delay) - delay
        // need not round-trip exactly.
        let target = if fault.is_some() { max_end_time } else { target };

        match self.seek_to(target) {
            Ok(()) => fault.map_or(ReadOutcome::Interpolated, ReadOutcome::Frozen),
            Err(err) => {
                if matches!(err, InterpolationError::SeekMiss { .. }) {
                    self.stats.seek_misses += 1;
                }
                warn!(
                    error = %err,
                    snapshots = ?self.snapshots,
                    value_type = T::NAME,
                    "could not seek, holding previous value"
                );
                ReadOutcome::Held(err)
            }
        }
    }

    /// Sets the value to the blend of the pair bracketing time `t`.
    ///
    /// Pairs are scanned newest first, so a time on a slot boundary resolves
    /// to the later interval. The newest snapshot brackets its own end time,
    /// which is where a frozen read lands. On failure the value is unchanged.
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::SeekMiss`] if no adjacent pair brackets `t`
    /// - whatever `T::blend` rejects
    #[allow(clippy::float_cmp)]
    pub fn seek_to(&mut self, t: f64) -> InterpolationResult<()> {
        let n = self.snapshots.len();

        let newest = &self.snapshots[(self.write_index + n - 1) % n];
        if t == newest.end_time {
            self.value = T::blend(newest.start_value, newest.start_value, 0.0, self.mode)?;
            return Ok(());
        }

        // The oldest slot has no predecessor, so there are n - 1 candidate pairs.
        for back in 1..n {
            let index = (self.write_index + n - back) % n;
            let snapshot = &self.snapshots[index];
            let prev = &self.snapshots[(index + n - 1) % n];

            if t <= snapshot.end_time && t >= prev.end_time {
                let start_time = prev.end_time;
                let duration = snapshot.end_time - start_time;
                let f = if duration > 0.0 && duration.is_finite() {
                    (t - start_time) / duration
                } else {
                    0.0
                };

                trace!(t, start_time, end_time = snapshot.end_time, f, "seek");
                self.value = T::blend(prev.start_value, snapshot.start_value, f, self.mode)?;
                return Ok(());
            }
        }

        Err(InterpolationError::SeekMiss { target_time: t })
    }

    fn end_time_range(&self) -> (f64, f64) {
        self.snapshots.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), snapshot| (min.min(snapshot.end_time), max.max(snapshot.end_time)),
        )
    }

    /// Current smoothed value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> T {
        self.value
    }

    /// Undelayed read cursor.
    #[must_use]
    pub const fn read_time(&self) -> f64 {
        self.read_time
    }

    /// Lag between the newest snapshot and the exposed value.
    #[must_use]
    pub const fn time_delay(&self) -> f64 {
        self.time_delay
    }

    /// Changes the read delay. Takes effect on the next update.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationError::InvalidTimeDelay`] if `time_delay` is
    /// negative or not finite.
    pub fn set_time_delay(&mut self, time_delay: f64) -> InterpolationResult<()> {
        if !time_delay.is_finite() || time_delay < 0.0 {
            return Err(InterpolationError::InvalidTimeDelay(time_delay));
        }
        self.time_delay = time_delay;
        Ok(())
    }

    /// Ring depth.
    #[must_use]
    pub fn num_frames(&self) -> usize {
        self.snapshots.len()
    }

    /// Blend used when seeking.
    #[must_use]
    pub const fn mode(&self) -> BlendMode {
        self.mode
    }

    /// Buffered snapshots, newest write first.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot<T>> + '_ {
        let n = self.snapshots.len();
        (1..=n).map(move |back| &self.snapshots[(self.write_index + n - back) % n])
    }

    /// The most recent write, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Snapshot<T>> {
        if self.stats.writes == 0 {
            return None;
        }
        self.snapshots().next()
    }

    /// Diagnostic counters.
    #[must_use]
    pub const fn stats(&self) -> &InterpolantStats {
        &self.stats
    }

    /// Forgets every snapshot and returns the value to `T::default()`.
    pub fn reset(&mut self) {
        self.snapshots.fill(Snapshot::default());
        self.write_index = 0;
        self.read_time = 0.0;
        self.value = T::default();
        self.stats = InterpolantStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wraith_shared::{Quaternion, Vec3};

    fn position(time_delay: f64, num_frames: usize) -> SnapshotInterpolant<Vec3> {
        SnapshotInterpolant::new(time_delay, num_frames, BlendMode::Linear).unwrap()
    }

    #[test]
    fn test_construction_contract() {
        assert_eq!(
            SnapshotInterpolant::<Vec3>::new(100.0, 1, BlendMode::Linear).unwrap_err(),
            InterpolationError::InsufficientFrames(1)
        );
        assert!(matches!(
            SnapshotInterpolant::<Vec3>::new(f64::NAN, 3, BlendMode::Linear),
            Err(InterpolationError::InvalidTimeDelay(_))
        ));
        assert_eq!(
            SnapshotInterpolant::<bool>::new(100.0, 3, BlendMode::Linear).unwrap_err(),
            InterpolationError::UnsupportedBlend {
                mode: BlendMode::Linear,
                value_type: "bool",
            }
        );
    }

    #[test]
    fn test_from_config() {
        let config = InterpolationConfig {
            time_delay_ms: 250.0,
            num_frames: 8,
        };
        let interp =
            SnapshotInterpolant::<Quaternion>::from_config(&config, BlendMode::Spherical).unwrap();
        assert_eq!(interp.time_delay(), 250.0);
        assert_eq!(interp.num_frames(), 8);
        assert_eq!(interp.mode(), BlendMode::Spherical);

        let shallow = InterpolationConfig {
            num_frames: 1,
            ..config
        };
        assert_eq!(
            SnapshotInterpolant::<Vec3>::from_config(&shallow, BlendMode::Linear).unwrap_err(),
            InterpolationError::InsufficientFrames(1)
        );
    }

    #[test]
    fn test_end_times_strictly_increase() {
        let mut interp = position(100.0, 4);
        let steps = [16.0, 33.0, 8.5, 50.0, 1.0, 120.0, 16.0];

        let mut expected = 0.0;
        for (i, step) in steps.iter().enumerate() {
            interp.snapshot(*step, [i as f32, 0.0, 0.0]).unwrap();
            expected += step;
            assert_eq!(interp.latest().unwrap().end_time, expected);
        }

        // Newest first, so end times strictly decrease along the iterator.
        let times: Vec<f64> = interp.snapshots().map(|s| s.end_time).collect();
        assert!(times.windows(2).all(|w| w[0] > w[1]), "{times:?}");
    }

    #[test]
    fn test_update_before_snapshot_keeps_default() {
        let mut interp = position(100.0, 3);
        for _ in 0..10 {
            assert_eq!(interp.update(16.0), ReadOutcome::Empty);
        }
        assert_eq!(interp.get(), Vec3::ZERO);
        assert!(interp.latest().is_none());
    }

    #[test]
    fn test_get_is_idempotent() {
        let mut interp = position(0.0, 3);
        interp.snapshot(10.0, [1.0, 2.0, 3.0]).unwrap();
        interp.update(5.0);

        let first = interp.get();
        assert_eq!(interp.get(), first);
        assert_eq!(interp.get(), first);
    }

    #[test]
    fn test_bracketing_pair_interpolates() {
        let mut interp = position(100.0, 3);
        interp.snapshot(0.0, [0.0, 0.0, 0.0]).unwrap();
        interp.snapshot(50.0, [10.0, 0.0, 0.0]).unwrap();
        interp.snapshot(100.0, [20.0, 0.0, 0.0]).unwrap();

        // read 225 - delay 100 = 125, between 50 and 150 at f = 0.75.
        assert_eq!(interp.update(225.0), ReadOutcome::Interpolated);
        assert!((interp.get().x - 17.5).abs() < 1e-4);
    }

    #[test]
    fn test_underrun_freezes_at_latest() {
        let mut interp = position(100.0, 3);
        interp.snapshot(50.0, [1.0, 0.0, 0.0]).unwrap();
        interp.snapshot(50.0, [2.0, 0.0, 0.0]).unwrap();

        // Far ahead of the newest data.
        assert_eq!(
            interp.update(10_000.0),
            ReadOutcome::Frozen(WindowFault::Underrun)
        );
        assert_eq!(interp.read_time(), 200.0);
        assert_eq!(interp.get(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(interp.stats().underruns, 1);
    }

    #[test]
    fn test_overrun_freezes_at_latest() {
        let mut interp = position(100.0, 3);
        for i in 1..=6 {
            interp.snapshot(50.0, [i as f32, 0.0, 0.0]).unwrap();
        }

        // read 150 - delay 100 = 50, but the oldest retained snapshot is at 200.
        assert_eq!(
            interp.update(150.0),
            ReadOutcome::Frozen(WindowFault::Overrun)
        );
        assert_eq!(interp.read_time(), 400.0);
        assert_eq!(interp.get(), Vec3::new(6.0, 0.0, 0.0));
        assert_eq!(interp.stats().overruns, 1);
    }

    #[test]
    fn test_nan_write_rejected() {
        let mut interp = position(0.0, 3);
        interp.snapshot(10.0, [1.0, 1.0, 1.0]).unwrap();
        interp.update(10.0);
        let before = interp.get();
        let latest_before = *interp.latest().unwrap();

        let err = interp.snapshot(10.0, [f32::NAN, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, InterpolationError::NumericCorruption { .. }));
        assert_eq!(interp.get(), before);
        assert_eq!(*interp.latest().unwrap(), latest_before);
        assert_eq!(interp.stats().rejected_writes, 1);
        assert_eq!(interp.stats().writes, 1);

        interp.update(10.0);
        assert_eq!(interp.get(), before);
    }

    #[test]
    fn test_non_finite_time_step_rejected() {
        let mut interp = position(0.0, 3);
        assert_eq!(
            interp.snapshot(f64::INFINITY, [1.0, 0.0, 0.0]),
            Err(InterpolationError::NonFiniteTime {
                time_diff: f64::INFINITY
            })
        );
        assert!(interp.latest().is_none());
    }

    #[test]
    fn test_seek_miss_holds_value() {
        let mut interp = position(0.0, 3);
        interp.snapshot(10.0, [1.0, 0.0, 0.0]).unwrap();
        interp.snapshot(10.0, [2.0, 0.0, 0.0]).unwrap();
        interp.update(20.0);
        let held = interp.get();

        // Out-of-order write: the newest slot lands before its predecessor.
        interp.snapshot(-15.0, [3.0, 0.0, 0.0]).unwrap();
        // End times in slot order are now [10, 20, 5]; only 10..=20 is bracketed.
        assert_eq!(
            interp.seek_to(7.0),
            Err(InterpolationError::SeekMiss { target_time: 7.0 })
        );
        assert_eq!(interp.get(), held);
    }

    #[test]
    fn test_update_reports_seek_miss() {
        let mut interp = position(0.0, 3);
        interp.snapshot(10.0, [1.0, 0.0, 0.0]).unwrap();
        interp.snapshot(10.0, [2.0, 0.0, 0.0]).unwrap();
        interp.snapshot(-15.0, [3.0, 0.0, 0.0]).unwrap();

        // Window is [5, 20]; 7 lies inside it but no adjacent pair covers it.
        let outcome = interp.update(7.0);
        assert_eq!(
            outcome,
            ReadOutcome::Held(InterpolationError::SeekMiss { target_time: 7.0 })
        );
        assert_eq!(interp.get(), Vec3::ZERO);
        assert_eq!(interp.stats().seek_misses, 1);
    }

    #[test]
    fn test_boundary_resolves_to_later_interval() {
        let mut interp = position(0.0, 3);
        interp.snapshot(10.0, [1.0, 0.0, 0.0]).unwrap();
        interp.snapshot(10.0, [2.0, 0.0, 0.0]).unwrap();
        interp.snapshot(10.0, [3.0, 0.0, 0.0]).unwrap();

        interp.seek_to(20.0).unwrap();
        assert_eq!(interp.get(), Vec3::new(2.0, 0.0, 0.0));

        interp.seek_to(30.0).unwrap();
        assert_eq!(interp.get(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_snapshot_from_samples_once() {
        let mut calls = 0;
        let mut source = || {
            calls += 1;
            [calls as f32, 0.0, 0.0]
        };

        let mut interp = position(0.0, 2);
        interp.snapshot_from(10.0, &mut source).unwrap();
        interp.snapshot_from(10.0, &mut source).unwrap();
        assert_eq!(interp.stats().writes, 2);
        assert_eq!(interp.latest().unwrap().start_value, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_reset() {
        let mut interp = position(0.0, 3);
        interp.snapshot(10.0, [1.0, 0.0, 0.0]).unwrap();
        interp.update(10.0);
        interp.reset();

        assert_eq!(interp.get(), Vec3::ZERO);
        assert_eq!(interp.read_time(), 0.0);
        assert_eq!(interp.update(10.0), ReadOutcome::Empty);
        assert_eq!(*interp.stats(), InterpolantStats::default());
    }

    #[test]
    fn test_set_time_delay() {
        let mut interp = position(100.0, 3);
        interp.set_time_delay(50.0).unwrap();
        assert_eq!(interp.time_delay(), 50.0);
        assert!(interp.set_time_delay(-1.0).is_err());
        assert_eq!(interp.time_delay(), 50.0);
    }
}
