//! Where fresh input comes from.
//!
//! The network layer owns the true state of a remote entity. Interpolants
//! pull from it through [`SampleSource`] once per write (snapshot interpolants)
//! or once per tick (action interpolants). Any `FnMut() -> R` closure is a
//! source, so most callers never name the trait.

/// A provider of the latest true value of one tracked property.
pub trait SampleSource<R> {
    /// Returns the current value. Called exactly once per write or tick.
    fn sample(&mut self) -> R;
}

impl<R, F> SampleSource<R> for F
where
    F: FnMut() -> R,
{
    #[inline]
    fn sample(&mut self) -> R {
        self()
    }
}
