//! Core traits for entropy sources and block generators.
//!
//! This module defines the two seams the rest of the crate is built on:
//!
//! - [`EntropySource`]: Produces fixed-size entropy samples for the accumulator
//! - [`BlockSource`]: Produces raw 32-bit blocks for the numeric extractor
//!
//! # Implementing Custom Sources
//!
//! Any closure returning an [`EntropySample`] is already an entropy source.
//! For sources that can fail, implement the trait directly:
//!
//! ```rust
//! use fortuna::{EntropySample, EntropySource, Error, ENTROPY_SIZE};
//!
//! struct Pattern;
//!
//! impl EntropySource for Pattern {
//!     fn sample(&self) -> Result<EntropySample, Error> {
//!         Ok(EntropySample::Bytes(vec![0x5a; ENTROPY_SIZE]))
//!     }
//! }
//! ```

use crate::{EntropySample, Error};

/// Source of entropy samples for the accumulator.
///
/// Sources are shared with the accumulation timer thread, hence the
/// `Send + Sync` bound.
///
/// `sample` should return promptly. Stopping the timer (and dropping the
/// generator) joins the timer thread, so a source that blocks inside
/// `sample` blocks [`Fortuna::stop_timer`](crate::Fortuna::stop_timer) and
/// `Drop` until it returns.
///
/// # Implementors
///
/// - [`TimeEntropy`](crate::TimeEntropy): Hash of the wall-clock time (default)
/// - [`OsEntropy`](crate::OsEntropy): Operating system randomness
/// - [`FixedEntropy`](crate::FixedEntropy): Constant sample for reproducible runs
/// - Any `Fn() -> EntropySample + Send + Sync`
///
/// # Example
///
/// ```rust
/// use fortuna::{EntropySource, TimeEntropy, ENTROPY_SIZE};
///
/// let sample = TimeEntropy.sample().unwrap();
/// assert_eq!(sample.len(), ENTROPY_SIZE);
/// assert!(sample.validate().is_ok());
/// ```
pub trait EntropySource: Send + Sync {
    /// Collect one entropy sample.
    ///
    /// The shape of the sample is checked by the caller, not here: the
    /// generator validates one sample at initialization (and every sample
    /// when [`Config::revalidate_entropy`](crate::Config::revalidate_entropy)
    /// is set).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Entropy`] if the source could not produce a sample.
    fn sample(&self) -> Result<EntropySample, Error>;
}

impl<F> EntropySource for F
where
    F: Fn() -> EntropySample + Send + Sync,
{
    fn sample(&self) -> Result<EntropySample, Error> {
        Ok(self())
    }
}

/// Producer of raw 32-bit pseudo-random blocks.
///
/// The numeric extractor ([`NumericExtract`](crate::NumericExtract)) is
/// implemented for every `BlockSource`, so implementing this one method is
/// enough to get the full integer and float API.
///
/// # Example
///
/// ```rust
/// use fortuna::{BlockSource, NumericExtract};
///
/// struct Constant(u32);
///
/// impl BlockSource for Constant {
///     fn generate(&mut self) -> u32 {
///         self.0
///     }
/// }
///
/// let mut source = Constant(0xffff_ffff);
/// assert_eq!(source.int32(), -1);
/// assert_eq!(source.uint32(), u32::MAX);
/// ```
pub trait BlockSource {
    /// Produce the next raw block. Never side-effect-free for real generators.
    fn generate(&mut self) -> u32;
}

impl<B: BlockSource + ?Sized> BlockSource for &mut B {
    fn generate(&mut self) -> u32 {
        (**self).generate()
    }
}
