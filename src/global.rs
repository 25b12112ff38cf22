//! Process-wide generator with an explicit lifecycle.
//!
//! This module keeps one [`Fortuna`] behind a mutex for callers that want a
//! single shared generator instead of passing a handle around:
//!
//! ```rust
//! use fortuna::{global, Options};
//!
//! global::init(Options::new()).unwrap();
//! let value = global::random();
//! assert!((0.0..1.0).contains(&value));
//! # global::reset();
//! ```
//!
//! [`init`] is idempotent: while a generator exists, later calls keep the
//! first configuration. Call [`reset`] to apply a new one. Every generation
//! function panics if no generator has been initialized.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{BlockSource, EntropySample, Error, Fortuna, NumericExtract, Options};

static GENERATOR: Mutex<Option<Fortuna>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Fortuna>> {
    GENERATOR.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_generator<R>(f: impl FnOnce(&mut Fortuna) -> R) -> R {
    match slot().as_mut() {
        Some(generator) => f(generator),
        None => panic!("fortuna: generator used before global::init"),
    }
}

/// Initialize the shared generator if it does not exist yet.
///
/// # Errors
///
/// Returns [`Error::Entropy`] if the entropy source's first sample is
/// invalid. The generator then stays uninitialized.
pub fn init(options: Options) -> Result<(), Error> {
    let mut slot = slot();
    if slot.is_some() {
        log::debug!("global generator already initialized; keeping existing configuration");
        return Ok(());
    }
    *slot = Some(Fortuna::init(options)?);
    Ok(())
}

/// Whether the shared generator exists.
pub fn is_initialized() -> bool {
    slot().is_some()
}

/// Drop the shared generator, stopping its timer.
pub fn reset() {
    if slot().take().is_some() {
        log::debug!("global generator reset");
    }
}

/// One raw block from the shared generator.
pub fn generate() -> u32 {
    with_generator(|g| g.generate())
}

/// See [`NumericExtract::int32`].
pub fn int32() -> i32 {
    with_generator(|g| g.int32())
}

/// See [`NumericExtract::uint32`].
pub fn uint32() -> u32 {
    with_generator(|g| g.uint32())
}

/// See [`NumericExtract::int53`].
pub fn int53() -> i64 {
    with_generator(|g| g.int53())
}

/// See [`NumericExtract::int53_full`].
pub fn int53_full() -> i64 {
    with_generator(|g| g.int53_full())
}

/// See [`NumericExtract::uint53`].
pub fn uint53() -> u64 {
    with_generator(|g| g.uint53())
}

/// See [`NumericExtract::uint53_full`].
pub fn uint53_full() -> u64 {
    with_generator(|g| g.uint53_full())
}

/// See [`NumericExtract::random`].
pub fn random() -> f64 {
    with_generator(|g| g.random())
}

/// Disable timer-driven accumulation. Does nothing if uninitialized.
pub fn stop_timer() {
    if let Some(generator) = slot().as_mut() {
        generator.stop_timer();
    }
}

/// Current entropy sample, if initialized.
pub fn entropy() -> Option<EntropySample> {
    slot().as_ref().map(Fortuna::entropy)
}

/// Current counter, if initialized.
pub fn counter() -> Option<u64> {
    slot().as_ref().map(Fortuna::counter)
}
