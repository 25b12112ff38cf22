//! # fortuna
//!
//! A Fortuna-style pseudo-random number generator with continuous reseeding.
//!
//! An entropy accumulator feeds a SHA-512 key derivation step, which keys an
//! AES-256 block generator. After every output block the generator samples
//! fresh entropy and derives a new key, so a compromised key exposes at most
//! one block.
//!
//! ## Quick Start
//!
//! ```rust
//! use fortuna::{BlockSource, Fortuna, NumericExtract, Options};
//!
//! let mut rng = Fortuna::init(Options::new()).unwrap();
//!
//! let block = rng.generate();
//! let signed = rng.int32();
//! let wide = rng.uint53_full();
//! let unit = rng.random();
//!
//! assert!(wide <= 1 << 53);
//! assert!((0.0..1.0).contains(&unit));
//! # let _ = (block, signed);
//! ```
//!
//! ## Reproducible Runs
//!
//! Substituting a fixed entropy source makes the whole output sequence a
//! pure function of that sample:
//!
//! ```rust
//! use fortuna::{EntropySample, FixedEntropy, Fortuna, NumericExtract, Options};
//!
//! let sample = EntropySample::Text("a".repeat(128));
//! let mut a = Fortuna::init(Options::new().with_entropy_source(FixedEntropy::new(sample.clone()))).unwrap();
//! let mut b = Fortuna::init(Options::new().with_entropy_source(FixedEntropy::new(sample))).unwrap();
//!
//! assert_eq!(a.uint32(), b.uint32());
//! ```
//!
//! ## Concurrency
//!
//! A [`Fortuna`] handle is a single-consumer generator: `generate` takes
//! `&mut self`. Callers sharing one across threads must serialize access
//! themselves (the [`global`] facade does so with a mutex). The optional
//! accumulation timer runs on its own thread and only replaces the stored
//! entropy sample.
//!
//! ## Limitations
//!
//! The default [`TimeEntropy`] source hashes the wall-clock time and is weak
//! entropy. Supply [`OsEntropy`] or your own [`EntropySource`] when output
//! must be unpredictable. This crate has not been audited as a CSPRNG.

mod accumulator;
mod config;
mod entropy;
mod extract;
mod generator;
pub mod global;
#[cfg(feature = "rand")]
mod rng;
mod seed;
mod traits;

pub use accumulator::Accumulator;
pub use config::{Config, Options, DEFAULT_ACCUMULATE_INTERVAL_MS};
pub use entropy::{EntropySample, FixedEntropy, OsEntropy, TimeEntropy, ENTROPY_SIZE};
pub use extract::{NumericExtract, MAX_REJECTION_ROUNDS, TWO_POW_53};
pub use generator::Fortuna;
pub use seed::{derive_key, Key, KEY_SIZE};
pub use traits::{BlockSource, EntropySource};

/// Errors that can occur during generator setup or numeric extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The entropy source produced a sample of the wrong shape or length,
    /// or could not produce one at all.
    #[error("entropy error: {0}")]
    Entropy(String),

    /// A numeric conversion could not produce a value in range.
    #[error("conversion error: {0}")]
    Conversion(String),
}
