//! Conversion of raw 32-bit blocks into integers and floats.
//!
//! The 53-bit conversions combine two blocks: the low 21 bits of the first
//! (`high`) block and all 32 bits of the second (`low`) block. Bit 21 of
//! `high` selects the sign of the signed variants.
//!
//! The plain `int53`/`uint53` conversions read exactly two blocks. The `_full`
//! variants use one more bit of `high` to reach the single value `2^53` with
//! the right probability, rejecting and retrying everything else in that half
//! of the space. Each round succeeds with probability about one half, and
//! rounds are capped at [`MAX_REJECTION_ROUNDS`].

use crate::{BlockSource, Error};

/// `2^53`, one past the largest integer every `f64` represents exactly.
pub const TWO_POW_53: u64 = 1 << 53;

/// Upper bound on rejection rounds in the `_full` conversions.
///
/// A fair block source exhausts it with probability around `2^-256`.
pub const MAX_REJECTION_ROUNDS: u32 = 256;

const LOW_21: u32 = 0x1f_ffff;
const BIT_21: u32 = 0x20_0000;
const BIT_22: u32 = 0x40_0000;
const LOW_22: u32 = 0x3f_ffff;
const LOW_23: u32 = 0x7f_ffff;

/// Integer and float views over any [`BlockSource`].
///
/// Every method consumes one or more blocks, so results are reproducible
/// given a reproducible block sequence.
pub trait NumericExtract: BlockSource {
    /// One block as a two's complement signed integer.
    fn int32(&mut self) -> i32 {
        self.generate() as i32
    }

    /// One block as an unsigned integer.
    fn uint32(&mut self) -> u32 {
        self.generate()
    }

    /// Signed value in `[-2^53, 2^53)` from exactly two blocks.
    ///
    /// `-2^53` is under-represented compared to a uniform draw.
    fn int53(&mut self) -> i64 {
        let high = self.generate();
        let low = self.generate();
        signed_53(high, low)
    }

    /// Signed value in `[-2^53, 2^53]`, uniform over the full range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] if [`MAX_REJECTION_ROUNDS`] rounds pass
    /// without an accepted value.
    fn try_int53_full(&mut self) -> Result<i64, Error> {
        for _ in 0..MAX_REJECTION_ROUNDS {
            let high = self.generate();
            if high & BIT_22 == 0 {
                let low = self.generate();
                return Ok(signed_53(high, low));
            }
            if high & LOW_23 == BIT_22 && self.generate() == 0 {
                return Ok(TWO_POW_53 as i64);
            }
        }
        Err(exhausted("int53_full"))
    }

    /// Infallible form of [`try_int53_full`](Self::try_int53_full).
    ///
    /// # Panics
    ///
    /// Panics if the rejection loop is exhausted, which only a degenerate
    /// block source can cause.
    fn int53_full(&mut self) -> i64 {
        match self.try_int53_full() {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }

    /// Unsigned value in `[0, 2^53)` from exactly two blocks.
    fn uint53(&mut self) -> u64 {
        let high = self.generate() & LOW_21;
        let low = self.generate();
        join_53(high, low)
    }

    /// Unsigned value in `[0, 2^53]`, uniform over the full range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] if [`MAX_REJECTION_ROUNDS`] rounds pass
    /// without an accepted value.
    fn try_uint53_full(&mut self) -> Result<u64, Error> {
        for _ in 0..MAX_REJECTION_ROUNDS {
            let high = self.generate();
            if high & BIT_21 == 0 {
                let low = self.generate();
                return Ok(join_53(high & LOW_21, low));
            }
            if high & LOW_22 == BIT_21 && self.generate() == 0 {
                return Ok(TWO_POW_53);
            }
        }
        Err(exhausted("uint53_full"))
    }

    /// Infallible form of [`try_uint53_full`](Self::try_uint53_full).
    ///
    /// # Panics
    ///
    /// Panics if the rejection loop is exhausted.
    fn uint53_full(&mut self) -> u64 {
        match self.try_uint53_full() {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }

    /// Float uniformly distributed in `[0, 1)`.
    ///
    /// Built on [`uint53_full`](Self::uint53_full); the single value `2^53`
    /// would map to `1.0` and is drawn again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] if the rejection loop is exhausted.
    fn try_random(&mut self) -> Result<f64, Error> {
        for _ in 0..MAX_REJECTION_ROUNDS {
            let value = self.try_uint53_full()?;
            if value < TWO_POW_53 {
                return Ok(value as f64 / TWO_POW_53 as f64);
            }
        }
        Err(exhausted("random"))
    }

    /// Infallible form of [`try_random`](Self::try_random).
    ///
    /// # Panics
    ///
    /// Panics if the rejection loop is exhausted.
    fn random(&mut self) -> f64 {
        match self.try_random() {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<B: BlockSource + ?Sized> NumericExtract for B {}

fn join_53(high: u32, low: u32) -> u64 {
    (u64::from(high) << 32) | u64::from(low)
}

fn signed_53(high: u32, low: u32) -> i64 {
    let magnitude = join_53(high & LOW_21, low) as i64;
    if high & BIT_21 != 0 {
        magnitude - TWO_POW_53 as i64
    } else {
        magnitude
    }
}

fn exhausted(conversion: &str) -> Error {
    Error::Conversion(format!(
        "{conversion}: no value accepted after {MAX_REJECTION_ROUNDS} rejection rounds"
    ))
}
