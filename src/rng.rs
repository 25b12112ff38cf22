//! `rand` interop, behind the `rand` feature.

use rand::{Error as RandError, RngCore};

use crate::{BlockSource, Fortuna};

impl RngCore for Fortuna {
    fn next_u32(&mut self) -> u32 {
        self.generate()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.generate());
        let low = u64::from(self.generate());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let block = self.generate().to_be_bytes();
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}
