//! The generator handle: counter-mode AES under a key that is re-derived
//! after every block.

use std::fmt;
use std::sync::Arc;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes256;

use crate::{
    derive_key, Accumulator, BlockSource, Config, EntropySample, Error, Key, Options, TimeEntropy,
    KEY_SIZE,
};

const BLOCK_SIZE: usize = 16;
const CIPHER_KEY: std::ops::Range<usize> = 0..32;
const CIPHER_IV: std::ops::Range<usize> = 32..48;

/// A live generator.
///
/// Construction is initialization: a `Fortuna` value always holds a valid
/// key, so generation can never run on uninitialized state. Dropping the
/// handle stops its accumulation timer.
///
/// # Example
///
/// ```rust
/// use fortuna::{BlockSource, Fortuna, Options};
///
/// let mut rng = Fortuna::init(Options::new()).unwrap();
/// assert_eq!(rng.counter(), 0);
///
/// rng.generate();
/// rng.generate();
/// assert_eq!(rng.counter(), 2);
/// ```
pub struct Fortuna {
    key: Key,
    counter: u64,
    accumulator: Accumulator,
    config: Config,
}

impl Fortuna {
    /// Validate the entropy source, accumulate once and derive the first key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Entropy`] if the first sample is not exactly
    /// [`ENTROPY_SIZE`](crate::ENTROPY_SIZE) long or the source fails. No
    /// generator exists in that case.
    pub fn init(options: Options) -> Result<Self, Error> {
        let Options {
            config,
            entropy_source,
        } = options;
        let source = entropy_source.unwrap_or_else(|| Arc::new(TimeEntropy));

        let mut accumulator = Accumulator::new(source, &config)?;
        accumulator.accumulate();

        let counter = 0;
        let key = accumulator.with_entropy(|entropy| derive_key(entropy, counter));

        log::debug!(
            "generator initialized (time_based_entropy={}, interval={}ms)",
            config.time_based_entropy,
            config.accumulate_interval_ms
        );

        Ok(Self {
            key,
            counter,
            accumulator,
            config,
        })
    }

    /// Number of blocks generated so far.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Copy of the current entropy sample.
    pub fn entropy(&self) -> EntropySample {
        self.accumulator.entropy()
    }

    /// Settings this generator was initialized with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the accumulation timer is still enabled.
    pub fn is_time_based(&self) -> bool {
        self.accumulator.is_time_based()
    }

    /// Disable timer-driven accumulation. Idempotent.
    pub fn stop_timer(&mut self) {
        self.accumulator.stop_timer();
    }

    fn reseed(&mut self) {
        self.key = self
            .accumulator
            .with_entropy(|entropy| derive_key(entropy, self.counter));
        log::trace!("reseeded at counter {}", self.counter);
    }
}

impl BlockSource for Fortuna {
    /// Encrypt the counter, advance it, then accumulate and reseed.
    ///
    /// The returned value is the first four ciphertext bytes, big-endian.
    fn generate(&mut self) -> u32 {
        let block = encrypt_counter(&self.key, self.counter);

        self.counter += 1;
        self.accumulator.accumulate();
        self.reseed();

        u32::from_be_bytes([block[0], block[1], block[2], block[3]])
    }
}

impl fmt::Debug for Fortuna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fortuna")
            .field("counter", &self.counter)
            .field("config", &self.config)
            .field("timer_armed", &self.accumulator.is_timer_armed())
            .finish_non_exhaustive()
    }
}

/// First ciphertext block of AES-256-CBC over the PKCS#7-padded decimal
/// counter text.
///
/// The cipher key is the first half of the derived key and the IV the next
/// sixteen bytes. Counters of sixteen digits or more fill the whole first
/// block with their leading digits.
fn encrypt_counter(key: &[u8; KEY_SIZE], counter: u64) -> [u8; BLOCK_SIZE] {
    let text = counter.to_string();
    let text = text.as_bytes();
    let used = text.len().min(BLOCK_SIZE);

    let mut plain = [(BLOCK_SIZE - used) as u8; BLOCK_SIZE];
    plain[..used].copy_from_slice(&text[..used]);
    for (byte, iv) in plain.iter_mut().zip(&key[CIPHER_IV]) {
        *byte ^= iv;
    }

    let cipher = Aes256::new(GenericArray::from_slice(&key[CIPHER_KEY]));
    let mut block = GenericArray::clone_from_slice(&plain);
    cipher.encrypt_block(&mut block);

    let mut out = [0u8; BLOCK_SIZE];
    out.copy_from_slice(&block);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntropySource, FixedEntropy, NumericExtract, ENTROPY_SIZE, TWO_POW_53};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::thread;
    use std::time::Duration;

    fn fixed(fill: char) -> Options {
        Options::new().with_entropy_source(FixedEntropy::new(fill.to_string().repeat(ENTROPY_SIZE)))
    }

    fn ticking_source() -> impl EntropySource {
        let next = AtomicU64::new(0);
        move || {
            let value = next.fetch_add(1, Ordering::SeqCst);
            EntropySample::Text(format!("{value:0>128}"))
        }
    }

    #[test]
    fn test_init_state() {
        let rng = Fortuna::init(fixed('k')).unwrap();
        assert_eq!(rng.counter(), 0);
        assert_eq!(*rng.key, *derive_key(&rng.entropy(), 0));
        assert!(!rng.is_time_based());
    }

    #[test]
    fn test_deserialized_config_reaches_generator() {
        let config: Config = serde_json::from_str(
            r#"{ "time_based_entropy": true, "accumulate_interval_ms": 50, "revalidate_entropy": true }"#,
        )
        .unwrap();
        let mut rng = Fortuna::init(fixed('c').with_config(config.clone())).unwrap();

        assert_eq!(rng.config(), &config);
        assert_eq!(rng.config().accumulate_interval(), Duration::from_millis(50));
        assert!(rng.is_time_based());
        rng.stop_timer();
        assert!(!rng.is_time_based());
    }

    #[test]
    fn test_default_options_use_time_entropy() {
        let mut rng = Fortuna::init(Options::new()).unwrap();
        assert!(rng.entropy().validate().is_ok());
        rng.generate();
        assert_eq!(rng.counter(), 1);
    }

    #[test]
    fn test_init_rejects_short_string() {
        let options = Options::new().with_entropy_source(FixedEntropy::new("a".repeat(127)));
        let err = Fortuna::init(options).unwrap_err();
        assert!(matches!(err, Error::Entropy(_)));
    }

    #[test]
    fn test_init_rejects_wrong_array_length() {
        let options = Options::new().with_entropy_source(|| EntropySample::Bytes(vec![0; 64]));
        assert!(Fortuna::init(options).is_err());
    }

    #[test]
    fn test_generate_reseeds_with_new_counter() {
        let mut rng = Fortuna::init(Options::new().with_entropy_source(ticking_source())).unwrap();
        let first_key = *rng.key;

        rng.generate();
        assert_eq!(rng.counter(), 1);
        assert_ne!(*rng.key, first_key);
        assert_eq!(*rng.key, *derive_key(&rng.entropy(), 1));
    }

    #[test]
    fn test_generate_accumulates_every_block() {
        let mut rng = Fortuna::init(Options::new().with_entropy_source(ticking_source())).unwrap();
        let before = rng.entropy();
        rng.generate();
        assert_ne!(rng.entropy(), before);
    }

    #[test]
    fn test_first_block_matches_construction() {
        let sample = "q".repeat(ENTROPY_SIZE);
        let mut rng = Fortuna::init(fixed('q')).unwrap();

        let key = sha512(&format!("{sample}0"));
        let mut plain = [15u8; 16];
        plain[0] = b'0';
        for (byte, iv) in plain.iter_mut().zip(&key[32..48]) {
            *byte ^= iv;
        }
        let cipher = Aes256::new_from_slice(&key[..32]).unwrap();
        let mut block = GenericArray::clone_from_slice(&plain);
        cipher.encrypt_block(&mut block);

        let expected = u32::from_be_bytes([block[0], block[1], block[2], block[3]]);
        assert_eq!(rng.generate(), expected);
    }

    fn sha512(text: &str) -> Vec<u8> {
        use sha2::{Digest, Sha512};
        Sha512::digest(text.as_bytes()).to_vec()
    }

    #[test]
    fn test_encrypt_counter_long_counters() {
        let key = [7u8; KEY_SIZE];
        // Same leading sixteen digits, same first block.
        assert_eq!(
            encrypt_counter(&key, 12_345_678_901_234_560),
            encrypt_counter(&key, 12_345_678_901_234_569)
        );
        assert_ne!(encrypt_counter(&key, 1), encrypt_counter(&key, 2));
        assert_ne!(encrypt_counter(&key, u64::MAX), encrypt_counter(&[8u8; KEY_SIZE], u64::MAX));
    }

    #[test]
    fn test_identical_entropy_identical_sequences() {
        let mut a = Fortuna::init(fixed('d')).unwrap();
        let mut b = Fortuna::init(fixed('d')).unwrap();

        for _ in 0..500 {
            assert_eq!(a.generate(), b.generate());
        }
        assert_eq!(a.int32(), b.int32());
        assert_eq!(a.int53(), b.int53());
        assert_eq!(a.int53_full(), b.int53_full());
        assert_eq!(a.uint53(), b.uint53());
        assert_eq!(a.uint53_full(), b.uint53_full());
        assert_eq!(a.random().to_bits(), b.random().to_bits());
        assert_eq!(a.counter(), b.counter());
    }

    #[test]
    fn test_different_entropy_different_sequences() {
        let mut a = Fortuna::init(fixed('d')).unwrap();
        let mut b = Fortuna::init(fixed('e')).unwrap();

        let left: Vec<u32> = (0..16).map(|_| a.generate()).collect();
        let right: Vec<u32> = (0..16).map(|_| b.generate()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn test_output_ranges() {
        let mut rng = Fortuna::init(fixed('r')).unwrap();
        for _ in 0..1_000 {
            let _ = rng.int32();
            assert!(rng.uint53() < TWO_POW_53);
            let signed = rng.int53();
            assert!((-(TWO_POW_53 as i64)..TWO_POW_53 as i64).contains(&signed));
        }
    }

    #[test]
    fn test_random_unit_interval() {
        let mut rng = Fortuna::init(fixed('u')).unwrap();
        for _ in 0..10_000 {
            let value = rng.random();
            assert!((0.0..1.0).contains(&value), "{value} outside [0, 1)");
        }
    }

    #[test]
    fn test_full_variants_terminate() {
        let mut rng = Fortuna::init(fixed('f')).unwrap();
        let bound = TWO_POW_53 as i64;
        for _ in 0..100_000 {
            let value = rng.int53_full();
            assert!((-bound..=bound).contains(&value));
        }
        // About three blocks per conversion.
        assert!(rng.counter() < 400_000, "counter: {}", rng.counter());
    }

    #[test]
    fn test_time_based_entropy_changes_without_generate() {
        let options = Options::new()
            .with_entropy_source(ticking_source())
            .time_based_entropy(true)
            .accumulate_interval_ms(10);
        let mut rng = Fortuna::init(options).unwrap();
        assert!(rng.is_time_based());

        let first = rng.entropy();
        thread::sleep(Duration::from_millis(60));
        assert_ne!(rng.entropy(), first);

        rng.stop_timer();
        assert!(!rng.is_time_based());
        let frozen = rng.entropy();
        thread::sleep(Duration::from_millis(40));
        assert_eq!(rng.entropy(), frozen);
    }

    #[test]
    fn test_debug_hides_key() {
        let rng = Fortuna::init(fixed('h')).unwrap();
        let text = format!("{rng:?}");
        assert!(text.contains("counter: 0"));
        assert!(!text.contains("key"));
    }
}
