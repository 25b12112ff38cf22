//! Entropy samples and the built-in entropy sources.

use std::borrow::Cow;
use std::fmt::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha512};

use crate::{EntropySource, Error};

/// Required length of every entropy sample, in characters or elements.
pub const ENTROPY_SIZE: usize = 128;

/// One sample produced by an [`EntropySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntropySample {
    /// Text sample; its length is counted in characters.
    Text(String),
    /// Element sample; its length is counted in elements.
    Bytes(Vec<u8>),
}

impl EntropySample {
    /// Length of the sample in characters (text) or elements (bytes).
    ///
    /// Text is counted in Unicode scalar values, not UTF-16 code units, so a
    /// character outside the Basic Multilingual Plane counts once.
    pub fn len(&self) -> usize {
        match self {
            EntropySample::Text(text) => text.chars().count(),
            EntropySample::Bytes(bytes) => bytes.len(),
        }
    }

    /// Whether the sample holds no characters or elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the sample against the fixed [`ENTROPY_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Entropy`] naming the sample kind and its actual length.
    pub fn validate(&self) -> Result<(), Error> {
        let len = self.len();
        if len == ENTROPY_SIZE {
            return Ok(());
        }
        let kind = match self {
            EntropySample::Text(_) => "string",
            EntropySample::Bytes(_) => "array",
        };
        Err(Error::Entropy(format!(
            "entropy source must return a {kind} of length {ENTROPY_SIZE}, got length {len}"
        )))
    }

    /// Flatten the sample into the text fed to key derivation.
    ///
    /// Text is used as-is; elements are concatenated as decimal numbers.
    pub fn to_seed_text(&self) -> Cow<'_, str> {
        match self {
            EntropySample::Text(text) => Cow::Borrowed(text),
            EntropySample::Bytes(bytes) => {
                let mut out = String::with_capacity(bytes.len() * 3);
                for byte in bytes {
                    // Writing into a String cannot fail.
                    let _ = write!(out, "{byte}");
                }
                Cow::Owned(out)
            }
        }
    }
}

impl From<String> for EntropySample {
    fn from(text: String) -> Self {
        EntropySample::Text(text)
    }
}

impl From<Vec<u8>> for EntropySample {
    fn from(bytes: Vec<u8>) -> Self {
        EntropySample::Bytes(bytes)
    }
}

impl From<[u8; ENTROPY_SIZE]> for EntropySample {
    fn from(bytes: [u8; ENTROPY_SIZE]) -> Self {
        EntropySample::Bytes(bytes.to_vec())
    }
}

/// Default source: SHA-512 of the current millisecond timestamp, hex encoded.
///
/// This is weak entropy. Two samples taken within the same millisecond are
/// identical and the timestamp is guessable. It exists as a fallback when no
/// source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeEntropy;

impl EntropySource for TimeEntropy {
    fn sample(&self) -> Result<EntropySample, Error> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let digest = Sha512::digest(millis.to_string().as_bytes());
        Ok(EntropySample::Text(hex::encode(digest)))
    }
}

/// Operating system randomness, [`ENTROPY_SIZE`] bytes per sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn sample(&self) -> Result<EntropySample, Error> {
        let mut buf = [0u8; ENTROPY_SIZE];
        getrandom::fill(&mut buf)
            .map_err(|e| Error::Entropy(format!("operating system entropy unavailable: {e}")))?;
        Ok(buf.into())
    }
}

/// Source that returns the same sample every time.
///
/// With a fixed sample the generator's output is a pure function of the
/// sample, which makes runs reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedEntropy {
    sample: EntropySample,
}

impl FixedEntropy {
    /// Wrap a sample. The sample is not validated here.
    pub fn new(sample: impl Into<EntropySample>) -> Self {
        Self {
            sample: sample.into(),
        }
    }
}

impl EntropySource for FixedEntropy {
    fn sample(&self) -> Result<EntropySample, Error> {
        Ok(self.sample.clone())
    }
}
