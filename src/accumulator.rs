//! Entropy accumulator with an optional background re-sampling timer.
//!
//! The accumulator owns the current [`EntropySample`]. Samples are replaced
//! either synchronously through [`Accumulator::accumulate`] or by the timer
//! thread, which wakes every `accumulate_interval_ms` while time-based
//! accumulation is enabled. Both paths take the same mutex, so a reader
//! always sees a whole sample.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::{Config, EntropySample, EntropySource, Error};

/// Holds the current entropy sample and the timer that refreshes it.
pub struct Accumulator {
    source: Arc<dyn EntropySource>,
    entropy: Arc<Mutex<EntropySample>>,
    time_based: bool,
    interval: Duration,
    revalidate: bool,
    timer: Option<Timer>,
}

struct Timer {
    rearm: Sender<()>,
    handle: JoinHandle<()>,
}

impl Accumulator {
    /// Take and validate a first sample from `source`.
    ///
    /// The timer is not armed until the first [`accumulate`](Self::accumulate).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Entropy`] if the source fails or its sample does not
    /// have length [`ENTROPY_SIZE`](crate::ENTROPY_SIZE).
    pub fn new(source: Arc<dyn EntropySource>, config: &Config) -> Result<Self, Error> {
        let sample = source.sample()?;
        sample.validate()?;

        Ok(Self {
            source,
            entropy: Arc::new(Mutex::new(sample)),
            time_based: config.time_based_entropy,
            interval: config.accumulate_interval(),
            revalidate: config.revalidate_entropy,
            timer: None,
        })
    }

    /// Replace the current sample with a fresh one.
    ///
    /// With time-based accumulation enabled this also restarts the timer
    /// countdown, arming the timer if it is not running yet.
    pub fn accumulate(&mut self) {
        refresh(self.source.as_ref(), &self.entropy, self.revalidate);

        if self.time_based {
            self.arm_timer();
        }
    }

    /// Disable time-based accumulation and stop the timer thread.
    ///
    /// Safe to call any number of times. Once this returns, no further
    /// automatic accumulation happens.
    pub fn stop_timer(&mut self) {
        self.time_based = false;

        if let Some(Timer { rearm, handle }) = self.timer.take() {
            drop(rearm);
            if handle.join().is_err() {
                log::warn!("accumulation timer thread panicked");
            }
            log::debug!("accumulation timer stopped");
        }
    }

    /// Copy of the current sample.
    pub fn entropy(&self) -> EntropySample {
        lock(&self.entropy).clone()
    }

    /// Run `f` against the current sample without cloning it.
    pub fn with_entropy<R>(&self, f: impl FnOnce(&EntropySample) -> R) -> R {
        f(&lock(&self.entropy))
    }

    /// Whether time-based accumulation is enabled.
    pub fn is_time_based(&self) -> bool {
        self.time_based
    }

    /// Whether a timer thread is currently running.
    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    fn arm_timer(&mut self) {
        if let Some(timer) = &self.timer {
            if timer.rearm.send(()).is_ok() {
                return;
            }
        }
        // Either never armed or the thread is gone.
        self.timer = None;

        let (rearm, ticks) = mpsc::channel::<()>();
        let source = Arc::clone(&self.source);
        let entropy = Arc::clone(&self.entropy);
        let interval = self.interval;
        let revalidate = self.revalidate;

        let spawned = thread::Builder::new()
            .name("fortuna-accumulator".into())
            .spawn(move || loop {
                match ticks.recv_timeout(interval) {
                    Ok(()) => continue,
                    Err(RecvTimeoutError::Timeout) => {
                        refresh(source.as_ref(), &entropy, revalidate);
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            });

        match spawned {
            Ok(handle) => {
                log::debug!("accumulation timer armed every {interval:?}");
                self.timer = Some(Timer { rearm, handle });
            }
            Err(e) => log::warn!("could not start accumulation timer: {e}"),
        }
    }
}

impl Drop for Accumulator {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

fn refresh(source: &dyn EntropySource, slot: &Mutex<EntropySample>, revalidate: bool) {
    let sample = match source.sample() {
        Ok(sample) => sample,
        Err(e) => {
            log::warn!("keeping previous entropy sample: {e}");
            return;
        }
    };

    if revalidate {
        if let Err(e) = sample.validate() {
            log::warn!("discarding entropy sample: {e}");
            return;
        }
    }

    *lock(slot) = sample;
}

fn lock(slot: &Mutex<EntropySample>) -> MutexGuard<'_, EntropySample> {
    // A panicking reader cannot leave a half-written sample behind.
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
