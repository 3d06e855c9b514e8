//! Tune/Seek completion state machine
//!
//! The chip signals the end of a tune or seek by raising STC. The host must
//! then clear TUNE and SEEK and wait for STC to drop again before another
//! operation may start. This module tracks that handshake without touching
//! the bus; the driver feeds it STC observations and acts on the returned
//! step.
//!
//! ```text
//! Idle ──request──▶ TuneRequested / SeekRequested
//!                         │ flushed
//!                         ▼
//!                  AwaitingCompletion ──STC=1──▶ Clearing ──STC=0──▶ Idle
//! ```

/// Handshake state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TuneState {
    /// No operation in flight
    #[default]
    Idle,
    /// TUNE is being set on the shadow copy
    TuneRequested,
    /// SEEK is being set on the shadow copy
    SeekRequested,
    /// Waiting for STC to rise
    AwaitingCompletion,
    /// TUNE/SEEK cleared, waiting for STC to fall
    Clearing,
}

#[cfg(feature = "embedded")]
impl defmt::Format for TuneState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::TuneRequested => defmt::write!(f, "TUNE_REQ"),
            Self::SeekRequested => defmt::write!(f, "SEEK_REQ"),
            Self::AwaitingCompletion => defmt::write!(f, "AWAIT_STC"),
            Self::Clearing => defmt::write!(f, "CLEARING"),
        }
    }
}

/// Kind of operation in flight
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuneKind {
    /// Tune to a channel
    Tune,
    /// Seek to the next valid station
    Seek,
}

#[cfg(feature = "embedded")]
impl defmt::Format for TuneKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Tune => defmt::write!(f, "tune"),
            Self::Seek => defmt::write!(f, "seek"),
        }
    }
}

/// What the driver must do after an STC observation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuneStep {
    /// Wait one poll interval and read status again
    Poll,
    /// STC rose: bulk read, clear TUNE and SEEK, flush, then keep polling
    Clear,
    /// STC fell: the operation is finished
    Done(TuneKind),
}

/// Rejected observation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuneError {
    /// STC did not reach the expected level within the poll bound
    Timeout,
    /// No completion wait is in progress
    NotWaiting,
}

/// Tune/seek handshake tracker
#[derive(Clone, Debug)]
pub struct TuneSequencer {
    state: TuneState,
    kind: TuneKind,
    polls: u32,
    max_polls: u32,
}

impl TuneSequencer {
    /// Create an idle sequencer that gives up after `max_polls` polls per wait
    #[must_use]
    pub const fn new(max_polls: u32) -> Self {
        Self {
            state: TuneState::Idle,
            kind: TuneKind::Tune,
            polls: 0,
            max_polls: if max_polls == 0 { 1 } else { max_polls },
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> TuneState {
        self.state
    }

    /// Kind of the current or last operation
    #[must_use]
    pub const fn kind(&self) -> TuneKind {
        self.kind
    }

    /// Unsuccessful polls in the current wait
    #[must_use]
    pub const fn polls(&self) -> u32 {
        self.polls
    }

    /// Poll bound per wait
    #[must_use]
    pub const fn max_polls(&self) -> u32 {
        self.max_polls
    }

    /// Check whether an operation is in flight
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        !matches!(self.state, TuneState::Idle)
    }

    /// Start an operation; refused unless idle
    pub fn request(&mut self, kind: TuneKind) -> bool {
        if self.is_busy() {
            return false;
        }
        self.kind = kind;
        self.polls = 0;
        self.state = match kind {
            TuneKind::Tune => TuneState::TuneRequested,
            TuneKind::Seek => TuneState::SeekRequested,
        };
        true
    }

    /// The request bits reached the chip
    pub fn flushed(&mut self) {
        if matches!(
            self.state,
            TuneState::TuneRequested | TuneState::SeekRequested
        ) {
            self.state = TuneState::AwaitingCompletion;
            self.polls = 0;
        }
    }

    /// Feed one STC observation
    ///
    /// # Errors
    /// `Timeout` once the poll bound is used up (the state is left as is so
    /// the caller can clean up), `NotWaiting` outside a completion wait.
    pub fn observe(&mut self, stc: bool) -> Result<TuneStep, TuneError> {
        let done = match self.state {
            TuneState::AwaitingCompletion => stc,
            TuneState::Clearing => !stc,
            _ => return Err(TuneError::NotWaiting),
        };

        if done {
            self.polls = 0;
            return Ok(match self.state {
                TuneState::AwaitingCompletion => {
                    self.state = TuneState::Clearing;
                    TuneStep::Clear
                }
                _ => {
                    self.state = TuneState::Idle;
                    TuneStep::Done(self.kind)
                }
            });
        }

        self.polls += 1;
        if self.polls >= self.max_polls {
            Err(TuneError::Timeout)
        } else {
            Ok(TuneStep::Poll)
        }
    }

    /// Drop any operation in flight
    pub fn abort(&mut self) {
        self.state = TuneState::Idle;
        self.polls = 0;
    }
}

impl Default for TuneSequencer {
    fn default() -> Self {
        Self::new(crate::config::POLL_TIMEOUT_MS / crate::config::POLL_INTERVAL_MS)
    }
}
