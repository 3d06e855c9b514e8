//! Tuning and seeking

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use super::{DriverResult, Si470x};
use crate::config::TUNE_SETTLE_MS;
use crate::radio::tune::{TuneError, TuneKind, TuneState, TuneStep};
use crate::registers::{Channel, PowerConfig, ReadChannel, StatusRssi, SysConfig2, SysConfig3};
use crate::types::{Error, Frequency, SeekDirection, SeekMode};

/// Largest value of the 10-bit CHAN field
const MAX_CHANNEL: u16 = 0x3FF;

impl<I2C, D, RST> Si470x<I2C, D, RST>
where
    I2C: I2c,
    D: DelayNs,
    RST: OutputPin,
{
    /// Tune to a channel number of the current band and spacing
    ///
    /// # Errors
    /// `InvalidParameter` above 1023, `Busy` while another operation runs,
    /// `Timeout` if the chip never reports completion, or a bus failure.
    pub fn set_channel(&mut self, channel: u16) -> DriverResult<(), I2C::Error> {
        if channel > MAX_CHANNEL {
            warn!("si470x: channel {=u16} rejected", channel);
            return Err(Error::InvalidParameter);
        }
        if !self.tune.request(TuneKind::Tune) {
            return Err(Error::Busy);
        }

        let result = self.run_tune(channel);
        if result.is_err() {
            self.drop_request();
        }
        result
    }

    fn run_tune(&mut self, channel: u16) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<Channel>(|r| {
            r.set_chan(channel);
            r.set_tune(true);
        });
        self.flush()?;
        self.tune.flushed();
        self.delay.delay_ms(TUNE_SETTLE_MS);

        self.await_completion(None)?;
        self.state = self.state.with_frequency(self.state.frequency_of(channel));
        debug!("si470x: tuned to {}", self.state.frequency());
        Ok(())
    }

    /// Tune to a frequency inside the current band
    ///
    /// The frequency is rounded down to the channel grid.
    ///
    /// # Errors
    /// `InvalidParameter` outside the band edges, otherwise as
    /// [`Self::set_channel`].
    pub fn set_frequency(&mut self, frequency: Frequency) -> DriverResult<(), I2C::Error> {
        let band = self.state.band();
        if !band.contains(frequency) {
            warn!("si470x: {} outside band {}", frequency, band);
            return Err(Error::InvalidParameter);
        }
        self.set_channel(band.channel_for(frequency, self.state.space()))
    }

    /// Cached frequency of the last tune or seek
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.state.frequency()
    }

    /// Channel number of the cached frequency
    #[must_use]
    pub const fn channel(&self) -> u16 {
        self.state.channel()
    }

    /// Tune one channel up, wrapping to the band start
    ///
    /// # Errors
    /// As [`Self::set_frequency`].
    pub fn frequency_up(&mut self) -> DriverResult<(), I2C::Error> {
        self.set_frequency(self.state.step_up())
    }

    /// Tune one channel down, wrapping to the band end
    ///
    /// # Errors
    /// As [`Self::set_frequency`].
    pub fn frequency_down(&mut self) -> DriverResult<(), I2C::Error> {
        self.set_frequency(self.state.step_down())
    }

    /// Channel the chip reports (reads all registers)
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn real_channel(&mut self) -> DriverResult<u16, I2C::Error> {
        self.refresh()?;
        Ok(self.shadow.view::<ReadChannel>().readchan())
    }

    /// Frequency of the channel the chip reports (reads all registers)
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn real_frequency(&mut self) -> DriverResult<Frequency, I2C::Error> {
        let channel = self.real_channel()?;
        Ok(self.state.frequency_of(channel))
    }

    /// Seek to the next valid station
    ///
    /// Returns the frequency the chip stopped on; it also becomes the cached
    /// frequency. Check [`Self::seek_failed`] to tell a found station from a
    /// band limit.
    ///
    /// # Errors
    /// `Busy` while another operation runs, `Timeout` if the chip never
    /// reports completion, or a bus failure.
    pub fn seek(
        &mut self,
        mode: SeekMode,
        direction: SeekDirection,
    ) -> DriverResult<Frequency, I2C::Error> {
        self.seek_inner(mode, direction, None)
    }

    /// Seek and report the frequency under test after every poll
    ///
    /// Each poll reads all sixteen registers instead of the status register
    /// alone so that the channel the chip is passing over is known.
    ///
    /// # Errors
    /// As [`Self::seek`].
    pub fn seek_with_progress<F>(
        &mut self,
        mode: SeekMode,
        direction: SeekDirection,
        mut progress: F,
    ) -> DriverResult<Frequency, I2C::Error>
    where
        F: FnMut(Frequency),
    {
        let progress: &mut dyn FnMut(Frequency) = &mut progress;
        self.seek_inner(mode, direction, Some(progress))
    }

    /// RSSI threshold below which a seek does not stop (0 = stop anywhere)
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_seek_threshold(&mut self, rssi: u8) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<SysConfig2>(|r| r.set_seekth(rssi));
        self.flush()
    }

    /// Seek SNR threshold and FM impulse count, 0..=15 each (0 disables)
    ///
    /// # Errors
    /// `InvalidParameter` above 15 (nothing is changed), or a bus failure.
    pub fn set_seek_quality(&mut self, snr: u8, impulses: u8) -> DriverResult<(), I2C::Error> {
        if snr > 0x0F || impulses > 0x0F {
            warn!("si470x: seek quality {=u8}/{=u8} rejected", snr, impulses);
            return Err(Error::InvalidParameter);
        }
        self.shadow.modify::<SysConfig3>(|r| {
            r.set_sksnr(snr);
            r.set_skcnt(impulses);
        });
        self.flush()
    }

    /// The last seek hit a band limit or found nothing
    #[must_use]
    pub const fn seek_failed(&self) -> bool {
        self.seek_failed
    }

    fn seek_inner(
        &mut self,
        mode: SeekMode,
        direction: SeekDirection,
        progress: Option<&mut dyn FnMut(Frequency)>,
    ) -> DriverResult<Frequency, I2C::Error> {
        if !self.tune.request(TuneKind::Seek) {
            return Err(Error::Busy);
        }

        let result = self.run_seek(mode, direction, progress);
        if result.is_err() {
            self.drop_request();
        }
        result
    }

    fn run_seek(
        &mut self,
        mode: SeekMode,
        direction: SeekDirection,
        progress: Option<&mut dyn FnMut(Frequency)>,
    ) -> DriverResult<Frequency, I2C::Error> {
        self.refresh()?;
        self.shadow.modify::<PowerConfig>(|r| {
            r.set_skmode(matches!(mode, SeekMode::Stop));
            r.set_seekup(matches!(direction, SeekDirection::Up));
            r.set_seek(true);
        });
        self.flush()?;
        self.tune.flushed();
        debug!("si470x: seek from {}", self.state.frequency());

        self.await_completion(progress)?;

        let channel = self.shadow.view::<ReadChannel>().readchan();
        self.state = self.state.with_frequency(self.state.frequency_of(channel));
        info!(
            "si470x: seek stopped at {} (failed: {=bool})",
            self.state.frequency(),
            self.seek_failed
        );
        Ok(self.state.frequency())
    }

    /// Run the STC handshake from `AwaitingCompletion` back to `Idle`
    fn await_completion(
        &mut self,
        mut progress: Option<&mut dyn FnMut(Frequency)>,
    ) -> DriverResult<TuneKind, I2C::Error> {
        let interval = self.config.poll_interval_ms;

        loop {
            if let Some(report) = progress.as_mut() {
                self.refresh()?;
                let channel = self.shadow.view::<ReadChannel>().readchan();
                self.state = self.state.with_frequency(self.state.frequency_of(channel));
                report(self.state.frequency());
            } else {
                self.refresh_status()?;
            }

            let status = self.shadow.view::<StatusRssi>();
            match self.tune.observe(status.stc()) {
                Ok(TuneStep::Poll) => {
                    trace!("si470x: STC poll {=u32}", self.tune.polls());
                    self.delay.delay_ms(interval);
                }
                Ok(TuneStep::Clear) => {
                    self.seek_failed = status.sf_bl();
                    break;
                }
                Ok(TuneStep::Done(kind)) => return Ok(kind),
                Err(err) => return Err(self.give_up(err)),
            }
        }

        self.refresh()?;
        self.shadow.modify::<PowerConfig>(|r| r.set_seek(false));
        self.shadow.modify::<Channel>(|r| r.set_tune(false));
        self.flush()?;

        loop {
            self.refresh_status()?;
            match self.tune.observe(self.shadow.view::<StatusRssi>().stc()) {
                Ok(TuneStep::Done(kind)) => return Ok(kind),
                Ok(TuneStep::Poll | TuneStep::Clear) => {
                    trace!("si470x: STC clear poll {=u32}", self.tune.polls());
                    self.delay.delay_ms(interval);
                }
                Err(err) => return Err(self.give_up(err)),
            }
        }
    }

    /// Return to idle with TUNE and SEEK cleared on the shadow copy
    fn drop_request(&mut self) {
        self.tune.abort();
        self.shadow.modify::<PowerConfig>(|r| r.set_seek(false));
        self.shadow.modify::<Channel>(|r| r.set_tune(false));
    }

    /// Leave a stuck operation: drop TUNE/SEEK on the chip when it never
    /// completed, then return to idle
    fn give_up(&mut self, err: TuneError) -> Error<I2C::Error> {
        let stuck_before_stc = matches!(self.tune.state(), TuneState::AwaitingCompletion);
        warn!(
            "si470x: {} gave up after {=u32} polls",
            self.tune.kind(),
            self.tune.polls()
        );
        self.tune.abort();

        match err {
            TuneError::NotWaiting => Error::Busy,
            TuneError::Timeout if stuck_before_stc => {
                self.shadow.modify::<PowerConfig>(|r| r.set_seek(false));
                self.shadow.modify::<Channel>(|r| r.set_tune(false));
                match self.flush() {
                    Ok(()) => Error::Timeout,
                    Err(bus) => bus,
                }
            }
            TuneError::Timeout => Error::Timeout,
        }
    }
}
