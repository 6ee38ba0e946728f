use crate::{
    CoreResult, SurfaceError,
    playback::{DecodedSound, PlaybackBuffer, Resampler, buffer::apply_volume, channels::remap_channels},
};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// The default output device, opened for one playback surface.
pub struct SoundOutput {
    device: Device,
    config: StreamConfig,
}

/// A sound currently being played. Dropping it stops the stream.
pub struct ActivePlayback {
    _stream: Stream,
    drained: Arc<AtomicBool>,
}

impl ActivePlayback {
    /// Whether every sample has been handed to the device.
    pub fn is_finished(&self) -> bool {
        self.drained.load(Ordering::Acquire)
    }
}

impl SoundOutput {
    #[track_caller]
    #[instrument]
    pub fn open() -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or(SurfaceError::NoOutputDevice {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_output_config()
            .map_err(|e| SurfaceError::DeviceError {
                reason: format!("Failed to get output config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "Output device opened"
        );

        Ok(Self {
            device,
            config: config.into(),
        })
    }

    /// Start playing `sound` at `volume` (0.0 to 1.0).
    #[track_caller]
    #[instrument(skip(self, sound))]
    pub fn play(&self, sound: DecodedSound, volume: f32) -> CoreResult<ActivePlayback> {
        let samples = adapt_to_device(
            sound,
            self.config.channels as usize,
            self.config.sample_rate,
            volume,
        )?;

        let drained = Arc::new(AtomicBool::new(false));
        let callback_drained = Arc::clone(&drained);
        let mut buffer = PlaybackBuffer::new(samples);

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if buffer.fill(data) {
                        callback_drained.store(true, Ordering::Release);
                    }
                },
                |err| {
                    error!("Audio output stream error: {}", err);
                },
                None,
            )
            .map_err(|e| SurfaceError::DeviceError {
                reason: format!("Failed to build output stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| SurfaceError::DeviceError {
            reason: format!("Failed to start output stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("Playback started");

        Ok(ActivePlayback {
            _stream: stream,
            drained,
        })
    }
}

/// Match a decoded sound to the device layout and rate, then apply volume.
#[track_caller]
pub(crate) fn adapt_to_device(
    sound: DecodedSound,
    channels: usize,
    sample_rate: u32,
    volume: f32,
) -> CoreResult<Vec<f32>> {
    let mut samples = if sound.channels == channels {
        sound.samples
    } else {
        remap_channels(&sound.samples, sound.channels, channels)
    };

    if sound.sample_rate != sample_rate {
        let mut resampler = Resampler::new(sound.sample_rate, sample_rate, channels)?;
        samples = resampler.resample(&samples)?;
    }

    apply_volume(&mut samples, volume);

    Ok(samples)
}
