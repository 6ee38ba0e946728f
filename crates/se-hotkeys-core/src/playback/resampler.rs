use crate::{CoreResult, SurfaceError};

use std::panic::Location;

use audioadapter_buffers::direct::InterleavedSlice;
use error_location::ErrorLocation;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

/// Converts interleaved audio between sample rates.
pub struct Resampler {
    resampler: Fft<f32>,
    input_rate: u32,
    output_rate: u32,
    channels: usize,
    chunk_frames: usize,
}

impl Resampler {
    #[track_caller]
    #[instrument]
    pub fn new(input_rate: u32, output_rate: u32, channels: usize) -> CoreResult<Self> {
        let chunk_size = 1024;
        let sub_chunks = 2;

        if channels == 0 {
            return Err(SurfaceError::ResamplingError {
                reason: "Cannot resample zero channels".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let resampler = Fft::<f32>::new(
            input_rate as usize,
            output_rate as usize,
            chunk_size,
            sub_chunks,
            channels,
            FixedSync::Input,
        )
        .map_err(|e| SurfaceError::ResamplingError {
            reason: format!("Failed to create resampler: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let chunk_frames = resampler.input_frames_next();

        debug!(
            input_rate = input_rate,
            output_rate = output_rate,
            channels = channels,
            chunk_frames = chunk_frames,
            "Resampler initialized"
        );

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
            channels,
            chunk_frames,
        })
    }

    /// Resample interleaved `samples`. A trailing partial frame is ignored.
    ///
    /// The filter delay is trimmed from the front and the resampler is fed
    /// silence until the whole input has come out the other end, so the
    /// output lines up with the input and keeps its tail.
    #[track_caller]
    #[instrument(skip(self, samples))]
    pub fn resample(&mut self, samples: &[f32]) -> CoreResult<Vec<f32>> {
        let frames = samples.len() / self.channels;
        if frames == 0 {
            return Ok(Vec::new());
        }

        let estimated_frames =
            (frames as f64 * self.output_rate as f64 / self.input_rate as f64) as usize;
        let delay_frames = self.resampler.output_delay();
        let wanted_frames = delay_frames + estimated_frames;
        let mut output = Vec::with_capacity(wanted_frames * self.channels);

        let chunk_len = self.chunk_frames * self.channels;
        let input = &samples[..frames * self.channels];
        let mut consumed = 0;

        while output.len() < wanted_frames * self.channels {
            let end = (consumed + chunk_len).min(input.len());
            let mut input_chunk = input[consumed..end].to_vec();
            input_chunk.resize(chunk_len, 0.0);
            consumed = end;

            let written = self.process_chunk(&input_chunk, &mut output)?;
            if written == 0 && consumed == input.len() {
                break;
            }
        }

        output.drain(..(delay_frames * self.channels).min(output.len()));
        output.truncate(estimated_frames * self.channels);

        debug!(
            input_frames = frames,
            output_frames = output.len() / self.channels,
            delay_frames = delay_frames,
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            "Resampled audio"
        );

        Ok(output)
    }

    /// Run one full input chunk and append the result. Returns frames written.
    #[track_caller]
    fn process_chunk(&mut self, input_chunk: &[f32], output: &mut Vec<f32>) -> CoreResult<usize> {
        let input_adapter = InterleavedSlice::new(input_chunk, self.channels, self.chunk_frames)
            .map_err(|e| SurfaceError::ResamplingError {
                reason: format!("Failed to create input adapter: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let output_frames = self.resampler.output_frames_max();
        let mut output_chunk = vec![0.0f32; output_frames * self.channels];

        let mut output_adapter =
            InterleavedSlice::new_mut(&mut output_chunk, self.channels, output_frames).map_err(
                |e| SurfaceError::ResamplingError {
                    reason: format!("Failed to create output adapter: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                },
            )?;

        let (_input_frames, output_frames_written) = self
            .resampler
            .process_into_buffer(&input_adapter, &mut output_adapter, None)
            .map_err(|e| SurfaceError::ResamplingError {
                reason: format!("Resampling failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        output.extend_from_slice(&output_chunk[..output_frames_written * self.channels]);

        Ok(output_frames_written)
    }
}
