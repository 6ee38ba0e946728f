use crate::{CoreResult, SurfaceError};

use std::{fs::File, io::ErrorKind, panic::Location, path::Path};

use error_location::ErrorLocation;
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{CODEC_TYPE_NULL, DecoderOptions},
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};
use tracing::{debug, instrument, warn};

/// A fully decoded sound held in memory as interleaved `f32` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSound {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl DecodedSound {
    /// Decode the whole file at `path`.
    ///
    /// Sound effects are short, so the file is decoded up front instead of
    /// streamed from the audio callback.
    #[track_caller]
    #[instrument]
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let caller = Location::caller();
        let fail = |reason: String| SurfaceError::DecodeFailed {
            path: path.to_path_buf(),
            reason,
            location: ErrorLocation::from(caller),
        };

        let file = File::open(path).map_err(|e| fail(format!("Failed to open file: {}", e)))?;
        let stream = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| fail(format!("Unsupported format: {}", e)))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| fail("No audio track".to_string()))?;
        let track_id = track.id;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| fail(format!("Unsupported codec: {}", e)))?;

        let mut samples = Vec::new();
        let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
        let mut channels = track
            .codec_params
            .channels
            .map(|c| c.count())
            .unwrap_or(0);

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(fail(format!("Failed to read packet: {}", e))),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    sample_rate = spec.rate;
                    channels = spec.channels.count();

                    let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    buffer.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buffer.samples());
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!(error = e, "Skipping undecodable packet");
                }
                Err(e) => return Err(fail(format!("Decode failed: {}", e))),
            }
        }

        if samples.is_empty() || sample_rate == 0 || channels == 0 {
            return Err(fail("No audio decoded".to_string()));
        }

        debug!(
            sample_count = samples.len(),
            sample_rate = sample_rate,
            channels = channels,
            "Sound decoded"
        );

        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }
}
