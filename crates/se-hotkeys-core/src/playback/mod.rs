//! Hidden playback surface: decode, adapt to the output device, play once.

pub(crate) mod buffer;
pub(crate) mod channels;
pub(crate) mod decoder;
mod output;
mod resampler;
mod surface;

pub(crate) use {
    buffer::PlaybackBuffer,
    decoder::DecodedSound,
    output::{ActivePlayback, SoundOutput, adapt_to_device},
    resampler::Resampler,
};

pub use surface::{PlaybackLauncher, PlaybackMessage, PlaybackSurface};
