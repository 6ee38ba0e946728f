use crate::playback::{DecodedSound, adapt_to_device};

/// WHAT: A sound already matching the device passes through, scaled by volume
/// WHY: The common case must not pay for remapping or resampling
#[test]
#[allow(clippy::unwrap_used)]
fn given_matching_format_when_adapting_then_only_volume_applied() {
    // Given: Stereo 48kHz sound
    let sound = DecodedSound {
        samples: vec![0.5, -0.5, 0.25, -0.25],
        sample_rate: 48000,
        channels: 2,
    };

    // When: Adapting to a stereo 48kHz device at half volume
    let samples = adapt_to_device(sound, 2, 48000, 0.5).unwrap();

    // Then: Same layout, halved
    assert_eq!(samples, vec![0.25, -0.25, 0.125, -0.125]);
}

/// WHAT: Mono at a different rate is widened and resampled
/// WHY: Device layout and rate rarely match the sound file
#[test]
#[allow(clippy::unwrap_used)]
fn given_mono_8khz_when_adapting_to_stereo_16khz_then_widened_and_resampled() {
    // Given: Half a second of mono 8kHz audio
    let sound = DecodedSound {
        samples: vec![0.1; 4000],
        sample_rate: 8000,
        channels: 1,
    };

    // When: Adapting to stereo 16kHz
    let samples = adapt_to_device(sound, 2, 16000, 1.0).unwrap();

    // Then: About half a second of stereo frames at 16kHz
    assert_eq!(samples.len() % 2, 0);
    let frames = samples.len() / 2;
    assert!((frames as i64 - 8000).unsigned_abs() < 400, "got {} frames", frames);
}
