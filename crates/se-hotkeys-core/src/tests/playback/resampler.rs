use crate::{SurfaceError, playback::Resampler};

// Test constants
const INPUT_SAMPLE_RATE: u32 = 48000;
const OUTPUT_SAMPLE_RATE: u32 = 16000;
const ONE_SECOND_INPUT_SAMPLES: usize = INPUT_SAMPLE_RATE as usize;
const ONE_SECOND_OUTPUT_SAMPLES: usize = OUTPUT_SAMPLE_RATE as usize;
const LENGTH_TOLERANCE: u64 = 100;
const TEST_SIGNAL_AMPLITUDE: f32 = 0.5;
const CD_SAMPLE_RATE: u32 = 44100;
const DEVICE_SAMPLE_RATE: u32 = 48000;
const STEREO: usize = 2;
const MAX_AMPLITUDE: f32 = 1.5;

/// WHAT: Resampler converts 48kHz mono to 16kHz correctly
/// WHY: Output length must track the rate ratio
#[test]
#[allow(clippy::unwrap_used)]
fn given_48khz_mono_when_resampling_to_16khz_then_output_length_approximately_correct() {
    // Given: Resampler configured for 48kHz -> 16kHz mono
    let mut resampler = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE, 1).unwrap();
    let input = vec![TEST_SIGNAL_AMPLITUDE; ONE_SECOND_INPUT_SAMPLES];

    // When: Resampling audio data
    let output = resampler.resample(&input).unwrap();

    // Then: Output is approximately 1 second at 16kHz
    assert!(
        (output.len() as i64 - ONE_SECOND_OUTPUT_SAMPLES as i64).unsigned_abs() < LENGTH_TOLERANCE,
        "Expected ~{} samples, got {}",
        ONE_SECOND_OUTPUT_SAMPLES,
        output.len()
    );
    assert!(output.iter().all(|&s| s.is_finite()));
}

/// WHAT: Stereo 44.1kHz upsamples to 48kHz with interleaving intact
/// WHY: CD-rate sound files are common and devices usually run at 48kHz
#[test]
#[allow(clippy::unwrap_used)]
fn given_stereo_cd_audio_when_resampling_to_device_rate_then_frames_aligned() {
    // Given: One second of stereo tone at 44.1kHz
    let mut resampler = Resampler::new(CD_SAMPLE_RATE, DEVICE_SAMPLE_RATE, STEREO).unwrap();
    let input: Vec<f32> = (0..CD_SAMPLE_RATE as usize)
        .flat_map(|i| {
            let s = (i as f32 * 0.05).sin() * TEST_SIGNAL_AMPLITUDE;
            [s, s]
        })
        .collect();

    // When: Resampling
    let output = resampler.resample(&input).unwrap();

    // Then: Whole frames, about one second at 48kHz, sane amplitude
    let frames = output.len() / STEREO;
    assert_eq!(output.len() % STEREO, 0);
    assert!(
        (frames as i64 - DEVICE_SAMPLE_RATE as i64).unsigned_abs() < DEVICE_SAMPLE_RATE as u64 / 20,
        "Expected ~{} frames, got {}",
        DEVICE_SAMPLE_RATE,
        frames
    );
    assert!(
        output
            .iter()
            .all(|&s| s.is_finite() && s.abs() <= MAX_AMPLITUDE)
    );
}

/// WHAT: Empty samples return empty output
/// WHY: Edge case handling for zero-length input
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_samples_when_resampling_then_empty_output() {
    // Given: Resampler and empty input
    let mut resampler = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE, STEREO).unwrap();

    // When: Resampling empty data
    let output = resampler.resample(&[]).unwrap();

    // Then: Output is also empty
    assert!(output.is_empty());
}

/// WHAT: Zero channels is rejected up front
/// WHY: Broken file metadata must surface as an error, not a panic
#[test]
fn given_zero_channels_when_creating_resampler_then_resampling_error() {
    let result = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE, 0);
    assert!(matches!(result, Err(SurfaceError::ResamplingError { .. })));
}

/// WHAT: Upsampled output starts and ends with signal, at the expected length
/// WHY: Filter delay left in the output plays as silence before every sound
/// and cuts off its last few milliseconds
#[test]
#[allow(clippy::unwrap_used)]
fn given_constant_signal_when_upsampling_then_no_leading_silence_and_tail_kept() {
    // Given: Half a second of constant level at 44.1kHz
    let frames = CD_SAMPLE_RATE as usize / 2;
    let mut resampler = Resampler::new(CD_SAMPLE_RATE, DEVICE_SAMPLE_RATE, 1).unwrap();
    let input = vec![TEST_SIGNAL_AMPLITUDE; frames];

    // When: Resampling to 48kHz
    let output = resampler.resample(&input).unwrap();

    // Then: Exactly the rate-scaled length, signal present at both edges
    assert_eq!(output.len(), DEVICE_SAMPLE_RATE as usize / 2);
    assert!(
        output[..10].iter().all(|&s| s > 0.1),
        "Leading frames are silent: {:?}",
        &output[..10]
    );
    assert!(
        output[output.len() - 10..].iter().all(|&s| s > 0.1),
        "Trailing frames are silent: {:?}",
        &output[output.len() - 10..]
    );
    let middle = output[output.len() / 2];
    assert!((middle - TEST_SIGNAL_AMPLITUDE).abs() < 0.05);
}
