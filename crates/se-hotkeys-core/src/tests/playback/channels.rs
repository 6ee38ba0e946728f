use crate::playback::channels::remap_channels;

/// WHAT: Mono is duplicated to every output channel
/// WHY: Most sound effects are mono while devices are stereo
#[test]
fn given_mono_when_remapping_to_stereo_then_duplicated() {
    // Given: Mono samples
    let mono = [0.1f32, 0.2];

    // When: Remapping to stereo
    let stereo = remap_channels(&mono, 1, 2);

    // Then: Each sample appears on both channels
    assert_eq!(stereo, vec![0.1, 0.1, 0.2, 0.2]);
}

/// WHAT: Stereo is averaged down to mono
/// WHY: Single-channel devices still play both sides
#[test]
fn given_stereo_when_remapping_to_mono_then_averaged() {
    // Given: Stereo frames
    let stereo = [0.2f32, 0.4, -1.0, 1.0];

    // When: Remapping to mono
    let mono = remap_channels(&stereo, 2, 1);

    // Then: Each frame is averaged
    assert_eq!(mono.len(), 2);
    assert!((mono[0] - 0.3).abs() < 1e-6);
    assert!(mono[1].abs() < 1e-6);
}

/// WHAT: Trailing partial frames are dropped
/// WHY: Keeps interleaving aligned for the resampler and device
#[test]
fn given_partial_frame_when_remapping_then_dropped() {
    // Given: Stereo samples with a dangling sample
    let samples = [0.1f32, 0.2, 0.3];

    // When: Remapping to four channels
    let quad = remap_channels(&samples, 2, 4);

    // Then: One full frame, channels wrapped round-robin
    assert_eq!(quad, vec![0.1, 0.2, 0.1, 0.2]);
}

/// WHAT: Zero channels yields nothing
/// WHY: Guards against division by zero on broken metadata
#[test]
fn given_zero_channels_when_remapping_then_empty() {
    assert!(remap_channels(&[0.5, 0.5], 0, 2).is_empty());
    assert!(remap_channels(&[0.5, 0.5], 2, 0).is_empty());
}
