use crate::playback::{PlaybackBuffer, buffer::apply_volume};

/// WHAT: Buffer hands out samples then pads with silence
/// WHY: The device callback always expects a full buffer
#[test]
fn given_short_buffer_when_filling_larger_output_then_padded_and_drained() {
    // Given: Three samples queued
    let mut buffer = PlaybackBuffer::new(vec![0.1, 0.2, 0.3]);
    let mut out = [1.0f32; 5];

    // When: Filling a five-sample output
    let drained = buffer.fill(&mut out);

    // Then: Samples copied, rest silent, buffer drained
    assert!(drained);
    assert_eq!(out, [0.1, 0.2, 0.3, 0.0, 0.0]);
}

/// WHAT: Buffer advances across multiple callbacks
/// WHY: Long sounds span many device callbacks
#[test]
fn given_long_buffer_when_filling_in_chunks_then_drains_on_last_chunk() {
    // Given: Four samples queued
    let mut buffer = PlaybackBuffer::new(vec![0.1, 0.2, 0.3, 0.4]);
    let mut out = [0.0f32; 2];

    // When/Then: First chunk leaves samples pending, second drains
    assert!(!buffer.fill(&mut out));
    assert_eq!(out, [0.1, 0.2]);
    assert!(buffer.fill(&mut out));
    assert_eq!(out, [0.3, 0.4]);
    assert!(buffer.is_drained());
}

/// WHAT: Volume is clamped to 0.0..=1.0
/// WHY: A misconfigured volume must not clip or invert the signal
#[test]
fn given_out_of_range_volume_when_applying_then_clamped() {
    // Given: Full-scale samples
    let mut loud = vec![1.0f32, -1.0];
    let mut half = vec![1.0f32, -1.0];

    // When: Applying volumes above range and at half
    apply_volume(&mut loud, 3.0);
    apply_volume(&mut half, 0.5);

    // Then: Above range behaves like 1.0, half scales
    assert_eq!(loud, vec![1.0, -1.0]);
    assert_eq!(half, vec![0.5, -0.5]);
}

/// WHAT: A NaN or infinite volume leaves the samples untouched
/// WHY: clamp passes NaN through, which would turn every sample into NaN
#[test]
fn given_non_finite_volume_when_applying_then_full_level() {
    // Given: Samples and non-finite volumes
    let mut nan = vec![0.5f32, -0.5];
    let mut infinite = vec![0.5f32, -0.5];

    // When: Applying them
    apply_volume(&mut nan, f32::NAN);
    apply_volume(&mut infinite, f32::NEG_INFINITY);

    // Then: Played as if volume were 1.0
    assert_eq!(nan, vec![0.5, -0.5]);
    assert_eq!(infinite, vec![0.5, -0.5]);
}
