/// Convert interleaved audio from `from` channels to `to` channels.
///
/// Mono is duplicated to every output channel, anything is averaged down to
/// mono, and other layouts wrap source channels round-robin. A trailing
/// partial frame is dropped.
pub(crate) fn remap_channels(samples: &[f32], from: usize, to: usize) -> Vec<f32> {
    if from == 0 || to == 0 {
        return Vec::new();
    }

    let frames = samples.chunks_exact(from);

    if from == to {
        return frames.flatten().copied().collect();
    }

    let mut output = Vec::with_capacity(frames.len() * to);

    for frame in frames {
        if to == 1 {
            output.push(frame.iter().sum::<f32>() / from as f32);
        } else {
            output.extend((0..to).map(|channel| frame[channel % from]));
        }
    }

    output
}
