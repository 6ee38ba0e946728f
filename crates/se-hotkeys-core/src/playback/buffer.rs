/// Interleaved samples consumed by the output callback.
pub struct PlaybackBuffer {
    samples: Vec<f32>,
    cursor: usize,
}

impl PlaybackBuffer {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// Copy the next samples into `out`, padding with silence once drained.
    ///
    /// Returns `true` when every sample has been handed out.
    pub fn fill(&mut self, out: &mut [f32]) -> bool {
        let remaining = &self.samples[self.cursor..];
        let count = remaining.len().min(out.len());

        out[..count].copy_from_slice(&remaining[..count]);
        out[count..].fill(0.0);
        self.cursor += count;

        self.is_drained()
    }

    pub fn is_drained(&self) -> bool {
        self.cursor >= self.samples.len()
    }
}

/// Scale every sample by `volume`, clamped to the valid range.
///
/// A non-finite volume plays at full level.
pub(crate) fn apply_volume(samples: &mut [f32], volume: f32) {
    if !volume.is_finite() {
        return;
    }
    let volume = volume.clamp(0.0, 1.0);
    if (volume - 1.0).abs() < f32::EPSILON {
        return;
    }
    samples.iter_mut().for_each(|s| *s *= volume);
}
