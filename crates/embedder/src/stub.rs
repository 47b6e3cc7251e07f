use fxhash::hash64;

use crate::types::DEFAULT_DIMS;

/// Deterministic encoder used when the `stub` backend is configured.
/// Generates sinusoid values derived from a hash of the full (prefixed) input
/// text, so byte-for-byte identical inputs always yield identical vectors and
/// any prefix change produces a distinct vector.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StubEncoder {
    dims: usize,
}

impl StubEncoder {
    pub(crate) fn new() -> Self {
        Self { dims: DEFAULT_DIMS }
    }

    pub(crate) fn dims(&self) -> usize {
        self.dims
    }

    pub(crate) fn encode(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dims];
        let h = hash64(text.as_bytes());
        for (idx, value) in v.iter_mut().enumerate() {
            *value = (h.rotate_right((idx % 64) as u32) as f32 * 0.0001).sin();
        }
        v
    }

    pub(crate) fn encode_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.encode(t)).collect()
    }
}
