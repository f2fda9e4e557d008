//! Deterministic randomness for inference runs.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Source of the uniform draws behind every sampling operation.
///
/// Seine consumes randomness in exactly one shape: unit-interval uniforms.
/// Built-in samplers, inverse-CDF scans, and residual resampling all reduce
/// to [`RngHandle::uniform_unit`], so the handle exposes nothing else. It
/// wraps a `StdRng` seeded either directly from a master seed or from a
/// derived substream; a fixed seed reproduces every draw of a run on any
/// platform.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
}

impl RngHandle {
    /// Creates a handle seeded directly with `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a handle for the `substream`-th derived stream of
    /// `master_seed`.
    pub fn substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }

    /// Draws a uniform value in `[0, 1)` with 53 bits of precision.
    ///
    /// Built from the top bits of one raw draw, so the conversion is exact
    /// and identical across platforms.
    pub fn uniform_unit(&mut self) -> f64 {
        (self.rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Maps `(master_seed, substream)` to the seed of an independent stream.
///
/// Derivation is SipHash-1-3 under fixed zero keys rather than any additive
/// scheme, so neighbouring substream ids land on unrelated seeds and the
/// mapping never changes across platforms or releases. Every deterministic
/// branch of randomness in the runtime goes through this function.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}

/// Maps a textual stream label (a strategy name, a diagnostic tag) to a
/// substream id, with the same stability guarantees as
/// [`derive_substream_seed`].
pub fn stream_label(label: &str) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write(label.as_bytes());
    hasher.finish()
}
