use seine_core::{derive_substream_seed, stream_label};

/// Derives the deterministic seed for the `run_index`-th run a strategy
/// executes under an engine with the given master seed.
///
/// Each strategy owns an independent family of substreams, keyed by its
/// stream label, so interleaving runs of different strategies perturbs
/// neither sequence: the third particle-filter run draws the same seed
/// whether or not forward runs happened in between.
pub fn run_seed(master_seed: u64, strategy: &str, run_index: u64) -> u64 {
    let stream = derive_substream_seed(master_seed, stream_label(strategy));
    derive_substream_seed(stream, run_index)
}
