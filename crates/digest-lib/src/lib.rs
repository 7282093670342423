// digest: sub-sampling ("digestion") of nucleotide sequences
//
// A Rust library for mod-minimizer, window-minimizer, and syncmer
// selection over the 64-bit ntHash rolling hash.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod constants;
pub mod digester;
pub mod flat;
pub mod mod_minimizer;
pub mod nthash;
pub mod parallel;
pub mod sliding_min;
pub mod syncmer;
pub mod window_minimizer;

// Re-export common types at crate root
pub use digester::{BadCharPolicy, Digester, MinimizedHashType};
pub use mod_minimizer::ModMin;
pub use sliding_min::{Adaptive, EdgeMin, MinEntry, Naive, Naive2, SegmentTree, SlidingMin};
pub use syncmer::Syncmer;
pub use window_minimizer::WindowMin;

/// Shorthand `Result` alias for this crate's operations.
pub type Result<T, E = DigestError> = std::result::Result<T, E>;

/// Errors raised at the API boundary.
///
/// Non-ACGT input is never an error; the cursor's validity flag is the
/// in-band signal for "no k-mer available".
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// k was below the floor, or the starting index was past the end of
    /// the sequence, at construction or `new_seq`.
    #[error("k must be at least 4 and start must be less than the sequence length")]
    BadConstruction,

    /// The requested congruence class does not exist for the modulus.
    #[error("congruence must be less than mod")]
    BadMod,

    /// `append_seq` was called before the cursor consumed the current
    /// sequence.
    #[error("the cursor must reach the end of the current sequence before a new one is appended")]
    NotRolledTillEnd,

    /// A windowed engine was constructed with a zero-width window.
    #[error("the large window must span at least 1 k-mer")]
    BadWindowSize,

    /// The thread driver was given a thread count the sequence cannot
    /// support.
    #[error("invalid thread count: each slice must hold at least one full k-mer window")]
    BadThreadOutParams,
}
