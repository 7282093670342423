//! Parameter floors and facade defaults.

/// Smallest supported k-mer length.
pub const MIN_K: usize = 4;

/// Default k-mer length for the flat facade and the CLI.
pub const DEFAULT_K: usize = 31;

/// Default large-window width (in k-mers) for window minimizers and
/// syncmers.
pub const DEFAULT_WINDOW: usize = 11;

/// Default modulus for mod-minimizers.
pub const DEFAULT_MOD: u32 = 100;

/// Check whether a k-mer length is supported.
#[inline]
pub const fn is_valid_k(k: usize) -> bool {
    k >= MIN_K
}
