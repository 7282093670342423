//! Flat-output facade: one-call digestion of a whole sequence.
//!
//! These functions cover the common case — skip-over policy, canonical
//! hash, adaptive sliding structure — and return a single flat vector.
//! With `threads > 1` the work is fanned out through [`crate::parallel`]
//! and the per-worker outputs are stitched back into one stream; the
//! result is identical to `threads == 1`. Callers needing other policies,
//! hash selections, bounded emission, or incremental appends should use
//! the engines directly.
//!
//! Conventional defaults are k = 31, w = 11, mod = 100 (see
//! [`crate::constants`]).

use tracing::debug;

use crate::digester::{BadCharPolicy, MinimizedHashType};
use crate::mod_minimizer::ModMin;
use crate::parallel;
use crate::sliding_min::Adaptive;
use crate::syncmer::Syncmer;
use crate::window_minimizer::WindowMin;
use crate::Result;

const POLICY: BadCharPolicy = BadCharPolicy::SkipOver;
const MINIMIZED: MinimizedHashType = MinimizedHashType::Canon;

/// Positions of all mod-minimizers (`hash % modulus == 0`) of `seq`.
pub fn modimizer(seq: &[u8], k: usize, modulus: u32, threads: usize) -> Result<Vec<u32>> {
    let out = if threads <= 1 {
        let mut engine = ModMin::new(seq, k, modulus, 0, 0, MINIMIZED, POLICY)?;
        let mut out = Vec::new();
        engine.roll_minimizer(usize::MAX, &mut out);
        out
    } else {
        parallel::thread_mod(threads, seq, k, modulus, 0, MINIMIZED, POLICY)?.concat()
    };
    debug!(emissions = out.len(), k, modulus, "modimizer digestion finished");
    Ok(out)
}

/// (position, hash) pairs of all mod-minimizers of `seq`.
pub fn modimizer_with_hashes(
    seq: &[u8],
    k: usize,
    modulus: u32,
    threads: usize,
) -> Result<Vec<(u32, u32)>> {
    if threads <= 1 {
        let mut engine = ModMin::new(seq, k, modulus, 0, 0, MINIMIZED, POLICY)?;
        let mut out = Vec::new();
        engine.roll_minimizer_with_hashes(usize::MAX, &mut out);
        Ok(out)
    } else {
        Ok(parallel::thread_mod_with_hashes(threads, seq, k, modulus, 0, MINIMIZED, POLICY)?
            .concat())
    }
}

/// Positions of all window minimizers of `seq` for windows of `w` k-mers.
pub fn window_minimizer(seq: &[u8], k: usize, w: usize, threads: usize) -> Result<Vec<u32>> {
    let out = if threads <= 1 {
        let mut engine: WindowMin<Adaptive> = WindowMin::new(seq, k, w, 0, MINIMIZED, POLICY)?;
        let mut out = Vec::new();
        engine.roll_minimizer(usize::MAX, &mut out);
        out
    } else {
        parallel::thread_wind::<Adaptive>(threads, seq, k, w, MINIMIZED, POLICY)?.concat()
    };
    debug!(emissions = out.len(), k, w, "window digestion finished");
    Ok(out)
}

/// (position, hash) pairs of all window minimizers of `seq`.
pub fn window_minimizer_with_hashes(
    seq: &[u8],
    k: usize,
    w: usize,
    threads: usize,
) -> Result<Vec<(u32, u32)>> {
    if threads <= 1 {
        let mut engine: WindowMin<Adaptive> = WindowMin::new(seq, k, w, 0, MINIMIZED, POLICY)?;
        let mut out = Vec::new();
        engine.roll_minimizer_with_hashes(usize::MAX, &mut out);
        Ok(out)
    } else {
        Ok(
            parallel::thread_wind_with_hashes::<Adaptive>(threads, seq, k, w, MINIMIZED, POLICY)?
                .concat(),
        )
    }
}

/// Window-start positions of all syncmers of `seq` for windows of `w`
/// k-mers.
pub fn syncmer(seq: &[u8], k: usize, w: usize, threads: usize) -> Result<Vec<u32>> {
    let out = if threads <= 1 {
        let mut engine: Syncmer<Adaptive> = Syncmer::new(seq, k, w, 0, MINIMIZED, POLICY)?;
        let mut out = Vec::new();
        engine.roll_minimizer(usize::MAX, &mut out);
        out
    } else {
        parallel::thread_sync::<Adaptive>(threads, seq, k, w, MINIMIZED, POLICY)?.concat()
    };
    debug!(emissions = out.len(), k, w, "syncmer digestion finished");
    Ok(out)
}

/// (window-start, minimum hash) pairs of all syncmers of `seq`.
pub fn syncmer_with_hashes(
    seq: &[u8],
    k: usize,
    w: usize,
    threads: usize,
) -> Result<Vec<(u32, u32)>> {
    if threads <= 1 {
        let mut engine: Syncmer<Adaptive> = Syncmer::new(seq, k, w, 0, MINIMIZED, POLICY)?;
        let mut out = Vec::new();
        engine.roll_minimizer_with_hashes(usize::MAX, &mut out);
        Ok(out)
    } else {
        Ok(
            parallel::thread_sync_with_hashes::<Adaptive>(threads, seq, k, w, MINIMIZED, POLICY)?
                .concat(),
        )
    }
}
