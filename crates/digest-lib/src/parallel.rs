//! Thread driver: digest one sequence across worker threads.
//!
//! The sequence is cut into `thread_count` contiguous slices. Each worker
//! runs its own engine over an *extended view* of its slice — the slice
//! plus just enough overlap on the right (k−1 bases for mod-minimizers,
//! k+w−2 for the windowed schemes) that the view contains exactly the
//! k-mers, respectively windows, starting inside the slice. Worker outputs
//! are therefore disjoint and, joined in slice order, reproduce the
//! single-threaded emission stream.
//!
//! Window minimizers need one stitch at each seam: a worker's first window
//! always emits, while the single-threaded run would have suppressed it if
//! it repeated the previous window's minimum. The driver drops such a
//! first emission when it equals the last emission of the preceding
//! workers.
//!
//! Workers share nothing but the read-only input slice; fan-out runs on
//! the rayon pool.

use rayon::prelude::*;
use tracing::debug;

use crate::digester::{BadCharPolicy, MinimizedHashType};
use crate::mod_minimizer::ModMin;
use crate::sliding_min::SlidingMin;
use crate::syncmer::Syncmer;
use crate::window_minimizer::WindowMin;
use crate::{DigestError, Result};

// Contiguous slices [l, r) covering the sequence, remainder on the last.
fn partition(len: usize, thread_count: usize, min_chunk: usize) -> Result<Vec<(usize, usize)>> {
    if thread_count == 0 {
        return Err(DigestError::BadThreadOutParams);
    }
    let chunk = len / thread_count;
    if chunk < min_chunk {
        return Err(DigestError::BadThreadOutParams);
    }
    Ok((0..thread_count)
        .map(|i| {
            let l = i * chunk;
            let r = if i + 1 == thread_count { len } else { (i + 1) * chunk };
            (l, r)
        })
        .collect())
}

/// Run a mod-minimizer over `seq` with `thread_count` workers.
///
/// Returns one position vector per worker, in slice order; their
/// concatenation equals the single-threaded output.
///
/// # Errors
///
/// [`DigestError::BadThreadOutParams`] if the thread count is zero or a
/// slice would be shorter than one k-mer; construction errors propagate
/// from the workers.
pub fn thread_mod(
    thread_count: usize,
    seq: &[u8],
    k: usize,
    modulus: u32,
    congruence: u32,
    minimized_h: MinimizedHashType,
    policy: BadCharPolicy,
) -> Result<Vec<Vec<u32>>> {
    let slices = partition(seq.len(), thread_count, k)?;
    debug!(len = seq.len(), thread_count, k, "mod digestion across workers");
    slices
        .par_iter()
        .map(|&(l, r)| {
            let view = &seq[l..(r + k - 1).min(seq.len())];
            let mut engine =
                ModMin::new(view, k, modulus, congruence, 0, minimized_h, policy)?;
            let mut local = Vec::new();
            engine.roll_minimizer(usize::MAX, &mut local);
            for p in &mut local {
                *p += l as u32;
            }
            Ok(local)
        })
        .collect()
}

/// Like [`thread_mod`], collecting (position, hash) pairs.
pub fn thread_mod_with_hashes(
    thread_count: usize,
    seq: &[u8],
    k: usize,
    modulus: u32,
    congruence: u32,
    minimized_h: MinimizedHashType,
    policy: BadCharPolicy,
) -> Result<Vec<Vec<(u32, u32)>>> {
    let slices = partition(seq.len(), thread_count, k)?;
    slices
        .par_iter()
        .map(|&(l, r)| {
            let view = &seq[l..(r + k - 1).min(seq.len())];
            let mut engine =
                ModMin::new(view, k, modulus, congruence, 0, minimized_h, policy)?;
            let mut local = Vec::new();
            engine.roll_minimizer_with_hashes(usize::MAX, &mut local);
            for (p, _) in &mut local {
                *p += l as u32;
            }
            Ok(local)
        })
        .collect()
}

// Suppress each worker's first emission when the previous workers already
// produced it (the single-threaded de-duplication across the seam).
fn stitch_windows<T: Copy + PartialEq>(outs: &mut [Vec<T>]) {
    let mut last: Option<T> = None;
    for out in outs.iter_mut() {
        if let (Some(prev), Some(&first)) = (last, out.first()) {
            if first == prev {
                out.remove(0);
            }
        }
        if let Some(&tail) = out.last() {
            last = Some(tail);
        }
    }
}

/// Run a window minimizer over `seq` with `thread_count` workers.
///
/// Returns one position vector per worker, in slice order; their
/// concatenation equals the single-threaded output.
///
/// # Errors
///
/// [`DigestError::BadThreadOutParams`] if the thread count is zero or a
/// slice would be shorter than one full window of k-mers.
pub fn thread_wind<S: SlidingMin>(
    thread_count: usize,
    seq: &[u8],
    k: usize,
    w: usize,
    minimized_h: MinimizedHashType,
    policy: BadCharPolicy,
) -> Result<Vec<Vec<u32>>> {
    if w == 0 {
        return Err(DigestError::BadWindowSize);
    }
    let overlap = k + w - 2;
    let slices = partition(seq.len(), thread_count, overlap + 1)?;
    debug!(len = seq.len(), thread_count, k, w, "window digestion across workers");
    let mut outs: Vec<Vec<u32>> = slices
        .par_iter()
        .map(|&(l, r)| {
            let view = &seq[l..(r + overlap).min(seq.len())];
            let mut engine: WindowMin<S> =
                WindowMin::new(view, k, w, 0, minimized_h, policy)?;
            let mut local = Vec::new();
            engine.roll_minimizer(usize::MAX, &mut local);
            for p in &mut local {
                *p += l as u32;
            }
            Ok(local)
        })
        .collect::<Result<_>>()?;
    stitch_windows(&mut outs);
    Ok(outs)
}

/// Like [`thread_wind`], collecting (position, hash) pairs.
pub fn thread_wind_with_hashes<S: SlidingMin>(
    thread_count: usize,
    seq: &[u8],
    k: usize,
    w: usize,
    minimized_h: MinimizedHashType,
    policy: BadCharPolicy,
) -> Result<Vec<Vec<(u32, u32)>>> {
    if w == 0 {
        return Err(DigestError::BadWindowSize);
    }
    let overlap = k + w - 2;
    let slices = partition(seq.len(), thread_count, overlap + 1)?;
    let mut outs: Vec<Vec<(u32, u32)>> = slices
        .par_iter()
        .map(|&(l, r)| {
            let view = &seq[l..(r + overlap).min(seq.len())];
            let mut engine: WindowMin<S> =
                WindowMin::new(view, k, w, 0, minimized_h, policy)?;
            let mut local = Vec::new();
            engine.roll_minimizer_with_hashes(usize::MAX, &mut local);
            for (p, _) in &mut local {
                *p += l as u32;
            }
            Ok(local)
        })
        .collect::<Result<_>>()?;
    stitch_windows(&mut outs);
    Ok(outs)
}

/// Run a syncmer selector over `seq` with `thread_count` workers.
///
/// Syncmer emission is per-window with no de-duplication, so worker
/// outputs need no stitching.
///
/// # Errors
///
/// [`DigestError::BadThreadOutParams`] if the thread count is zero or a
/// slice would be shorter than one full window of k-mers.
pub fn thread_sync<S: SlidingMin>(
    thread_count: usize,
    seq: &[u8],
    k: usize,
    w: usize,
    minimized_h: MinimizedHashType,
    policy: BadCharPolicy,
) -> Result<Vec<Vec<u32>>> {
    if w == 0 {
        return Err(DigestError::BadWindowSize);
    }
    let overlap = k + w - 2;
    let slices = partition(seq.len(), thread_count, overlap + 1)?;
    debug!(len = seq.len(), thread_count, k, w, "syncmer digestion across workers");
    slices
        .par_iter()
        .map(|&(l, r)| {
            let view = &seq[l..(r + overlap).min(seq.len())];
            let mut engine: Syncmer<S> = Syncmer::new(view, k, w, 0, minimized_h, policy)?;
            let mut local = Vec::new();
            engine.roll_minimizer(usize::MAX, &mut local);
            for p in &mut local {
                *p += l as u32;
            }
            Ok(local)
        })
        .collect()
}

/// Like [`thread_sync`], collecting (window-start, minimum hash) pairs.
pub fn thread_sync_with_hashes<S: SlidingMin>(
    thread_count: usize,
    seq: &[u8],
    k: usize,
    w: usize,
    minimized_h: MinimizedHashType,
    policy: BadCharPolicy,
) -> Result<Vec<Vec<(u32, u32)>>> {
    if w == 0 {
        return Err(DigestError::BadWindowSize);
    }
    let overlap = k + w - 2;
    let slices = partition(seq.len(), thread_count, overlap + 1)?;
    slices
        .par_iter()
        .map(|&(l, r)| {
            let view = &seq[l..(r + overlap).min(seq.len())];
            let mut engine: Syncmer<S> = Syncmer::new(view, k, w, 0, minimized_h, policy)?;
            let mut local = Vec::new();
            engine.roll_minimizer_with_hashes(usize::MAX, &mut local);
            for (p, _) in &mut local {
                *p += l as u32;
            }
            Ok(local)
        })
        .collect()
}
