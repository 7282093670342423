//! Window-minimizer engine.
//!
//! Emits the argmin of every window of `w` consecutive k-mers, reporting a
//! window's minimum only when it differs from the previously emitted one
//! (the classic minimizer de-duplication). The sliding structure is a type
//! parameter so callers can pick a [`SlidingMin`] implementation; the
//! default [`Adaptive`] chooses one from `w`.

use crate::digester::{BadCharPolicy, Digester, MinimizedHashType};
use crate::sliding_min::{Adaptive, MinEntry, SlidingMin};
use crate::{DigestError, Result};

/// Sliding-window minimizer selector.
#[derive(Debug, Clone)]
pub struct WindowMin<'a, S: SlidingMin = Adaptive> {
    digester: Digester<'a>,
    window: usize,
    ds: S,
    // k-mers inserted into the structure since the last reset
    count: usize,
    // last emitted minimum; only meaningful once `minimized` is set
    prev: MinEntry,
    minimized: bool,
}

impl<'a, S: SlidingMin> WindowMin<'a, S> {
    /// Create a window minimizer over `seq` with windows of `w` k-mers.
    ///
    /// # Errors
    ///
    /// [`DigestError::BadWindowSize`] if `w == 0`;
    /// [`DigestError::BadConstruction`] for invalid `k` or `start`.
    pub fn new(
        seq: &'a [u8],
        k: usize,
        w: usize,
        start: usize,
        minimized_h: MinimizedHashType,
        policy: BadCharPolicy,
    ) -> Result<Self> {
        if w == 0 {
            return Err(DigestError::BadWindowSize);
        }
        Ok(Self {
            digester: Digester::new(seq, k, start, minimized_h, policy)?,
            window: w,
            ds: S::new(w),
            count: 0,
            prev: MinEntry::EMPTY,
            minimized: false,
        })
    }

    /// Collect window-minimum positions into `out` until the vector holds
    /// `amount` entries or the sequence is exhausted.
    ///
    /// Resumable: the window contents, the de-duplication state, and the
    /// cursor all survive between calls and across `append_seq`.
    pub fn roll_minimizer(&mut self, amount: usize, out: &mut Vec<u32>) {
        self.fill_window();
        while self.digester.is_valid() && out.len() < amount {
            if let Some(min) = self.advance_window() {
                out.push(min.pos);
            }
        }
    }

    /// Like [`WindowMin::roll_minimizer`], collecting (position, hash)
    /// pairs.
    pub fn roll_minimizer_with_hashes(&mut self, amount: usize, out: &mut Vec<(u32, u32)>) {
        self.fill_window();
        while self.digester.is_valid() && out.len() < amount {
            if let Some(min) = self.advance_window() {
                out.push((min.pos, min.hash));
            }
        }
    }

    // Insert k-mers until one more would complete the first window.
    fn fill_window(&mut self) {
        while self.count + 1 < self.window && self.digester.is_valid() {
            self.insert_current();
            self.digester.roll_one();
        }
    }

    #[inline]
    fn insert_current(&mut self) {
        let hash = self.digester.minimized_hash() as u32;
        self.ds.insert(hash, self.digester.pos() as u32);
        self.count += 1;
    }

    // Complete one window and step the cursor; returns the minimum if it
    // changed since the last emission.
    fn advance_window(&mut self) -> Option<MinEntry> {
        self.insert_current();
        let min = self.ds.min();
        let emit = if !self.minimized || min != self.prev {
            self.prev = min;
            self.minimized = true;
            Some(min)
        } else {
            None
        };
        self.digester.roll_one();
        emit
    }

    /// The window width, in k-mers.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of k-mers inserted into the sliding structure.
    pub fn ds_size(&self) -> usize {
        self.count
    }

    /// Whether at least one window minimum has been emitted.
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// The underlying cursor.
    pub fn digester(&self) -> &Digester<'a> {
        &self.digester
    }

    /// Restart on a fresh sequence, clearing the window contents and the
    /// de-duplication state; see [`Digester::new_seq`].
    pub fn new_seq(&mut self, seq: &'a [u8], start: usize) -> Result<()> {
        self.ds = S::new(self.window);
        self.count = 0;
        self.prev = MinEntry::EMPTY;
        self.minimized = false;
        self.digester.new_seq(seq, start)
    }

    /// Continue onto a logically concatenated sequence, keeping the window
    /// contents; see [`Digester::append_seq`].
    pub fn append_seq(&mut self, seq: &'a [u8]) -> Result<()> {
        self.digester.append_seq(seq)
    }
}
