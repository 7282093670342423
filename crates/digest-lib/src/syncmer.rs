//! Syncmer engine.
//!
//! A window of `w` consecutive k-mers qualifies when its smallest hash
//! value sits in the first or last slot; qualifying windows emit their
//! *left edge* position. Unlike window minimizers there is no
//! de-duplication: every qualifying window emits, which is what gives
//! syncmers their window-guarantee-free, context-independent density.

use crate::digester::{BadCharPolicy, Digester, MinimizedHashType};
use crate::sliding_min::{Adaptive, SlidingMin};
use crate::{DigestError, Result};

/// Open syncmer selector (window edges on both sides).
#[derive(Debug, Clone)]
pub struct Syncmer<'a, S: SlidingMin = Adaptive> {
    digester: Digester<'a>,
    window: usize,
    ds: S,
    count: usize,
}

impl<'a, S: SlidingMin> Syncmer<'a, S> {
    /// Create a syncmer selector over `seq` with windows of `w` k-mers.
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
        })
    }

    /// Collect qualifying window-start positions into `out` until the
    /// vector holds `amount` entries or the sequence is exhausted.
    pub fn roll_minimizer(&mut self, amount: usize, out: &mut Vec<u32>) {
        self.fill_window();
        while self.digester.is_valid() && out.len() < amount {
            self.insert_current();
            let edge = self.ds.min_with_edge();
            if edge.at_left || edge.at_right {
                out.push(edge.left_pos);
            }
            self.digester.roll_one();
        }
    }

    /// Like [`Syncmer::roll_minimizer`], collecting (window-start, minimum
    /// hash) pairs.
    pub fn roll_minimizer_with_hashes(&mut self, amount: usize, out: &mut Vec<(u32, u32)>) {
        self.fill_window();
        while self.digester.is_valid() && out.len() < amount {
            self.insert_current();
            let edge = self.ds.min_with_edge();
            if edge.at_left || edge.at_right {
                out.push((edge.left_pos, edge.hash));
            }
            self.digester.roll_one();
        }
    }

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

    /// The window width, in k-mers.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of k-mers inserted into the sliding structure.
    pub fn ds_size(&self) -> usize {
        self.count
    }

    /// The underlying cursor.
    pub fn digester(&self) -> &Digester<'a> {
        &self.digester
    }

    /// Restart on a fresh sequence, clearing the window contents; see
    /// [`Digester::new_seq`].
    pub fn new_seq(&mut self, seq: &'a [u8], start: usize) -> Result<()> {
        self.ds = S::new(self.window);
        self.count = 0;
        self.digester.new_seq(seq, start)
    }

    /// Continue onto a logically concatenated sequence, keeping the window
    /// contents; see [`Digester::append_seq`].
    pub fn append_seq(&mut self, seq: &'a [u8]) -> Result<()> {
        self.digester.append_seq(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digester::is_actg;
    use crate::nthash::{base_forward_hash, base_reverse_hash, canonical};
    use crate::sliding_min::{Naive, Naive2, SegmentTree};

    fn kmer_hashes(seq: &[u8], k: usize, minimized_h: MinimizedHashType) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for i in 0..=(seq.len() - k) {
            let window = &seq[i..i + k];
            if !window.iter().all(|&b| is_actg(b)) {
                continue;
            }
            let f = base_forward_hash(window, k);
            let r = base_reverse_hash(window, k);
            let hash = match minimized_h {
                MinimizedHashType::Canon => canonical(f, r) as u32,
                MinimizedHashType::Forward => f as u32,
                MinimizedHashType::Reverse => r as u32,
            };
            out.push((hash, i as u32));
        }
        out
    }

    // A window qualifies when its minimum value occurs at either edge.
    fn oracle(seq: &[u8], k: usize, w: usize, minimized_h: MinimizedHashType) -> Vec<(u32, u32)> {
        let hashes = kmer_hashes(seq, k, minimized_h);
        let mut out = Vec::new();
        if hashes.len() < w {
            return out;
        }
        for win in hashes.windows(w) {
            let min = win.iter().map(|&(hash, _)| hash).min().unwrap();
            if win[0].0 == min || win[w - 1].0 == min {
                out.push((win[0].1, min));
            }
        }
        out
    }

    fn run<S: SlidingMin>(
        seq: &[u8],
        k: usize,
        w: usize,
        minimized_h: MinimizedHashType,
    ) -> Vec<(u32, u32)> {
        let mut dig: Syncmer<S> =
            Syncmer::new(seq, k, w, 0, minimized_h, BadCharPolicy::SkipOver).unwrap();
        let mut out = Vec::new();
        dig.roll_minimizer_with_hashes(10_000, &mut out);
        out
    }

    const SEQ: &[u8] = b"ACGTTAGCCGGATGCACGTACGTTAAGGCCATACTGGATTACAGATTACACCGGTTAAC";

    #[test]
    fn zero_window_is_rejected() {
        let err = Syncmer::<Adaptive>::new(
            SEQ,
            4,
            0,
            0,
            MinimizedHashType::Canon,
            BadCharPolicy::SkipOver,
        )
        .unwrap_err();
        assert_eq!(err, DigestError::BadWindowSize);
    }

    #[test]
    fn matches_oracle() {
        for minimized_h in [
            MinimizedHashType::Canon,
            MinimizedHashType::Forward,
            MinimizedHashType::Reverse,
        ] {
            for k in [4usize, 8] {
                for w in [1usize, 3, 4, 11, 16, 32] {
                    let expect = oracle(SEQ, k, w, minimized_h);
                    assert_eq!(
                        run::<Adaptive>(SEQ, k, w, minimized_h),
                        expect,
                        "k={} w={} {:?}",
                        k,
                        w,
                        minimized_h
                    );
                }
            }
        }
    }

    #[test]
    fn edge_rule_on_repetitive_sequence() {
        // every window of 3 on a 4-periodic sequence
        let seq = b"ACTGACTGACTG";
        let (k, w) = (4, 3);
        let expect = oracle(seq, k, w, MinimizedHashType::Canon);
        let got = run::<Adaptive>(seq, k, w, MinimizedHashType::Canon);
        assert_eq!(got, expect);

        // verify element-wise against the raw hash table
        let hashes = kmer_hashes(seq, k, MinimizedHashType::Canon);
        let mut by_hand = Vec::new();
        for p in 0..=(hashes.len() - w) {
            let trio = [hashes[p].0, hashes[p + 1].0, hashes[p + 2].0];
            let min = *trio.iter().min().unwrap();
            if trio[0] == min || trio[2] == min {
                by_hand.push((hashes[p].1, min));
            }
        }
        assert_eq!(got, by_hand);
    }

    #[test]
    fn all_structures_are_interchangeable() {
        for w in [1usize, 3, 11, 16, 17, 32] {
            let expect = oracle(SEQ, 4, w, MinimizedHashType::Canon);
            assert_eq!(run::<SegmentTree>(SEQ, 4, w, MinimizedHashType::Canon), expect);
            assert_eq!(run::<Naive>(SEQ, 4, w, MinimizedHashType::Canon), expect);
            assert_eq!(run::<Naive2>(SEQ, 4, w, MinimizedHashType::Canon), expect);
            assert_eq!(run::<Adaptive>(SEQ, 4, w, MinimizedHashType::Canon), expect);
        }
    }

    #[test]
    fn window_of_one_emits_every_kmer() {
        let out = run::<Adaptive>(SEQ, 4, 1, MinimizedHashType::Canon);
        let expect: Vec<(u32, u32)> = kmer_hashes(SEQ, 4, MinimizedHashType::Canon)
            .into_iter()
            .map(|(hash, pos)| (pos, hash))
            .collect();
        assert_eq!(out, expect);
    }

    #[test]
    fn positions_only_shape_matches_pairs() {
        let pairs = run::<Adaptive>(SEQ, 4, 5, MinimizedHashType::Canon);
        let mut dig: Syncmer<Adaptive> =
            Syncmer::new(SEQ, 4, 5, 0, MinimizedHashType::Canon, BadCharPolicy::SkipOver)
                .unwrap();
        let mut positions = Vec::new();
        dig.roll_minimizer(10_000, &mut positions);
        let expect: Vec<u32> = pairs.iter().map(|&(p, _)| p).collect();
        assert_eq!(positions, expect);
    }

    #[test]
    fn append_seq_matches_whole_sequence() {
        for (split, w) in [(20usize, 3usize), (31, 11), (9, 4)] {
            let expect = oracle(SEQ, 4, w, MinimizedHashType::Canon);
            let mut dig: Syncmer<Adaptive> = Syncmer::new(
                &SEQ[..split],
                4,
                w,
                0,
                MinimizedHashType::Canon,
                BadCharPolicy::SkipOver,
            )
            .unwrap();
            let mut out = Vec::new();
            dig.roll_minimizer_with_hashes(10_000, &mut out);
            dig.append_seq(&SEQ[split..]).unwrap();
            dig.roll_minimizer_with_hashes(10_000, &mut out);
            assert_eq!(out, expect, "split={} w={}", split, w);
        }
    }
}
