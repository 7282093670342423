//! Streaming k-mer cursor over a borrowed nucleotide slice.
//!
//! [`Digester`] walks a sequence one base at a time, maintaining the
//! forward, reverse-complement, and canonical ntHash of the current k-mer.
//! It tolerates non-ACGT bytes under a configurable [`BadCharPolicy`], and
//! supports logical concatenation of sequences via [`Digester::append_seq`]
//! without rehashing the prefix: up to k−1 trailing bytes of the previous
//! slice are carried in a small deque (`c_outs`) and fed to the rolling
//! update as the "outgoing" characters of the first rolls on the new slice.
//!
//! Positions are absolute across appended sequences: the k-mer reported at
//! [`Digester::pos`] starts at that offset in the virtual concatenation of
//! every slice seen so far.

use std::collections::VecDeque;

use crate::constants::MIN_K;
use crate::nthash;
use crate::{DigestError, Result};

/// Which of the three hashes downstream selection minimizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinimizedHashType {
    /// Minimize the canonical (strand-independent) hash.
    Canon,
    /// Minimize the forward-strand hash.
    Forward,
    /// Minimize the reverse-complement hash.
    Reverse,
}

/// What to do with non-ACGT characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadCharPolicy {
    /// Treat any non-ACGT character as an 'A'.
    WriteOver,
    /// Skip every k-mer that covers a non-ACGT character.
    SkipOver,
}

/// True for the eight nucleotide bytes; everything else is "bad".
#[inline(always)]
pub(crate) const fn is_actg(b: u8) -> bool {
    matches!(b, b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't')
}

/// Streaming cursor producing (position, fhash, rhash, chash) for every
/// valid k-mer of one logical sequence.
///
/// The backing slice is borrowed and must outlive the cursor. Hash getters
/// are meaningful only while [`Digester::is_valid`] returns true; rolling
/// off the end clears validity and further rolls are no-ops.
#[derive(Debug, Clone)]
pub struct Digester<'a> {
    // backing slice of the current (sub-)sequence
    seq: &'a [u8],
    // combined length of all previously appended slices
    offset: usize,
    // index of the next character to be rolled out; junk while c_outs is
    // non-empty
    start: usize,
    // index of the next character to be rolled in
    end: usize,
    chash: u64,
    fhash: u64,
    rhash: u64,
    k: usize,
    // outgoing characters carried over from the previous slice, oldest first
    c_outs: VecDeque<u8>,
    minimized_h: MinimizedHashType,
    policy: BadCharPolicy,
    is_valid_hash: bool,
}

impl<'a> Digester<'a> {
    /// Create a cursor over `seq`, positioned on the first valid k-mer at
    /// or after `start`.
    ///
    /// # Errors
    ///
    /// [`DigestError::BadConstruction`] if `k < 4` or `start >= seq.len()`.
    pub fn new(
        seq: &'a [u8],
        k: usize,
        start: usize,
        minimized_h: MinimizedHashType,
        policy: BadCharPolicy,
    ) -> Result<Self> {
        if k < MIN_K || start >= seq.len() {
            return Err(DigestError::BadConstruction);
        }
        let mut dig = Self {
            seq,
            offset: 0,
            start,
            end: start + k,
            chash: 0,
            fhash: 0,
            rhash: 0,
            k,
            c_outs: VecDeque::with_capacity(k),
            minimized_h,
            policy,
            is_valid_hash: false,
        };
        dig.init_hash();
        Ok(dig)
    }

    /// Whether the three hashes currently describe a real k-mer.
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.is_valid_hash
    }

    /// Absolute start position of the current k-mer across all appended
    /// sequences.
    #[inline(always)]
    pub fn pos(&self) -> usize {
        self.offset + self.start - self.c_outs.len()
    }

    /// Forward-strand hash of the current k-mer.
    #[inline(always)]
    pub fn fhash(&self) -> u64 {
        self.fhash
    }

    /// Reverse-complement hash of the current k-mer.
    #[inline(always)]
    pub fn rhash(&self) -> u64 {
        self.rhash
    }

    /// Canonical hash of the current k-mer.
    #[inline(always)]
    pub fn chash(&self) -> u64 {
        self.chash
    }

    /// The k-mer length.
    #[inline(always)]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Length of the current backing slice.
    #[inline(always)]
    pub fn seq_len(&self) -> usize {
        self.seq.len()
    }

    /// The hash selected for minimization.
    #[inline(always)]
    pub fn minimized(&self) -> MinimizedHashType {
        self.minimized_h
    }

    /// The non-ACGT policy.
    #[inline(always)]
    pub fn policy(&self) -> BadCharPolicy {
        self.policy
    }

    /// The current backing slice.
    #[inline(always)]
    pub fn sequence(&self) -> &'a [u8] {
        self.seq
    }

    /// The hash being minimized, projected per [`MinimizedHashType`].
    #[inline(always)]
    pub fn minimized_hash(&self) -> u64 {
        match self.minimized_h {
            MinimizedHashType::Canon => self.chash,
            MinimizedHashType::Forward => self.fhash,
            MinimizedHashType::Reverse => self.rhash,
        }
    }

    /// Advance one base. Returns true iff a new valid k-mer was produced.
    ///
    /// Amortized O(1); a skip over a non-ACGT character costs O(k) to
    /// reinitialize past it.
    pub fn roll_one(&mut self) -> bool {
        match self.policy {
            BadCharPolicy::SkipOver => self.roll_one_skip_over(),
            BadCharPolicy::WriteOver => self.roll_one_write_over(),
        }
    }

    /// Discard all state and restart on a fresh slice, as if newly
    /// constructed.
    ///
    /// # Errors
    ///
    /// [`DigestError::BadConstruction`] if `start >= seq.len()`.
    pub fn new_seq(&mut self, seq: &'a [u8], start: usize) -> Result<()> {
        self.seq = seq;
        self.offset = 0;
        self.start = start;
        self.end = start + self.k;
        self.is_valid_hash = false;
        if start >= seq.len() {
            return Err(DigestError::BadConstruction);
        }
        self.init_hash();
        Ok(())
    }

    /// Switch to `seq` as if it were concatenated onto the end of the
    /// current sequence, preserving up to k−1 trailing characters so that
    /// rolling continues seamlessly across the boundary.
    ///
    /// # Errors
    ///
    /// [`DigestError::NotRolledTillEnd`] if the cursor has not consumed the
    /// current slice.
    pub fn append_seq(&mut self, seq: &'a [u8]) -> Result<()> {
        match self.policy {
            BadCharPolicy::SkipOver => self.append_seq_skip_over(seq),
            BadCharPolicy::WriteOver => self.append_seq_write_over(seq),
        }
    }

    fn set_base_hashes(&mut self, window: &[u8]) {
        self.fhash = nthash::base_forward_hash(window, self.k);
        self.rhash = nthash::base_reverse_hash(window, self.k);
        self.chash = nthash::canonical(self.fhash, self.rhash);
        self.is_valid_hash = true;
    }

    fn init_hash(&mut self) -> bool {
        match self.policy {
            BadCharPolicy::SkipOver => self.init_hash_skip_over(),
            BadCharPolicy::WriteOver => self.init_hash_write_over(),
        }
    }

    // Scan forward for the first window free of bad characters; each bad
    // character restarts the window just past it.
    fn init_hash_skip_over(&mut self) -> bool {
        self.c_outs.clear();
        while self.end <= self.seq.len() {
            let window = &self.seq[self.start..self.end];
            if let Some(i) = window.iter().position(|&b| !is_actg(b)) {
                self.start += i + 1;
                self.end = self.start + self.k;
                continue;
            }
            let window = &self.seq[self.start..self.end];
            self.fhash = nthash::base_forward_hash(window, self.k);
            self.rhash = nthash::base_reverse_hash(window, self.k);
            self.chash = nthash::canonical(self.fhash, self.rhash);
            self.is_valid_hash = true;
            return true;
        }
        self.is_valid_hash = false;
        false
    }

    // Write-over never skips; the only failure is running out of sequence.
    fn init_hash_write_over(&mut self) -> bool {
        self.c_outs.clear();
        if self.end > self.seq.len() {
            self.is_valid_hash = false;
            return false;
        }
        let window: Vec<u8> = self.seq[self.start..self.end]
            .iter()
            .map(|&b| if is_actg(b) { b } else { b'A' })
            .collect();
        self.set_base_hashes(&window);
        true
    }

    fn roll_one_skip_over(&mut self) -> bool {
        if !self.is_valid_hash {
            return false;
        }
        if self.end >= self.seq.len() {
            self.is_valid_hash = false;
            return false;
        }
        let in_char = self.seq[self.end];
        if let Some(&out_char) = self.c_outs.front() {
            if is_actg(in_char) {
                self.fhash = nthash::next_forward_hash(self.fhash, self.k, out_char, in_char);
                self.rhash = nthash::next_reverse_hash(self.rhash, self.k, out_char, in_char);
                self.c_outs.pop_front();
                self.end += 1;
                self.chash = nthash::canonical(self.fhash, self.rhash);
                true
            } else {
                // the carry spans at most k-1 characters, all before `end`,
                // so jumping past the bad character invalidates all of it
                self.c_outs.clear();
                self.start = self.end + 1;
                self.end = self.start + self.k;
                self.init_hash()
            }
        } else if is_actg(in_char) {
            let out_char = self.seq[self.start];
            self.fhash = nthash::next_forward_hash(self.fhash, self.k, out_char, in_char);
            self.rhash = nthash::next_reverse_hash(self.rhash, self.k, out_char, in_char);
            self.start += 1;
            self.end += 1;
            self.chash = nthash::canonical(self.fhash, self.rhash);
            true
        } else {
            self.start = self.end + 1;
            self.end = self.start + self.k;
            self.init_hash()
        }
    }

    fn roll_one_write_over(&mut self) -> bool {
        if !self.is_valid_hash {
            return false;
        }
        if self.end >= self.seq.len() {
            self.is_valid_hash = false;
            return false;
        }
        let next = self.seq[self.end];
        let in_char = if is_actg(next) { next } else { b'A' };
        if let Some(&out_char) = self.c_outs.front() {
            self.fhash = nthash::next_forward_hash(self.fhash, self.k, out_char, in_char);
            self.rhash = nthash::next_reverse_hash(self.rhash, self.k, out_char, in_char);
            self.c_outs.pop_front();
            self.end += 1;
        } else {
            let cur = self.seq[self.start];
            let out_char = if is_actg(cur) { cur } else { b'A' };
            self.fhash = nthash::next_forward_hash(self.fhash, self.k, out_char, in_char);
            self.rhash = nthash::next_reverse_hash(self.rhash, self.k, out_char, in_char);
            self.start += 1;
            self.end += 1;
        }
        self.chash = nthash::canonical(self.fhash, self.rhash);
        true
    }

    fn append_seq_skip_over(&mut self, seq: &'a [u8]) -> Result<()> {
        if self.end < self.seq.len() {
            return Err(DigestError::NotRolledTillEnd);
        }
        self.offset += self.seq.len();

        // A previous append may have left the cursor sitting on a hash
        // built from the carry. The next roll would have consumed the carry
        // front, so consume it now; if that append never produced a hash
        // (carry stayed short of k), the front is still needed.
        if (self.start != self.end || self.c_outs.len() == self.k) && !self.c_outs.is_empty() {
            self.c_outs.pop_front();
        }

        // Walk the tail of the old slice right-to-left, collecting up to
        // k-1 outgoing characters; a bad character cuts the carry short.
        let mut tail: Vec<u8> = Vec::new();
        if !self.seq.is_empty() {
            let mut ind = self.seq.len() - 1;
            while tail.len() + self.c_outs.len() < self.k - 1 && ind >= self.start {
                let b = self.seq[ind];
                if !is_actg(b) {
                    break;
                }
                tail.push(b);
                if ind == 0 {
                    break;
                }
                ind -= 1;
            }
        }
        for &b in tail.iter().rev() {
            self.c_outs.push_back(b);
        }

        // Top the carry up to a full k-mer from the head of the new slice.
        self.start = 0;
        self.end = 0;
        let mut ind = 0;
        while self.c_outs.len() < self.k && ind < seq.len() {
            let b = seq[ind];
            if !is_actg(b) {
                // the carry cannot cross a bad character; restart cleanly
                // on the new slice just past it
                self.start = ind + 1;
                self.end = self.start + self.k;
                self.seq = seq;
                self.c_outs.clear();
                self.init_hash();
                return Ok(());
            }
            self.c_outs.push_back(b);
            ind += 1;
            self.start += 1;
            self.end += 1;
        }

        if self.c_outs.len() == self.k {
            let window: Vec<u8> = self.c_outs.iter().copied().collect();
            self.set_base_hashes(&window);
        }
        self.seq = seq;
        Ok(())
    }

    fn append_seq_write_over(&mut self, seq: &'a [u8]) -> Result<()> {
        if self.end < self.seq.len() {
            return Err(DigestError::NotRolledTillEnd);
        }
        self.offset += self.seq.len();

        if (self.start != self.end || self.c_outs.len() == self.k) && !self.c_outs.is_empty() {
            self.c_outs.pop_front();
        }

        let mut tail: Vec<u8> = Vec::new();
        if !self.seq.is_empty() {
            let mut ind = self.seq.len() - 1;
            while tail.len() + self.c_outs.len() < self.k - 1 && ind >= self.start {
                let b = self.seq[ind];
                tail.push(if is_actg(b) { b } else { b'A' });
                if ind == 0 {
                    break;
                }
                ind -= 1;
            }
        }
        for &b in tail.iter().rev() {
            self.c_outs.push_back(b);
        }

        self.start = 0;
        self.end = 0;
        let mut ind = 0;
        while self.c_outs.len() < self.k && ind < seq.len() {
            let b = seq[ind];
            self.c_outs.push_back(if is_actg(b) { b } else { b'A' });
            ind += 1;
            self.start += 1;
            self.end += 1;
        }

        if self.c_outs.len() == self.k {
            let window: Vec<u8> = self.c_outs.iter().copied().collect();
            self.set_base_hashes(&window);
        }
        self.seq = seq;
        Ok(())
    }
}
