//! Mod-minimizer engine.
//!
//! Emits every k-mer whose projected 32-bit hash is congruent to a target
//! value modulo `m`. Stateless beyond the cursor, so density is controlled
//! purely by the modulus.

use crate::digester::{BadCharPolicy, Digester, MinimizedHashType};
use crate::{DigestError, Result};

/// K-mer selector by modular congruence of the projected hash.
#[derive(Debug, Clone)]
pub struct ModMin<'a> {
    digester: Digester<'a>,
    modulus: u32,
    congruence: u32,
}

impl<'a> ModMin<'a> {
    /// Create a mod-minimizer over `seq`.
    ///
    /// # Errors
    ///
    /// [`DigestError::BadMod`] if `congruence >= modulus`;
    /// [`DigestError::BadConstruction`] for invalid `k` or `start`.
    pub fn new(
        seq: &'a [u8],
        k: usize,
        modulus: u32,
        congruence: u32,
        start: usize,
        minimized_h: MinimizedHashType,
        policy: BadCharPolicy,
    ) -> Result<Self> {
        if congruence >= modulus {
            return Err(DigestError::BadMod);
        }
        Ok(Self {
            digester: Digester::new(seq, k, start, minimized_h, policy)?,
            modulus,
            congruence,
        })
    }

    /// Collect positions of matching k-mers into `out` until the vector
    /// holds `amount` entries or the sequence is exhausted.
    ///
    /// The cursor stays where it stopped, so a later call (or an
    /// `append_seq` in between) resumes seamlessly.
    pub fn roll_minimizer(&mut self, amount: usize, out: &mut Vec<u32>) {
        while self.digester.is_valid() && out.len() < amount {
            let hash = self.digester.minimized_hash() as u32;
            if hash % self.modulus == self.congruence {
                out.push(self.digester.pos() as u32);
            }
            self.digester.roll_one();
        }
    }

    /// Like [`ModMin::roll_minimizer`], collecting (position, hash) pairs.
    pub fn roll_minimizer_with_hashes(&mut self, amount: usize, out: &mut Vec<(u32, u32)>) {
        while self.digester.is_valid() && out.len() < amount {
            let hash = self.digester.minimized_hash() as u32;
            if hash % self.modulus == self.congruence {
                out.push((self.digester.pos() as u32, hash));
            }
            self.digester.roll_one();
        }
    }

    /// The modulus.
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// The congruence class being selected.
    pub fn congruence(&self) -> u32 {
        self.congruence
    }

    /// The underlying cursor.
    pub fn digester(&self) -> &Digester<'a> {
        &self.digester
    }

    /// Restart on a fresh sequence; see [`Digester::new_seq`].
    pub fn new_seq(&mut self, seq: &'a [u8], start: usize) -> Result<()> {
        self.digester.new_seq(seq, start)
    }

    /// Continue onto a logically concatenated sequence; see
    /// [`Digester::append_seq`].
    pub fn append_seq(&mut self, seq: &'a [u8]) -> Result<()> {
        self.digester.append_seq(seq)
    }
}
