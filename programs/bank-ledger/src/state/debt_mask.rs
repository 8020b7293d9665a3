//! Active-debt bitmask
//!
//! One bit per bank index. Bit `i` is set iff the position holds a nonzero
//! debt share in the bank whose index is `i`, so read paths visit only the
//! banks a position actually owes, never all 256.

use anchor_lang::prelude::*;
use crate::constants::DEBT_MASK_WORDS;

/// 256-bit bitmask stored as four little-endian u64 words
#[zero_copy]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DebtMask {
    pub words: [u64; DEBT_MASK_WORDS],
}

impl DebtMask {
    #[inline]
    fn locate(index: u8) -> (usize, u64) {
        let index = index as usize;
        (index >> 6, 1u64 << (index & 63))
    }

    pub fn set(&mut self, index: u8) {
        let (w, bit) = Self::locate(index);
        self.words[w] |= bit;
    }

    pub fn clear(&mut self, index: u8) {
        let (w, bit) = Self::locate(index);
        self.words[w] &= !bit;
    }

    pub fn test(&self, index: u8) -> bool {
        let (w, bit) = Self::locate(index);
        self.words[w] & bit != 0
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Number of set bits (active debts)
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Set bit indices in ascending order.
    ///
    /// The iterator works on a copy of the words, so the stored mask can be
    /// enumerated again at any time.
    pub fn iter(&self) -> DebtMaskIter {
        DebtMaskIter {
            words: self.words,
            block: 0,
        }
    }
}

impl<'a> IntoIterator for &'a DebtMask {
    type Item = u8;
    type IntoIter = DebtMaskIter;

    fn into_iter(self) -> DebtMaskIter {
        self.iter()
    }
}

/// Ascending iterator over the set bits of a [`DebtMask`]
#[derive(Clone, Debug)]
pub struct DebtMaskIter {
    words: [u64; DEBT_MASK_WORDS],
    block: usize,
}

impl Iterator for DebtMaskIter {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        while self.block < DEBT_MASK_WORDS {
            let w = self.words[self.block];
            if w != 0 {
                let bit = w.trailing_zeros() as usize;
                self.words[self.block] = w & (w - 1); // clear lowest bit
                return Some((self.block * 64 + bit) as u8);
            }
            self.block += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining: usize = self.words[self.block.min(DEBT_MASK_WORDS)..]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DebtMaskIter {}
