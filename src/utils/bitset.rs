//! A dense bit vector for set operations over small integer ids.
//!
//! Liveness and the other dataflow analyses track sets of variables identified by
//! their interned indices; this module provides the compact set representation
//! those analyses iterate to a fixpoint. All in-place operations report whether
//! they changed the receiver, which is what drives worklist convergence.
//!
//! # Example
//!
//! ```rust,ignore
//! use unssa::utils::BitSet;
//!
//! let mut live = BitSet::new(64);
//! live.insert(3);
//! live.insert(17);
//!
//! assert!(live.contains(17));
//! assert_eq!(live.count(), 2);
//! ```

/// A fixed-capacity bit vector.
///
/// Capacity is set at construction and never grows; indexing past it is a
/// programming error and panics. Sets used together (union, intersection,
/// difference) must share the same capacity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    /// The bits, 64 per word.
    words: Vec<u64>,
    /// The number of addressable bits.
    len: usize,
}

impl BitSet {
    /// Creates an empty bit set able to hold `capacity` bits.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
            len: capacity,
        }
    }

    /// Creates a bit set with every bit set.
    #[must_use]
    pub fn full(capacity: usize) -> Self {
        let mut set = Self::new(capacity);
        set.fill();
        set
    }

    /// Returns the capacity of this bit set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bits are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Sets the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn insert(&mut self, index: usize) {
        assert!(index < self.len, "index out of bounds");
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    /// Clears the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn remove(&mut self, index: usize) {
        assert!(index < self.len, "index out of bounds");
        self.words[index / 64] &= !(1u64 << (index % 64));
    }

    /// Returns `true` if the bit at `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        assert!(index < self.len, "index out of bounds");
        (self.words[index / 64] & (1u64 << (index % 64))) != 0
    }

    /// Returns the number of set bits.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Clears all bits.
    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
    }

    /// Sets all bits.
    pub fn fill(&mut self) {
        for word in &mut self.words {
            *word = u64::MAX;
        }
        // Excess bits in the last word must stay clear
        if !self.len.is_multiple_of(64) {
            if let Some(last) = self.words.last_mut() {
                *last = (1u64 << (self.len % 64)) - 1;
            }
        }
    }

    /// In-place union with `other`. Returns `true` if `self` changed.
    ///
    /// # Panics
    ///
    /// Panics if the sets have different capacities.
    pub fn union_with(&mut self, other: &Self) -> bool {
        assert_eq!(self.len, other.len, "bit sets must have same length");
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            let old = *a;
            *a |= *b;
            changed |= old != *a;
        }
        changed
    }

    /// In-place intersection with `other`. Returns `true` if `self` changed.
    ///
    /// # Panics
    ///
    /// Panics if the sets have different capacities.
    pub fn intersect_with(&mut self, other: &Self) -> bool {
        assert_eq!(self.len, other.len, "bit sets must have same length");
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            let old = *a;
            *a &= *b;
            changed |= old != *a;
        }
        changed
    }

    /// In-place difference: clears every bit of `self` that is set in `other`.
    /// Returns `true` if `self` changed.
    ///
    /// # Panics
    ///
    /// Panics if the sets have different capacities.
    pub fn difference_with(&mut self, other: &Self) -> bool {
        assert_eq!(self.len, other.len, "bit sets must have same length");
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            let old = *a;
            *a &= !*b;
            changed |= old != *a;
        }
        changed
    }

    /// Returns an iterator over the indices of set bits, ascending.
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            set: self,
            word_idx: 0,
            bit_idx: 0,
        }
    }
}

impl std::fmt::Debug for BitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for i in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{i}")?;
            first = false;
        }
        write!(f, "}}")
    }
}

/// Iterator over the set bits in a [`BitSet`].
pub struct BitSetIter<'a> {
    set: &'a BitSet,
    word_idx: usize,
    bit_idx: usize,
}

impl Iterator for BitSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.word_idx < self.set.words.len() {
            let word = self.set.words[self.word_idx];
            while self.bit_idx < 64 {
                let idx = self.word_idx * 64 + self.bit_idx;
                if idx >= self.set.len {
                    return None;
                }
                self.bit_idx += 1;
                if (word & (1u64 << (self.bit_idx - 1))) != 0 {
                    return Some(idx);
                }
            }
            self.word_idx += 1;
            self.bit_idx = 0;
        }
        None
    }
}
