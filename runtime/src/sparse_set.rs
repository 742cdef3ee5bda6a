//! A fixed-capacity sparse set used to deduplicate threads by instruction
//! index within a single step of the virtual machine.

/// A set of `usize` values drawn from `0..capacity`, with constant time
/// insertion, lookup and clearing.
pub struct SparseSet {
    dense: Vec<usize>,
    sparse: Box<[usize]>,
}

impl SparseSet {
    /// Initializes a new set that can hold values in the range of
    /// `0..capacity`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            dense: Vec::with_capacity(capacity),
            sparse: vec![0; capacity].into_boxed_slice(),
        }
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns the largest value the set can hold, exclusive.
    pub fn capacity(&self) -> usize {
        self.sparse.len()
    }

    /// Inserts a value into the set, returning `true` if it wasn't already
    /// a member.
    ///
    /// Values outside of the set's capacity are never inserted.
    pub fn insert(&mut self, val: usize) -> bool {
        if val >= self.capacity() || self.contains(val) {
            return false;
        }

        self.sparse[val] = self.dense.len();
        self.dense.push(val);
        true
    }

    /// Returns `true` if the set contains a value.
    pub fn contains(&self, val: usize) -> bool {
        self.sparse
            .get(val)
            .and_then(|&dense_idx| self.dense.get(dense_idx))
            .map_or(false, |&member| member == val)
    }

    /// Clears the set, removing all values.
    pub fn clear(&mut self) {
        self.dense.clear();
    }
}

impl core::fmt::Debug for SparseSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SparseSet({:?})", &self.dense)
    }
}
