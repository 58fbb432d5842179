//! Segmented vectors: append-only growth with stable element addresses.
//!
//! [`SegmentedVec`] improves over `Vec` for the registry-scale tables in
//! this crate:
//!
//! 1. Growing never relocates existing elements, so references and indices
//!    handed out earlier stay valid forever.
//! 2. There is no doubling spike: overallocation is additive (one segment),
//!    not multiplicative.
//! 3. Data is partitioned into fixed-size chunks, which behaves better on
//!    fragmented heaps.
//!
//! The price is one extra indirection per access. Segment size is derived
//! from a byte budget ([`SEGMENT_BYTES`]) so that small elements share
//! cache-friendly chunks while large elements still get at least one slot
//! per segment.
//!
//! [`SegmentedArrayVec`] is the variant for fixed-length records whose
//! length is only known at runtime (packed states): each record occupies
//! `elements_per_array` consecutive elements inside a segment sized to an
//! integer number of records.

/// Byte budget per segment.
pub const SEGMENT_BYTES: usize = 8192;

const fn elements_per_segment<T>() -> usize {
    let per = SEGMENT_BYTES / std::mem::size_of::<T>();
    if per >= 1 {
        per
    } else {
        1
    }
}

/// A vector-like container that grows segment by segment.
///
/// Indices are stable and never reused; popping the tail keeps the drained
/// segment allocated for the next push.
#[derive(Debug)]
pub struct SegmentedVec<T> {
    segments: Vec<Vec<T>>,
    len: usize,
}

impl<T> SegmentedVec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            len: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn segment_of(index: usize) -> usize {
        index / elements_per_segment::<T>()
    }

    fn offset_of(index: usize) -> usize {
        index % elements_per_segment::<T>()
    }

    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn get(&self, index: usize) -> &T {
        assert!(index < self.len, "index {index} out of bounds ({})", self.len);
        &self.segments[Self::segment_of(index)][Self::offset_of(index)]
    }

    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        assert!(index < self.len, "index {index} out of bounds ({})", self.len);
        &mut self.segments[Self::segment_of(index)][Self::offset_of(index)]
    }

    pub fn push(&mut self, value: T) {
        let segment = Self::segment_of(self.len);
        if segment == self.segments.len() {
            debug_assert_eq!(Self::offset_of(self.len), 0);
            self.segments
                .push(Vec::with_capacity(elements_per_segment::<T>()));
        }
        self.segments[segment].push(value);
        self.len += 1;
    }

    /// Remove and return the last element.
    ///
    /// A segment drained by popping is kept allocated so a subsequent push
    /// does not reallocate.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.segments[Self::segment_of(self.len)].pop()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.segments.iter().flatten()
    }
}

impl<T: Clone> SegmentedVec<T> {
    /// Grow or shrink to `new_len`, filling with clones of `value`.
    pub fn resize(&mut self, new_len: usize, value: T) {
        while self.len > new_len {
            let _ = self.pop();
        }
        while self.len < new_len {
            self.push(value.clone());
        }
    }
}

impl<T> Default for SegmentedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Index<usize> for SegmentedVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.get(index)
    }
}

impl<T> std::ops::IndexMut<usize> for SegmentedVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.get_mut(index)
    }
}

/// Compact storage for many fixed-length arrays of runtime-known length.
///
/// Zero-length records are not supported.
#[derive(Debug)]
pub struct SegmentedArrayVec<T> {
    segments: Vec<Vec<T>>,
    elements_per_array: usize,
    arrays_per_segment: usize,
    len: usize,
}

impl<T: Clone> SegmentedArrayVec<T> {
    /// # Panics
    ///
    /// Panics if `elements_per_array` is zero.
    #[must_use]
    pub fn new(elements_per_array: usize) -> Self {
        assert!(elements_per_array > 0, "zero-length records not supported");
        let arrays_per_segment =
            (SEGMENT_BYTES / (elements_per_array * std::mem::size_of::<T>())).max(1);
        Self {
            segments: Vec::new(),
            elements_per_array,
            arrays_per_segment,
            len: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn elements_per_array(&self) -> usize {
        self.elements_per_array
    }

    fn segment_of(&self, index: usize) -> usize {
        index / self.arrays_per_segment
    }

    fn offset_of(&self, index: usize) -> usize {
        (index % self.arrays_per_segment) * self.elements_per_array
    }

    /// The record at `index`, as a slice of length `elements_per_array`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn get(&self, index: usize) -> &[T] {
        assert!(index < self.len, "index {index} out of bounds ({})", self.len);
        let offset = self.offset_of(index);
        &self.segments[self.segment_of(index)][offset..offset + self.elements_per_array]
    }

    /// Append a record; `data` must have exactly `elements_per_array`
    /// elements.
    ///
    /// # Panics
    ///
    /// Panics on a record-length mismatch.
    pub fn push(&mut self, data: &[T]) {
        assert_eq!(
            data.len(),
            self.elements_per_array,
            "record length mismatch"
        );
        let segment = self.segment_of(self.len);
        if segment == self.segments.len() {
            debug_assert_eq!(self.offset_of(self.len), 0);
            self.segments.push(Vec::with_capacity(
                self.arrays_per_segment * self.elements_per_array,
            ));
        }
        self.segments[segment].extend_from_slice(data);
        self.len += 1;
    }

    /// Drop the last record. The drained segment stays allocated.
    pub fn pop(&mut self) {
        assert!(self.len > 0, "pop from empty SegmentedArrayVec");
        self.len -= 1;
        let segment = self.segment_of(self.len);
        let new_segment_len = self.offset_of(self.len);
        self.segments[segment].truncate(new_segment_len);
    }
}
