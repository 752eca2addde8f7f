use crate::bitset::{get_bit, modify_bit, split_index, words_for};
use crate::mem::{AllocError, PreFaultBox};
use crate::storage::BoolStorage;

/// One boolean per bit, 64 to a word, lowest bit first.
pub struct PackedBitArray {
    size: usize,
    data: PreFaultBox<u64>,
}

impl PackedBitArray {
    /// All-false array of `size` bits on pre-faulted words.
    pub fn new(size: usize) -> Result<Self, AllocError> {
        Ok(Self {
            size,
            data: PreFaultBox::new_zeroed(words_for(size))?,
        })
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn count_ones(&self) -> usize {
        // bits past `size` are never set
        self.data.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.size).map(|i| self.get(i))
    }

    #[inline(always)]
    fn check_bounds(&self, index: usize) {
        assert!(
            index < self.size,
            "bit index {index} out of range for length {}",
            self.size
        );
    }
}

impl BoolStorage for PackedBitArray {
    fn len(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn get(&self, index: usize) -> bool {
        self.check_bounds(index);
        let (word_idx, bit_idx) = split_index(index);
        // index < size, so word_idx < words_for(size) == data.len()
        get_bit(unsafe { *self.data.get_unchecked(word_idx) }, bit_idx)
    }

    #[inline(always)]
    fn set(&mut self, index: usize, value: bool) {
        self.check_bounds(index);
        let (word_idx, bit_idx) = split_index(index);
        // in bounds, see `get`
        let word = unsafe { self.data.get_unchecked_mut(word_idx) };
        modify_bit(word, bit_idx, value);
    }

    #[inline(always)]
    fn flip(&mut self, index: usize) {
        self.check_bounds(index);
        let (word_idx, bit_idx) = split_index(index);
        // in bounds, see `get`
        let word = unsafe { self.data.get_unchecked_mut(word_idx) };
        let value = get_bit(*word, bit_idx);
        modify_bit(word, bit_idx, !value);
    }
}
