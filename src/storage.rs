/// Fixed-length sequence of booleans addressed by index.
///
/// Out-of-range indices panic, like slice indexing.
pub trait BoolStorage {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> bool;

    fn set(&mut self, index: usize, value: bool);

    /// Negates the slot in place.
    #[inline(always)]
    fn flip(&mut self, index: usize) {
        let value = self.get(index);
        self.set(index, !value);
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_vec(&self) -> Vec<bool> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }
}
