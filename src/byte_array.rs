use crate::mem::{AllocError, PreFaultBox};
use crate::storage::BoolStorage;

/// One boolean per byte, stored as 0 or 1.
pub struct ByteArray {
    pub data: PreFaultBox<u8>,
}

impl ByteArray {
    pub fn new(size: usize) -> Result<Self, AllocError> {
        Ok(Self {
            data: PreFaultBox::new_zeroed(size)?,
        })
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn count_ones(&self) -> usize {
        self.data.iter().filter(|&&b| b != 0).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.data.iter().map(|&b| b != 0)
    }
}

impl BoolStorage for ByteArray {
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    fn get(&self, index: usize) -> bool {
        self.data[index] != 0
    }

    #[inline(always)]
    fn set(&mut self, index: usize, value: bool) {
        self.data[index] = value as u8;
    }

    #[inline(always)]
    fn flip(&mut self, index: usize) {
        let byte = &mut self.data[index];
        *byte = 1 - *byte;
    }
}
