pub const WORD_BITS: usize = u64::BITS as usize;

/// Word holding bit `index` and the position of that bit inside it.
#[inline(always)]
pub const fn split_index(index: usize) -> (usize, u32) {
    (index / WORD_BITS, (index % WORD_BITS) as u32)
}

/// Number of words needed to hold `bits` bits.
pub const fn words_for(bits: usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

#[inline(always)]
pub fn get_bit(bitset: u64, idx: u32) -> bool {
    unsafe {
        std::hint::assert_unchecked(idx < u64::BITS);
    }

    (bitset >> idx) & 1 != 0
}

#[inline(always)]
pub fn modify_bit(bitset: &mut u64, idx: u32, value: bool) {
    unsafe {
        std::hint::assert_unchecked(idx < u64::BITS);
    }

    *bitset = (*bitset & !(1 << idx)) | ((value as u64) << idx);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modify_only_touches_one_bit() {
        let mut word = 0b1010_u64;
        modify_bit(&mut word, 0, true);
        assert_eq!(word, 0b1011);
        modify_bit(&mut word, 3, false);
        assert_eq!(word, 0b0011);
        modify_bit(&mut word, 63, true);
        assert!(get_bit(word, 63));
        assert!(get_bit(word, 1));
        assert!(!get_bit(word, 2));
    }

    #[test]
    fn index_split_is_lsb_first() {
        assert_eq!(split_index(0), (0, 0));
        assert_eq!(split_index(63), (0, 63));
        assert_eq!(split_index(64), (1, 0));
        assert_eq!(split_index(8095), (126, 31));
        assert_eq!(words_for(0), 0);
        assert_eq!(words_for(1), 1);
        assert_eq!(words_for(64), 1);
        assert_eq!(words_for(8096), 127);
    }
}
