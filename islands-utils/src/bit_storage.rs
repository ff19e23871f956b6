//! Packed integer storage.
//!
//! Matches vanilla's `SimpleBitStorage` layout: every `u64` holds
//! `64 / bits` values starting from the least significant bits, and a value
//! never spans two longs. Heightmaps and paletted containers store their data
//! this way, so an all-zero `BitStorage` is the canonical "empty" payload.

/// Returns `ceil(log2(value))`, with `ceil_log2(0) == 0` and `ceil_log2(1) == 0`.
#[inline]
#[must_use]
pub const fn ceil_log2(value: u32) -> u32 {
    if value <= 1 {
        0
    } else {
        u32::BITS - (value - 1).leading_zeros()
    }
}

/// A fixed size array of unsigned integers packed into `u64`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStorage {
    bits: u32,
    size: usize,
    mask: u64,
    values_per_long: usize,
    data: Box<[u64]>,
}

impl BitStorage {
    /// Creates a zero filled storage.
    ///
    /// # Panics
    /// Panics if `bits` is not in `1..=32`.
    #[must_use]
    pub fn new(bits: u32, size: usize) -> Self {
        assert!((1..=32).contains(&bits), "bits per entry must be in 1..=32, got {bits}");
        let values_per_long = 64 / bits as usize;
        let longs = size.div_ceil(values_per_long);
        Self {
            bits,
            size,
            mask: (1u64 << bits) - 1,
            values_per_long,
            data: vec![0; longs].into_boxed_slice(),
        }
    }

    /// Number of bits used by each entry.
    #[inline]
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn locate(&self, index: usize) -> (usize, u32) {
        assert!(index < self.size, "index {index} out of bounds for size {}", self.size);
        let cell = index / self.values_per_long;
        let shift = ((index - cell * self.values_per_long) as u32) * self.bits;
        (cell, shift)
    }

    /// Reads the entry at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> u32 {
        let (cell, shift) = self.locate(index);
        ((self.data[cell] >> shift) & self.mask) as u32
    }

    /// Writes the entry at `index`. Bits above the entry width are discarded.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: u32) {
        let (cell, shift) = self.locate(index);
        let value = u64::from(value) & self.mask;
        self.data[cell] = (self.data[cell] & !(self.mask << shift)) | (value << shift);
    }

    /// Writes the entry at `index` and returns the previous value.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn get_and_set(&mut self, index: usize, value: u32) -> u32 {
        let old = self.get(index);
        self.set(index, value);
        old
    }

    /// Iterates over all entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.size).map(|i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(0), 0);
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(257), 9);
        assert_eq!(ceil_log2(385), 9);
        assert_eq!(ceil_log2(512), 9);
        assert_eq!(ceil_log2(513), 10);
    }

    #[test]
    fn test_heightmap_layout() {
        // 9 bit entries: 7 per long, 256 columns need 37 longs.
        let storage = BitStorage::new(9, 256);
        assert_eq!(storage.data.len(), 37);
        assert!(storage.data.iter().all(|&long| long == 0));
    }

    #[test]
    fn test_values_do_not_straddle_longs() {
        let mut storage = BitStorage::new(9, 256);
        storage.set(6, 511);
        storage.set(7, 1);
        assert_eq!(storage.data[0], 511 << 54);
        assert_eq!(storage.data[1], 1);
        assert_eq!(storage.get(6), 511);
        assert_eq!(storage.get(7), 1);
    }

    #[test]
    fn test_set_masks_value() {
        let mut storage = BitStorage::new(4, 16);
        storage.set(3, 0x1F);
        assert_eq!(storage.get(3), 0xF);
        assert_eq!(storage.get_and_set(3, 2), 0xF);
        assert_eq!(storage.get(3), 2);
    }
}
