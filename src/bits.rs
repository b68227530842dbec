/// An appendable sequence of bits (0s and 1s).
///
/// Mainly used by [`QrSegment`](crate::segment::QrSegment) and the codeword assembly in
/// [`QrCode`](crate::qrcode::QrCode). Bits are stored one per element, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBuffer(pub(crate) Vec<bool>);

impl BitBuffer {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self(Vec::with_capacity(bits))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The bits appended so far, in order.
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    /// Appends the given number of low-order bits of the given value to this buffer,
    /// most significant bit first.
    ///
    /// Requires `len <= 31` and `val < 2^len`.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        debug_assert!(len <= 31 && val >> len == 0, "Value out of range");
        self.0.extend((0..len).rev().map(|i| get_bit(val, i)));
    }

    /// Packs the bits into big-endian bytes. The final byte is zero-padded on the right.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = vec![0u8; (self.0.len() + 7) / 8];
        for (i, &bit) in self.0.iter().enumerate() {
            result[i >> 3] |= u8::from(bit) << (7 - (i & 7));
        }
        result
    }
}

impl Extend<bool> for BitBuffer {
    fn extend<T: IntoIterator<Item = bool>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

/// Returns true iff the i'th bit of x is set to 1.
pub(crate) fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_bits_msb_first() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0b101, 3);
        bb.append_bits(0, 0);
        bb.append_bits(1, 2);
        assert_eq!(bb.bits(), [true, false, true, false, true]);
        assert_eq!(bb.len(), 5);
    }

    #[test]
    fn to_bytes_pads_last_byte() {
        let mut bb = BitBuffer::new();
        bb.append_bits(0xEC, 8);
        bb.append_bits(0b1, 1);
        assert_eq!(bb.to_bytes(), vec![0xEC, 0x80]);
    }
}
