//! Reed-Solomon error correction codewords over GF(2^8/0x11D).

use std::sync::OnceLock;

use crate::error::{QrError, Result};

/// Largest block ECC length that occurs in any version/level combination.
const MAX_TABLE_DEGREE: usize = 30;

static GENERATOR_CACHE: OnceLock<Vec<ReedSolomonGenerator>> = OnceLock::new();

/// Computes the ECC codewords of data blocks for one fixed divisor degree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReedSolomonGenerator {
    /// Coefficients of the divisor polynomial, stored from highest to lowest power,
    /// excluding the leading term which is always 1.
    /// For example the polynomial x^3 + 255x^2 + 8x + 93 is stored as [255, 8, 93].
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    /// Builds the generator for the given degree, which must be in [1, 255].
    pub fn new(degree: usize) -> Result<Self> {
        if !(1..=255).contains(&degree) {
            return Err(QrError::DegreeOutOfRange(degree));
        }
        // Start off with the monomial x^0
        let mut divisor = vec![0u8; degree - 1];
        divisor.push(1);

        // Compute the product polynomial (x - r^0) * (x - r^1) * ... * (x - r^{degree-1}),
        // drop the highest monomial term which is always 1x^degree.
        // Note that r = 0x02, which is a generator element of this field GF(2^8/0x11D).
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = Self::multiply(divisor[j], root);
                if j + 1 < divisor.len() {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = Self::multiply(root, 0x02);
        }
        Ok(Self { divisor })
    }

    /// Returns the shared generator for a block ECC length used by the capacity tables.
    pub(crate) fn cached(degree: usize) -> Result<&'static Self> {
        let cache = GENERATOR_CACHE.get_or_init(|| {
            (1..=MAX_TABLE_DEGREE)
                .filter_map(|d| Self::new(d).ok())
                .collect()
        });
        cache
            .get(degree.wrapping_sub(1))
            .ok_or(QrError::DegreeOutOfRange(degree))
    }

    pub fn degree(&self) -> usize {
        self.divisor.len()
    }

    /// Returns the remainder of `data` (as a polynomial, first byte highest power) divided
    /// by the divisor. The result always has exactly [`degree`](Self::degree) bytes.
    pub fn remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        for b in data {
            let factor: u8 = b ^ result[0];
            result.copy_within(1.., 0);
            if let Some(last) = result.last_mut() {
                *last = 0;
            }
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= Self::multiply(y, factor);
            }
        }
        result
    }

    /// Returns the product of the two given field elements modulo GF(2^8/0x11D).
    /// All inputs are valid.
    pub fn multiply(x: u8, y: u8) -> u8 {
        // Russian peasant multiplication
        let mut z: u8 = 0;
        for i in (0..8).rev() {
            z = (z << 1) ^ ((z >> 7) * 0x1d);
            z ^= ((y >> i) & 1) * x;
        }
        z
    }
}
