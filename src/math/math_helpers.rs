use crate::error::MathError;
use alloy_primitives::{U256, U512};

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

#[inline(always)]
#[cold]
fn cold() {}

/// Branch hint for error paths: marks the taken branch as cold.
#[inline(always)]
pub(crate) fn unlikely(b: bool) -> bool {
    if b {
        cold();
    }
    b
}

/// Zero-extends a 256-bit value into 512 bits.
#[inline(always)]
pub fn widen(x: U256) -> U512 {
    let l = x.as_limbs();
    U512::from_limbs([l[0], l[1], l[2], l[3], 0, 0, 0, 0])
}

/// Narrows a 512-bit intermediate back to 256 bits, failing with
/// `MathError::Overflow` when any of the upper limbs is set.
#[inline(always)]
pub fn narrow(x: U512) -> Result<U256, MathError> {
    let l = x.as_limbs();
    if unlikely(l[4..].iter().any(|&limb| limb != 0)) {
        return Err(MathError::Overflow);
    }
    Ok(U256::from_limbs([l[0], l[1], l[2], l[3]]))
}

/// Computes `floor(a * b / denominator)` with a full 512-bit product,
/// returning a `MathError` on division by zero or when the quotient does
/// not fit in 256 bits.
#[inline(always)]
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if unlikely(denominator.is_zero()) {
        return Err(MathError::DivisionByZero);
    }

    // 256 x 256 bits always fits in 512 bits
    let product = widen(a) * widen(b);
    narrow(product / widen(denominator))
}

/// `10^exp` as a `U256`, or `MathError::Overflow` past 10^77.
#[inline]
pub fn pow10(exp: u32) -> Result<U256, MathError> {
    U256::from(10u8)
        .checked_pow(U256::from(exp))
        .ok_or(MathError::Overflow)
}

/// Lossy conversion used only on the human-facing side of the math.
pub fn u256_to_f64(x: U256) -> f64 {
    x.as_limbs()
        .iter()
        .rev()
        .fold(0.0_f64, |acc, &limb| acc * TWO_POW_64 + limb as f64)
}
