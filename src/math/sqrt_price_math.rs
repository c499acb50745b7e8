use crate::math::math_helpers::{mul_div, narrow, u256_to_f64, unlikely, widen};
use crate::{
    Q96,
    error::{Error, MathError, StateError},
};
use alloy_primitives::{U256, U512};

/// Converts a Q64.96 sqrt price into a human-facing spot price of the
/// input token denominated in the output token.
///
/// `price = (sqrt_price_x96 / 2^96)^2 * 10^(decimals0 - decimals1)`, inverted
/// when token1 is the input. The exponent may be negative. This is the only
/// floating-point step of the quote and must not feed back into amounts.
pub fn sqrt_price_x96_to_price(
    sqrt_price_x96: U256,
    decimals0: u8,
    decimals1: u8,
    token0_is_input: bool,
) -> f64 {
    let sqrt_price = u256_to_f64(sqrt_price_x96) / u256_to_f64(Q96);
    let mut price = sqrt_price * sqrt_price;

    let decimal_adjustment = 10f64.powi(i32::from(decimals0) - i32::from(decimals1));
    price *= decimal_adjustment;

    if token0_is_input { price } else { 1.0 / price }
}

/// Next sqrt price after adding `amount_in` of token0, using the
/// constant-liquidity relation of the active range:
/// `sqrtP + amount * sqrtP^2 / (L * Q96)`.
pub fn get_next_sqrt_price_from_amount_0(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount_in: U256,
) -> Result<U256, Error> {
    if amount_in.is_zero() {
        return Ok(sqrt_p_x96);
    }

    let sqrt = widen(sqrt_p_x96);
    let numerator = widen(amount_in)
        .checked_mul(sqrt)
        .and_then(|n| n.checked_mul(sqrt))
        .ok_or(MathError::Overflow)?;
    // L < 2^128 and Q96 = 2^96, so the product always fits
    let denominator = U512::from(liquidity) * widen(Q96);

    let next = sqrt
        .checked_add(numerator / denominator)
        .ok_or(MathError::Overflow)?;
    Ok(narrow(next)?)
}

/// Next sqrt price after adding `amount_in` of token1:
/// `sqrtP - amount * Q96 / L`.
///
/// Fails with `StateError::PriceUnderflow` when `amount * Q96 > L * sqrtP`,
/// i.e. the input exceeds what the active range can absorb. A result of
/// exactly zero is reported as `StateError::MissingPriceState`.
pub fn get_next_sqrt_price_from_amount_1(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount_in: U256,
) -> Result<U256, Error> {
    let capacity = U512::from(liquidity) * widen(sqrt_p_x96);
    let demand = widen(amount_in) * widen(Q96);
    if unlikely(demand > capacity) {
        return Err(StateError::PriceUnderflow.into());
    }

    let quotient = mul_div(amount_in, Q96, U256::from(liquidity))?;
    let next = sqrt_p_x96
        .checked_sub(quotient)
        .ok_or(StateError::PriceUnderflow)?;

    if unlikely(next.is_zero()) {
        return Err(StateError::MissingPriceState.into());
    }
    Ok(next)
}

/// Computes the next sqrt price when swapping `amount_in` into the pool,
/// choosing the token0/token1 branch from `zero_for_one`.
pub fn get_next_sqrt_price_from_input(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, Error> {
    if unlikely(sqrt_p_x96.is_zero()) {
        return Err(StateError::SqrtPriceIsZero.into());
    }
    if unlikely(liquidity == 0) {
        return Err(StateError::LiquidityIsZero.into());
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount_0(sqrt_p_x96, liquidity, amount_in)
    } else {
        get_next_sqrt_price_from_amount_1(sqrt_p_x96, liquidity, amount_in)
    }
}

/// Raw output amount implied by moving the price from `sqrt_start_x96` to
/// `sqrt_next_x96` at constant liquidity.
///
/// - token0 in: `L * Q96 * (next - start) / (next * start)`
/// - token1 in: `L * (start - next) / Q96`
pub fn get_amount_out(
    sqrt_start_x96: U256,
    sqrt_next_x96: U256,
    liquidity: u128,
    zero_for_one: bool,
) -> Result<U256, Error> {
    if zero_for_one {
        let delta = sqrt_next_x96
            .checked_sub(sqrt_start_x96)
            .ok_or(MathError::Underflow)?;
        let denominator = widen(sqrt_next_x96)
            .checked_mul(widen(sqrt_start_x96))
            .ok_or(MathError::Overflow)?;
        if unlikely(denominator.is_zero()) {
            return Err(StateError::MissingPriceState.into());
        }
        let numerator = (U512::from(liquidity) * widen(Q96))
            .checked_mul(widen(delta))
            .ok_or(MathError::Overflow)?;
        Ok(narrow(numerator / denominator)?)
    } else {
        let delta = sqrt_start_x96
            .checked_sub(sqrt_next_x96)
            .ok_or(MathError::Underflow)?;
        Ok(mul_div(U256::from(liquidity), delta, Q96)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    const ONE_E12: u128 = 1_000_000_000_000;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_sqrt_price_x96_to_price() {
        // price 1.0 at equal decimals
        assert!(approx_eq(sqrt_price_x96_to_price(Q96, 18, 18, true), 1.0));

        // sqrtP = 2 * 2^96 -> price 4 token1 per token0
        let two_q96 = Q96 * U256::from(2u8);
        assert!(approx_eq(sqrt_price_x96_to_price(two_q96, 18, 18, true), 4.0));
        assert!(approx_eq(sqrt_price_x96_to_price(two_q96, 18, 18, false), 0.25));

        // decimals0 = 6, decimals1 = 18 scales by 10^-12
        assert!(approx_eq(sqrt_price_x96_to_price(Q96, 6, 18, true), 1e-12));
        // and the opposite order by 10^12
        assert!(approx_eq(sqrt_price_x96_to_price(Q96, 18, 6, true), 1e12));
    }

    #[test]
    fn spot_price_is_self_inverse() {
        let fixtures = [
            (U256::from_str("1046706758115479018135889").unwrap(), 18u8, 6u8),
            (U256::from_str("79228162514264337593543950336").unwrap(), 8, 18),
            (U256::from_str("1461446703485210103287273052203988822378723970341").unwrap(), 0, 0),
        ];

        for (sqrt_price, d0, d1) in fixtures {
            let forward = sqrt_price_x96_to_price(sqrt_price, d0, d1, true);
            let backward = sqrt_price_x96_to_price(sqrt_price, d0, d1, false);
            assert!(
                approx_eq(1.0 / forward, backward),
                "1/{forward} != {backward} for {sqrt_price}"
            );
        }
    }

    #[test]
    fn test_get_next_sqrt_price_from_input() {
        //Fails if price is zero
        let result = get_next_sqrt_price_from_input(U256::ZERO, 1, U256::from(1000u32), false);
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::SqrtPriceIsZero))
        ));

        //Fails if liquidity is zero
        let result = get_next_sqrt_price_from_input(Q96, 0, U256::from(1000u32), true);
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::LiquidityIsZero))
        ));

        //returns input price if amount in is zero, both directions
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, ONE_E12, U256::ZERO, true).unwrap(),
            Q96
        );
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, ONE_E12, U256::ZERO, false).unwrap(),
            Q96
        );
    }

    #[test]
    fn amount_0_in_at_unit_price() {
        // sqrtP = Q96: next = Q96 + amount * Q96^2 / (L * Q96) = Q96 + amount * Q96 / L
        let amount = U256::from(999_700u32);
        let next = get_next_sqrt_price_from_amount_0(Q96, ONE_E12, amount).unwrap();
        let expected = Q96 + (amount * Q96) / U256::from(ONE_E12);
        assert_eq!(next, expected);
        assert!(next > Q96);
    }

    #[test]
    fn amount_1_in_at_unit_price() {
        // next = Q96 - amount * Q96 / L
        let amount = U256::from(1_000_000u32);
        let next = get_next_sqrt_price_from_amount_1(Q96, ONE_E12, amount).unwrap();
        let expected = Q96 - (amount * Q96) / U256::from(ONE_E12);
        assert_eq!(next, expected);
        assert!(next < Q96);
    }

    #[test]
    fn amount_1_in_beyond_range_underflows() {
        // amount * Q96 > L * sqrtP  <=>  amount > L at unit price
        let result = get_next_sqrt_price_from_amount_1(Q96, ONE_E12, U256::from(ONE_E12 + 1));
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::PriceUnderflow))
        ));
    }

    #[test]
    fn amount_1_in_draining_range_exactly_has_no_price() {
        // amount * Q96 == L * sqrtP drives the price to exactly zero
        let result = get_next_sqrt_price_from_amount_1(Q96, ONE_E12, U256::from(ONE_E12));
        assert!(matches!(
            result,
            Err(Error::StateError(StateError::MissingPriceState))
        ));
    }

    #[test]
    fn amount_0_in_overflow_is_reported() {
        let result = get_next_sqrt_price_from_amount_0(U256::MAX, 1, U256::MAX);
        assert!(matches!(result, Err(Error::MathError(MathError::Overflow))));
    }

    #[test]
    fn test_get_amount_out() {
        // token1 in: L * (start - next) / Q96
        let next = Q96 - U256::from(1_000u32);
        let out = get_amount_out(Q96, next, 1u128 << 96, false).unwrap();
        assert_eq!(out, U256::from(1_000u32));

        // token0 in at unit start price: L * Q96 * d / ((Q96 + d) * Q96) = L * d / (Q96 + d)
        let d = Q96;
        let out = get_amount_out(Q96, Q96 + d, 1_000_000u128, true).unwrap();
        assert_eq!(out, U256::from(500_000u32));

        // no price movement, no output
        assert_eq!(get_amount_out(Q96, Q96, ONE_E12, true).unwrap(), U256::ZERO);
        assert_eq!(get_amount_out(Q96, Q96, ONE_E12, false).unwrap(), U256::ZERO);
    }

    #[test]
    fn get_amount_out_rejects_price_moving_the_wrong_way() {
        let result = get_amount_out(Q96, Q96 - U256::ONE, ONE_E12, true);
        assert!(matches!(result, Err(Error::MathError(MathError::Underflow))));

        let result = get_amount_out(Q96, Q96 + U256::ONE, ONE_E12, false);
        assert!(matches!(result, Err(Error::MathError(MathError::Underflow))));
    }
}
