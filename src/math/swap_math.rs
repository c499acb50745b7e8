use crate::U256_E4;
use crate::error::{Error, MathError};
use crate::math::math_helpers::{mul_div, pow10};
use crate::math::sqrt_price_math::{get_amount_out, get_next_sqrt_price_from_input};
use alloy_primitives::U256;

/// Inputs of a single-range exact-input swap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapInput {
    /// Input amount in raw token units, before fees.
    pub amount_in_raw: U256,
    pub sqrt_price_x96: U256,
    pub liquidity: u128,
    /// Fee charged on the input, over a denominator of 10_000. Fee tier
    /// values are passed through unchanged.
    pub fee_bps: u32,
    /// `true` for token0 -> token1, `false` for token1 -> token0.
    pub zero_for_one: bool,
    pub decimals_in: u8,
    pub decimals_out: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapOutput {
    /// Output amount after decimal normalization.
    pub amount_out: U256,
    pub sqrt_price_next: U256,
    pub fee_amount: U256,
    pub amount_in_after_fee: U256,
}

/// Simulates an exact-input swap within the currently active liquidity
/// range. No tick is crossed: an input that would exhaust the range fails
/// with `StateError::PriceUnderflow` (token1 in) instead of moving on to the
/// next range.
///
/// Steps:
/// 1. `fee = amount * fee_bps / 10_000` (truncating), deducted from the input
/// 2. next sqrt price from the constant-liquidity invariant
/// 3. raw output from the sqrt price delta
/// 4. decimal normalization, see [`normalize_decimals`]
pub fn calculate_swap_output(input: &SwapInput) -> Result<SwapOutput, Error> {
    let fee_amount = mul_div(input.amount_in_raw, U256::from(input.fee_bps), U256_E4)?;
    let amount_in_after_fee = input
        .amount_in_raw
        .checked_sub(fee_amount)
        .ok_or(MathError::Underflow)?;

    let sqrt_price_next = get_next_sqrt_price_from_input(
        input.sqrt_price_x96,
        input.liquidity,
        amount_in_after_fee,
        input.zero_for_one,
    )?;

    let amount_out_raw = get_amount_out(
        input.sqrt_price_x96,
        sqrt_price_next,
        input.liquidity,
        input.zero_for_one,
    )?;

    let amount_out = normalize_decimals(amount_out_raw, input.decimals_in, input.decimals_out)?;

    Ok(SwapOutput {
        amount_out,
        sqrt_price_next,
        fee_amount,
        amount_in_after_fee,
    })
}

/// Rescales `amount` by the difference between the input and output token
/// decimals.
///
/// When `decimals_in >= decimals_out` the amount is divided by
/// `10^(decimals_in - decimals_out)` with truncation. When
/// `decimals_out > decimals_in` the exponent would be negative, so the
/// amount is multiplied by `10^(decimals_out - decimals_in)` instead.
pub fn normalize_decimals(amount: U256, decimals_in: u8, decimals_out: u8) -> Result<U256, MathError> {
    if decimals_in >= decimals_out {
        let exp = u32::from(decimals_in - decimals_out);
        match pow10(exp) {
            Ok(scale) => Ok(amount / scale),
            // 10^exp > U256::MAX >= amount
            Err(_) => Ok(U256::ZERO),
        }
    } else {
        let scale = pow10(u32::from(decimals_out - decimals_in))?;
        amount.checked_mul(scale).ok_or(MathError::Overflow)
    }
}
