use clmm_quote::math::math_helpers::mul_div;
use clmm_quote::math::sqrt_price_math::{
    get_amount_out, get_next_sqrt_price_from_input, sqrt_price_x96_to_price,
};
use clmm_quote::math::swap_math::{SwapInput, calculate_swap_output, normalize_decimals};
use clmm_quote::{Q96, U256};
use criterion::Criterion;
use std::hint::black_box;
use std::str::FromStr;

const LIQUIDITY: u128 = 1_517_882_343_751_509_868_544;

fn sqrt_price() -> U256 {
    U256::from_str("1456928274067706885522396459869524").unwrap()
}

pub fn bench_sqrt_price_math(c: &mut Criterion) {
    let sqrt_p = sqrt_price();
    let amount = U256::from(1_000_000_000_000_000_000u128);

    c.bench_function("sqrt_price_x96_to_price", |b| {
        b.iter(|| sqrt_price_x96_to_price(black_box(sqrt_p), 6, 18, black_box(false)))
    });

    c.bench_function("next_sqrt_price_zero_for_one", |b| {
        b.iter(|| {
            get_next_sqrt_price_from_input(black_box(sqrt_p), LIQUIDITY, black_box(amount), true)
        })
    });

    c.bench_function("next_sqrt_price_one_for_zero", |b| {
        b.iter(|| {
            get_next_sqrt_price_from_input(black_box(sqrt_p), LIQUIDITY, black_box(amount), false)
        })
    });

    let next = sqrt_p + U256::from(1_000_000_000u64);
    c.bench_function("amount_out_zero_for_one", |b| {
        b.iter(|| get_amount_out(black_box(sqrt_p), black_box(next), LIQUIDITY, true))
    });
}

pub fn bench_swap_math(c: &mut Criterion) {
    let input = SwapInput {
        amount_in_raw: U256::from(2_500_000_000u64),
        sqrt_price_x96: sqrt_price(),
        liquidity: LIQUIDITY,
        fee_bps: 500,
        zero_for_one: true,
        decimals_in: 6,
        decimals_out: 18,
    };

    c.bench_function("calculate_swap_output", |b| {
        b.iter(|| calculate_swap_output(black_box(&input)))
    });

    let amount = U256::from_str("5000000000000000000").unwrap();
    c.bench_function("normalize_decimals_18_to_6", |b| {
        b.iter(|| normalize_decimals(black_box(amount), 18, 6))
    });
}

pub fn bench_math_helpers(c: &mut Criterion) {
    let a = U256::from_str("340282366920938463463374607431768211455").unwrap();
    let b_val = Q96;
    let den = U256::from(LIQUIDITY);

    c.bench_function("mul_div", |b| {
        b.iter(|| mul_div(black_box(a), black_box(b_val), black_box(den)))
    });
}
