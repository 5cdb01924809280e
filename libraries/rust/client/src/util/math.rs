use govern_evm_client::U256;

/// Scale a raw token amount down by `10^decimals`, producing an exact decimal string
///
/// Trailing zeros of the fraction are removed, so whole amounts have no decimal point.
pub fn shrink_token(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_owned()
    } else {
        format!("{whole}.{fraction}")
    }
}

#[test]
fn shrink_whole_amounts() {
    let one = U256::exp10(18);

    assert_eq!(shrink_token(one, 18), "1");
    assert_eq!(shrink_token(one * U256::from(1234u64), 18), "1234");
    assert_eq!(shrink_token(U256::zero(), 18), "0");
    assert_eq!(shrink_token(U256::from(1500u64), 0), "1500");
}

#[test]
fn shrink_keeps_full_precision() {
    assert_eq!(shrink_token(U256::one(), 18), "0.000000000000000001");
    assert_eq!(
        shrink_token(U256::from_dec_str("123456789012345678901").unwrap(), 18),
        "123.456789012345678901"
    );
    assert_eq!(shrink_token(U256::from(1500u64), 3), "1.5");
    assert_eq!(
        shrink_token(U256::MAX, 18),
        "115792089237316195423570985008687907853269984665640564039457.584007913129639935"
    );
}

#[test]
fn shrink_with_more_decimals_than_digits() {
    assert_eq!(shrink_token(U256::from(5u64), 255), format!("0.{}5", "0".repeat(254)));
}
