//! Tolerant text-to-number coercion.

use std::str::FromStr;

/// Parse `raw` as `T`, returning `default` on any parse failure.
///
/// Surrounding whitespace is ignored. An empty string is a parse failure like
/// any other and yields `default`.
pub fn parse_or_default<T: FromStr>(raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or(default)
}

/// Coerce a raw ranking key to a finite number.
///
/// Empty, malformed and non-finite inputs (`nan`, `inf`) all become `0.0`, and
/// negative zero is normalized so it compares equal to `"0"` in every respect.
pub fn coerce_key(raw: &str) -> f64 {
    let value = parse_or_default(raw, 0.0_f64);
    if !value.is_finite() {
        return 0.0;
    }
    // -0.0 + 0.0 == +0.0
    value + 0.0
}
