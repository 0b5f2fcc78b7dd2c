/// The only currency the gateway accepts, compared case-insensitively.
pub const SUPPORTED_CURRENCY: &str = "usd";

pub fn is_supported_currency(currency: &str) -> bool {
    currency.eq_ignore_ascii_case(SUPPORTED_CURRENCY)
}
