/// Currency code (upper-case, e.g. "USD")
pub type CurrencyCode = String;

/// Provider-side currency identifier (e.g. "R01235")
pub type ProviderId = String;

/// Lookup key that resolves to the configured default currency.
pub const DEFAULT_CURRENCY_KEY: &str = "default";
