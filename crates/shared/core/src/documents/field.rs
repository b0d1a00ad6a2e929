//! Field names shared with existing document consumers

pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const DATE: &str = "date";
pub const SYMBOLS_USD: &str = "symbols_usd";
pub const SYMBOLS_EUR: &str = "symbols_eur";
pub const COUNTRY: &str = "country";
pub const TAGS: &str = "tags";
pub const INDICES: &str = "indices";
pub const LAST_PRICE_USD: &str = "last_price_usd";
pub const LAST_PRICE_EUR: &str = "last_price_eur";
pub const TYPE: &str = "type";
