use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::values::Price;

/// A single closing price for a ticker symbol on a trading day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Price,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: Price) -> Self {
        Self { date, close }
    }
}
