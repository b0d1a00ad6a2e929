use serde::{Deserialize, Serialize};

/// Output of one filter evaluated against one instrument
///
/// Flattened into `<filter_name>_value` / `<filter_name>_status` document
/// fields. When a filter reports more than once for the same instrument only
/// the first result is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub filter_name: String,
    pub value: f64,
    pub status: String,
}

impl SignalResult {
    pub fn new(filter_name: impl Into<String>, value: f64, status: impl Into<String>) -> Self {
        Self {
            filter_name: filter_name.into(),
            value,
            status: status.into(),
        }
    }

    /// Document field holding the numeric result
    pub fn value_field(&self) -> String {
        format!("{}_value", self.filter_name)
    }

    /// Document field holding the categorical outcome
    pub fn status_field(&self) -> String {
        format!("{}_status", self.filter_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_field_names() {
        let signal = SignalResult::new("DividendKings", 4.1, "buy");
        assert_eq!(signal.value_field(), "DividendKings_value");
        assert_eq!(signal.status_field(), "DividendKings_status");
    }
}
