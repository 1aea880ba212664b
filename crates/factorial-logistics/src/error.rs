/// Errors raised while assembling a logistics network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogisticsError {
    /// A capacity or demand was malformed or not strictly positive.
    #[error("invalid {field} '{value}': {reason}")]
    InvalidQuantity {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}
