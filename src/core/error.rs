use super::declaration::DeclarationStatus;

/// Errors raised by the ledger, calculator and declaration engine.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HkdError {
    #[error("amount must not be negative: {0}")]
    NegativeAmount(i64),
    #[error("amount exceeds the maximum of 1,000,000,000,000,000 VND: {0}")]
    AmountTooLarge(i64),
    #[error("projection is limited to 120 months: {0}")]
    ProjectionTooLong(u32),
    #[error("month must be between 1 and 12: {0}")]
    InvalidMonth(u32),
    #[error("quarter must be between 1 and 4: {0}")]
    InvalidQuarter(u32),
    #[error("group must be between 1 and 4: {0}")]
    InvalidGroup(u8),
    #[error("unknown business sector: {0}")]
    UnknownSector(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid period label: {0}")]
    InvalidPeriod(String),
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("declaration not found: {0}")]
    DeclarationNotFound(String),
    #[error("declaration {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: DeclarationStatus,
        to: DeclarationStatus,
    },
    #[error("failed to encode declaration data: {0}")]
    Encoding(String),
}

impl HkdError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            HkdError::TransactionNotFound(_) | HkdError::DeclarationNotFound(_)
        )
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            HkdError::NegativeAmount(_)
                | HkdError::AmountTooLarge(_)
                | HkdError::ProjectionTooLong(_)
                | HkdError::InvalidMonth(_)
                | HkdError::InvalidQuarter(_)
                | HkdError::InvalidGroup(_)
                | HkdError::UnknownSector(_)
                | HkdError::InvalidDate(_)
                | HkdError::InvalidPeriod(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HkdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        assert!(HkdError::TransactionNotFound("txn-1".into()).is_not_found());
        assert!(HkdError::DeclarationNotFound("decl-1".into()).is_not_found());
        assert!(!HkdError::NegativeAmount(-1).is_not_found());
        assert!(HkdError::NegativeAmount(-1).is_invalid_argument());
        assert!(HkdError::UnknownSector("MINING".into()).is_invalid_argument());
        assert!(HkdError::AmountTooLarge(i64::MAX).is_invalid_argument());
        assert!(HkdError::ProjectionTooLong(u32::MAX).is_invalid_argument());

        let encoding = HkdError::Encoding("key must be a string".into());
        assert!(!encoding.is_invalid_argument());
        assert!(!encoding.is_not_found());
        assert_eq!(
            encoding.to_string(),
            "failed to encode declaration data: key must be a string"
        );

        let transition = HkdError::InvalidTransition {
            id: "decl-1".into(),
            from: DeclarationStatus::Rejected,
            to: DeclarationStatus::Submitted,
        };
        assert!(!transition.is_invalid_argument());
        assert!(!transition.is_not_found());
        assert_eq!(
            transition.to_string(),
            "declaration decl-1 cannot move from rejected to submitted"
        );
    }
}
