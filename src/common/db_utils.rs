// src/common/db_utils.rs

use rust_decimal::Decimal;

use crate::common::error::AppError;

// Maior valor que cabe numa coluna NUMERIC(12, 2): 9999999999.99
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

// Teto de estoque por linha, abaixo do limite de INTEGER
pub const MAX_STOCK_QUANTITY: i32 = 1_000_000_000;

// Traduz a violação de uma constraint UNIQUE específica para um erro de domínio.
// Qualquer outro erro segue como DatabaseError.
pub fn on_unique_violation(e: sqlx::Error, constraint: &str, conflict: AppError) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(constraint) {
            return conflict;
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_amount_matches_the_column_precision() {
        assert_eq!(MAX_AMOUNT.to_string(), "9999999999.99");
    }
}
