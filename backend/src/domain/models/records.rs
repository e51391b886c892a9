use serde::{Deserialize, Serialize};
use shared::{AmortizationInput, AmortizationResult, CashflowInput, CashflowResult};

/// A finished EMI calculation, as held by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRecord {
    /// Name as typed on the form, possibly empty
    pub customer_name: String,
    pub input: AmortizationInput,
    pub result: AmortizationResult,
}

/// A finished cashflow calculation, as held by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowRecord {
    pub customer_name: String,
    pub input: CashflowInput,
    pub result: CashflowResult,
}
