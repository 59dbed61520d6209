pub mod calculator;
pub mod declaration;
pub mod error;
pub mod invoice;
pub mod ledger;
pub mod period;
pub mod profile;
pub mod sector;
pub mod state;
pub mod summary;
pub mod transaction;

// Flat public surface for domain types and functions.
pub use calculator::{
    calculate_profit_tax, calculate_tax, compare_methods, entry_taxes, is_exempt_revenue,
    profit_pit_rate, project_cumulative, MethodComparison, ProfitTax, ProjectionPoint, TaxAmounts,
    TaxMethod, EXEMPTION_THRESHOLD, GROUP2_DEDUCTION, MAX_AMOUNT, MAX_PROJECTION_MONTHS,
};
pub use declaration::{
    tax_deadlines, ComplianceEntry, Deadline, DeclarationBook, DeclarationStatus, DeclarationType,
    FilingOutcome, ReferenceSequence, Reminder, TaxDeclaration,
};
pub use error::{HkdError, Result};
pub use invoice::{
    add_invoice, reconcile, Invoice, InvoiceKind, InvoiceStatus, NewInvoice, Reconciliation,
};
pub use ledger::Ledger;
pub use period::{parse_date, quarter_of, Period};
pub use profile::{
    BankAccount, BankAccountStatus, Hkd, HkdGroup, HkdStatus, NotificationSettings, Plan,
    Representative, Subscription, SubscriptionStatus, User, UserSettings,
};
pub use sector::{BusinessSector, SectorTable};
pub use state::{read_state_json, write_state_json, AppState};
pub use summary::{AnnualSummary, MonthlySummary, PeriodTotals, QuarterlySummary};
pub use transaction::{CsvField, LedgerCsvRecord, NewTransaction, Transaction, TransactionPatch};
