//! Tax declaration lifecycle.
//!
//! `draft`/`pending` are both "not yet submitted". Submission snapshots the
//! ledger totals of the declaration's period and assigns a GDT reference
//! number. `confirmed`/`rejected` arrive from the tax authority after
//! submission and are terminal.

use super::error::{HkdError, Result};
use super::ledger::Ledger;
use super::period::{last_day_of_month, Period};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationStatus {
    Draft,
    Pending,
    Submitted,
    Confirmed,
    Rejected,
}

impl DeclarationStatus {
    /// Not yet submitted
    pub fn is_open(self) -> bool {
        matches!(self, DeclarationStatus::Draft | DeclarationStatus::Pending)
    }

    /// Submitted or confirmed
    pub fn is_filed(self) -> bool {
        matches!(
            self,
            DeclarationStatus::Submitted | DeclarationStatus::Confirmed
        )
    }
}

impl fmt::Display for DeclarationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeclarationStatus::Draft => "draft",
            DeclarationStatus::Pending => "pending",
            DeclarationStatus::Submitted => "submitted",
            DeclarationStatus::Confirmed => "confirmed",
            DeclarationStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Declaration form, serialized as its official form code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DeclarationType {
    /// Quarterly VAT + PIT return
    #[serde(rename = "01/CNKD")]
    QuarterlyReturn,
    /// Annual PIT settlement
    #[serde(rename = "02/CNKD")]
    AnnualSettlement,
    /// Business location notice
    #[serde(rename = "01TB-ĐĐKD")]
    LocationNotice,
    /// Return filed on the household's behalf by an organization
    #[serde(rename = "01/TCKT")]
    FiledOnBehalf,
    /// Return for lottery, insurance and multi-level sales agents
    #[serde(rename = "01/XSBHDC")]
    AgentIncome,
}

impl DeclarationType {
    pub fn code(self) -> &'static str {
        match self {
            DeclarationType::QuarterlyReturn => "01/CNKD",
            DeclarationType::AnnualSettlement => "02/CNKD",
            DeclarationType::LocationNotice => "01TB-ĐĐKD",
            DeclarationType::FiledOnBehalf => "01/TCKT",
            DeclarationType::AgentIncome => "01/XSBHDC",
        }
    }
}

impl fmt::Display for DeclarationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxDeclaration {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DeclarationType,
    /// Period label, e.g. `Q1/2026` or `2026`
    #[schemars(with = "String")]
    pub period: Period,
    pub status: DeclarationStatus,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<DateTime<Utc>>,
    pub revenue: i64,
    pub vat_payable: i64,
    pub pit_payable: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdt_reference_number: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaxDeclaration {
    /// Filed on or before the due date. `None` until submitted.
    pub fn is_on_time(&self) -> Option<bool> {
        self.submitted_date
            .map(|submitted| submitted.date_naive() <= self.due_date)
    }
}

/// Outcome reported by the tax authority for a submitted declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilingOutcome {
    Confirmed,
    Rejected,
}

impl From<FilingOutcome> for DeclarationStatus {
    fn from(outcome: FilingOutcome) -> Self {
        match outcome {
            FilingOutcome::Confirmed => DeclarationStatus::Confirmed,
            FilingOutcome::Rejected => DeclarationStatus::Rejected,
        }
    }
}

/// A statutory filing deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub kind: DeclarationType,
    pub period: Period,
    pub due_date: NaiveDate,
}

/// Filing deadlines for `year`: four quarterly returns, each due the last
/// day of the month after the quarter, and the annual settlement due
/// 31 January of the next year. Weekend due dates move to the next Monday.
pub fn tax_deadlines(year: i32) -> Vec<Deadline> {
    let mut deadlines: Vec<Deadline> = (1..=4)
        .filter_map(|quarter| {
            let (due_year, due_month) = if quarter == 4 {
                (year + 1, 1)
            } else {
                (year, quarter * 3 + 1)
            };
            Some(Deadline {
                kind: DeclarationType::QuarterlyReturn,
                period: Period::Quarter { year, quarter },
                due_date: next_working_day(last_day_of_month(due_year, due_month)?),
            })
        })
        .collect();

    if let Some(due) = NaiveDate::from_ymd_opt(year + 1, 1, 31) {
        deadlines.push(Deadline {
            kind: DeclarationType::AnnualSettlement,
            period: Period::Year(year),
            due_date: next_working_day(due),
        });
    }
    deadlines
}

fn next_working_day(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

/// Per-year sequence behind `GDT-{year}-{seq:06}` reference numbers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceSequence {
    pub year: i32,
    pub last: u32,
}

impl ReferenceSequence {
    pub fn next(&mut self, year: i32) -> String {
        if self.year != year {
            self.year = year;
            self.last = 0;
        }
        self.last += 1;
        format!("GDT-{}-{:06}", year, self.last)
    }
}

/// An open declaration that is due soon or overdue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub kind: DeclarationType,
    pub period: String,
    pub due_date: NaiveDate,
    pub days_left: i64,
    pub overdue: bool,
}

/// Filing record of one declaration for the compliance report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceEntry {
    pub id: String,
    pub kind: DeclarationType,
    pub period: String,
    pub due_date: NaiveDate,
    pub submitted_date: Option<DateTime<Utc>>,
    pub status: DeclarationStatus,
    pub on_time: Option<bool>,
}

/// All declarations of one household business
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationBook {
    #[serde(default)]
    declarations: Vec<TaxDeclaration>,
    #[serde(default)]
    next_declaration_seq: u64,
    #[serde(default)]
    reference_sequence: ReferenceSequence,
}

impl DeclarationBook {
    pub fn new() -> Self {
        DeclarationBook::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaxDeclaration> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TaxDeclaration> {
        self.declarations.iter().find(|d| d.id == id)
    }

    /// Add a pending placeholder for an upcoming filing
    pub fn add(
        &mut self,
        kind: DeclarationType,
        period: Period,
        due_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> &TaxDeclaration {
        let id = self.next_id();
        log::info!("Scheduled declaration: id={} type={} period={}", id, kind, period);
        self.declarations.push(TaxDeclaration {
            id,
            kind,
            period,
            status: DeclarationStatus::Pending,
            due_date,
            submitted_date: None,
            revenue: 0,
            vat_payable: 0,
            pit_payable: 0,
            gdt_reference_number: None,
            data: Map::new(),
            created_at: now,
            updated_at: now,
        });
        &self.declarations[self.declarations.len() - 1]
    }

    /// Create placeholders for every deadline of `year` not already present.
    /// Returns the ids created.
    pub fn schedule(&mut self, year: i32, now: DateTime<Utc>) -> Vec<String> {
        let mut created = Vec::new();
        for deadline in tax_deadlines(year) {
            let exists = self
                .declarations
                .iter()
                .any(|d| d.kind == deadline.kind && d.period == deadline.period);
            if !exists {
                let decl = self.add(deadline.kind, deadline.period, deadline.due_date, now);
                created.push(decl.id.clone());
            }
        }
        created
    }

    /// Save an unsubmitted declaration as a draft
    pub fn save_draft(&mut self, id: &str, now: DateTime<Utc>) -> Result<&TaxDeclaration> {
        let decl = self.transition(id, DeclarationStatus::Draft)?;
        decl.updated_at = now;
        Ok(&*decl)
    }

    /// Submit a draft or pending declaration, binding the ledger totals of
    /// its period and assigning a reference number.
    pub fn submit(
        &mut self,
        id: &str,
        ledger: &Ledger,
        now: DateTime<Utc>,
    ) -> Result<&TaxDeclaration> {
        let current = self.find(id)?;
        let (period, status) = (current.period, current.status);
        if !status.is_open() {
            return Err(HkdError::InvalidTransition {
                id: id.to_string(),
                from: status,
                to: DeclarationStatus::Submitted,
            });
        }
        let totals = ledger.period_totals(period)?;
        let breakdown = period_breakdown(ledger, period)?;
        let reference = self.reference_sequence.next(now.year());

        let decl = self.transition(id, DeclarationStatus::Submitted)?;
        decl.submitted_date = Some(now);
        decl.revenue = totals.revenue;
        decl.vat_payable = totals.vat;
        decl.pit_payable = totals.pit;
        decl.gdt_reference_number = Some(reference);
        if let Some(months) = breakdown {
            decl.data.insert("months".to_string(), months);
        }
        decl.updated_at = now;
        log::info!(
            "Submitted declaration: id={} period={} reference={}",
            decl.id,
            decl.period,
            decl.gdt_reference_number.as_deref().unwrap_or_default()
        );
        Ok(&*decl)
    }

    /// Record the tax authority's confirmation or rejection
    pub fn record_outcome(
        &mut self,
        id: &str,
        outcome: FilingOutcome,
        now: DateTime<Utc>,
    ) -> Result<&TaxDeclaration> {
        let decl = self.transition(id, outcome.into())?;
        decl.updated_at = now;
        Ok(&*decl)
    }

    /// Open declarations due within the largest reminder window, or overdue
    pub fn upcoming(&self, today: NaiveDate, reminder_days: &[u32]) -> Vec<Reminder> {
        let window = i64::from(reminder_days.iter().copied().max().unwrap_or(0));
        let mut reminders: Vec<Reminder> = self
            .declarations
            .iter()
            .filter(|d| d.status.is_open())
            .filter_map(|d| {
                let days_left = (d.due_date - today).num_days();
                (days_left <= window).then(|| Reminder {
                    id: d.id.clone(),
                    kind: d.kind,
                    period: d.period.to_string(),
                    due_date: d.due_date,
                    days_left,
                    overdue: days_left < 0,
                })
            })
            .collect();
        reminders.sort_by_key(|r| r.due_date);
        reminders
    }

    /// Due and submitted dates of every declaration, ordered by due date
    pub fn compliance(&self) -> Vec<ComplianceEntry> {
        let mut entries: Vec<ComplianceEntry> = self
            .declarations
            .iter()
            .map(|d| ComplianceEntry {
                id: d.id.clone(),
                kind: d.kind,
                period: d.period.to_string(),
                due_date: d.due_date,
                submitted_date: d.submitted_date,
                status: d.status,
                on_time: d.is_on_time(),
            })
            .collect();
        entries.sort_by_key(|e| e.due_date);
        entries
    }

    fn find(&self, id: &str) -> Result<&TaxDeclaration> {
        self.get(id)
            .ok_or_else(|| HkdError::DeclarationNotFound(id.to_string()))
    }

    fn transition(&mut self, id: &str, to: DeclarationStatus) -> Result<&mut TaxDeclaration> {
        let decl = self
            .declarations
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| HkdError::DeclarationNotFound(id.to_string()))?;

        let allowed = match to {
            DeclarationStatus::Draft | DeclarationStatus::Submitted => decl.status.is_open(),
            DeclarationStatus::Confirmed | DeclarationStatus::Rejected => {
                decl.status == DeclarationStatus::Submitted
            }
            DeclarationStatus::Pending => false,
        };
        if !allowed {
            log::warn!(
                "Refused declaration transition: id={} {} -> {}",
                id,
                decl.status,
                to
            );
            return Err(HkdError::InvalidTransition {
                id: id.to_string(),
                from: decl.status,
                to,
            });
        }
        decl.status = to;
        Ok(decl)
    }

    fn next_id(&mut self) -> String {
        loop {
            self.next_declaration_seq += 1;
            let id = format!("decl-{:03}", self.next_declaration_seq);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Monthly breakdown stored in the payload of a quarterly filing
fn period_breakdown(ledger: &Ledger, period: Period) -> Result<Option<Value>> {
    match period {
        Period::Quarter { year, quarter } => {
            let summary = ledger.quarterly_summary(year, quarter)?;
            let months = serde_json::to_value(summary.months)
                .map_err(|e| HkdError::Encoding(e.to_string()))?;
            Ok(Some(months))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::NewTransaction;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ledger_with(sales: &[(&str, i64)]) -> Ledger {
        let mut ledger = Ledger::new();
        for (day, amount) in sales {
            let retail = ledger.sectors().find("RETAIL").unwrap();
            let entry = NewTransaction::priced(date(day), "Bán hàng", *amount, retail).unwrap();
            ledger.add(entry, at("2026-01-01T00:00:00Z")).unwrap();
        }
        ledger
    }

    fn book_with_q1() -> (DeclarationBook, String) {
        let mut book = DeclarationBook::new();
        let id = book
            .add(
                DeclarationType::QuarterlyReturn,
                Period::quarter(2026, 1).unwrap(),
                date("2026-04-30"),
                at("2026-01-01T00:00:00Z"),
            )
            .id
            .clone();
        (book, id)
    }

    #[test]
    fn deadlines_for_2026() {
        let deadlines = tax_deadlines(2026);
        let dues: Vec<_> = deadlines
            .iter()
            .map(|d| (d.period.to_string(), d.due_date.to_string()))
            .collect();
        assert_eq!(
            dues,
            [
                ("Q1/2026".to_string(), "2026-04-30".to_string()),
                ("Q2/2026".to_string(), "2026-07-31".to_string()),
                // 31 October 2026 is a Saturday
                ("Q3/2026".to_string(), "2026-11-02".to_string()),
                // 31 January 2027 is a Sunday
                ("Q4/2026".to_string(), "2027-02-01".to_string()),
                ("2026".to_string(), "2027-02-01".to_string()),
            ]
        );
        assert_eq!(deadlines[4].kind, DeclarationType::AnnualSettlement);
    }

    #[test]
    fn schedule_is_idempotent() {
        let mut book = DeclarationBook::new();
        let created = book.schedule(2026, at("2026-01-01T00:00:00Z"));
        assert_eq!(created.len(), 5);
        assert!(book.iter().all(|d| d.status == DeclarationStatus::Pending));
        assert!(book.schedule(2026, at("2026-02-01T00:00:00Z")).is_empty());
        assert_eq!(book.len(), 5);
    }

    #[test]
    fn submit_binds_quarter_totals() {
        let ledger = ledger_with(&[
            ("2026-01-10", 60_000_000),
            ("2026-03-15", 10_000_000),
            ("2026-06-01", 80_000_000),
        ]);
        let (mut book, id) = book_with_q1();

        let decl = book.submit(&id, &ledger, at("2026-04-02T08:00:00Z")).unwrap();
        assert_eq!(decl.status, DeclarationStatus::Submitted);
        assert_eq!(decl.submitted_date, Some(at("2026-04-02T08:00:00Z")));
        assert_eq!(decl.updated_at, at("2026-04-02T08:00:00Z"));
        assert_eq!(decl.revenue, 70_000_000);
        assert_eq!(decl.vat_payable, 700_000);
        assert_eq!(decl.pit_payable, 350_000);
        assert_eq!(decl.gdt_reference_number.as_deref(), Some("GDT-2026-000001"));
        assert_eq!(decl.data["months"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn compliance_marks_late_and_on_time_filings() {
        let ledger = ledger_with(&[("2026-02-10", 150_000_000)]);
        let mut book = DeclarationBook::new();
        book.schedule(2026, at("2026-01-01T00:00:00Z"));
        let ids: Vec<String> = book.iter().map(|d| d.id.clone()).collect();

        // Q1 due 2026-04-30: filed on the due date
        book.submit(&ids[0], &ledger, at("2026-04-30T16:00:00Z")).unwrap();
        // Q2 due 2026-07-31: filed a day late
        book.submit(&ids[1], &ledger, at("2026-08-01T09:00:00Z")).unwrap();

        let report = book.compliance();
        assert_eq!(report.len(), 5);
        assert_eq!(report[0].period, "Q1/2026");
        assert_eq!(report[0].on_time, Some(true));
        assert_eq!(report[0].status, DeclarationStatus::Submitted);
        assert_eq!(report[1].period, "Q2/2026");
        assert_eq!(report[1].on_time, Some(false));
        assert_eq!(report[1].submitted_date, Some(at("2026-08-01T09:00:00Z")));
        assert!(report[2..].iter().all(|e| e.on_time.is_none()));
        assert!(report.windows(2).all(|w| w[0].due_date <= w[1].due_date));
    }

    #[test]
    fn unsubmitted_declaration_has_no_timeliness() {
        let (book, id) = book_with_q1();
        assert_eq!(book.get(&id).unwrap().is_on_time(), None);
    }

    #[test]
    fn submit_exempt_year_binds_zero_tax() {
        let ledger = ledger_with(&[("2026-02-10", 10_000_000)]);
        let (mut book, id) = book_with_q1();
        let decl = book.submit(&id, &ledger, at("2026-04-02T08:00:00Z")).unwrap();
        assert_eq!(decl.revenue, 10_000_000);
        assert_eq!(decl.vat_payable, 0);
        assert_eq!(decl.pit_payable, 0);
    }

    #[test]
    fn month_breakdown_only_for_quarters() {
        let ledger = ledger_with(&[("2026-02-10", 150_000_000)]);
        let mut book = DeclarationBook::new();
        book.schedule(2026, at("2026-01-01T00:00:00Z"));
        let ids: Vec<String> = book.iter().map(|d| d.id.clone()).collect();

        let quarter = book.submit(&ids[0], &ledger, at("2026-04-02T08:00:00Z")).unwrap();
        let months = quarter.data["months"].as_array().unwrap();
        assert_eq!(months[1]["month"], 2);
        assert_eq!(months[1]["totalRevenue"], 150_000_000);
        assert_eq!(months[1]["totalVAT"], 1_500_000);

        let annual = book.submit(&ids[4], &ledger, at("2027-01-20T08:00:00Z")).unwrap();
        assert_eq!(annual.period, Period::Year(2026));
        assert!(annual.data.get("months").is_none());
    }

    #[test]
    fn reference_numbers_match_pattern_and_never_repeat() {
        let ledger = Ledger::new();
        let mut book = DeclarationBook::new();
        book.schedule(2026, at("2026-01-01T00:00:00Z"));
        let ids: Vec<_> = book.iter().map(|d| d.id.clone()).collect();

        let mut refs = Vec::new();
        for id in &ids {
            let decl = book.submit(id, &ledger, at("2027-02-01T00:00:00Z")).unwrap();
            refs.push(decl.gdt_reference_number.clone().unwrap());
        }
        for r in &refs {
            let (prefix, seq) = r.rsplit_once('-').unwrap();
            assert_eq!(prefix, "GDT-2027");
            assert_eq!(seq.len(), 6);
            assert!(seq.chars().all(|c| c.is_ascii_digit()));
        }
        let unique: std::collections::HashSet<_> = refs.iter().collect();
        assert_eq!(unique.len(), refs.len());
    }

    #[test]
    fn reference_sequence_restarts_each_year() {
        let mut seq = ReferenceSequence::default();
        assert_eq!(seq.next(2026), "GDT-2026-000001");
        assert_eq!(seq.next(2026), "GDT-2026-000002");
        assert_eq!(seq.next(2027), "GDT-2027-000001");
    }

    #[test]
    fn draft_can_be_submitted() {
        let ledger = Ledger::new();
        let (mut book, id) = book_with_q1();
        let draft = book.save_draft(&id, at("2026-03-01T00:00:00Z")).unwrap();
        assert_eq!(draft.status, DeclarationStatus::Draft);
        assert!(draft.status.is_open());
        book.submit(&id, &ledger, at("2026-04-01T00:00:00Z")).unwrap();
        assert!(book.get(&id).unwrap().status.is_filed());
    }

    #[test]
    fn cannot_submit_twice() {
        let ledger = Ledger::new();
        let (mut book, id) = book_with_q1();
        book.submit(&id, &ledger, at("2026-04-01T00:00:00Z")).unwrap();
        let err = book.submit(&id, &ledger, at("2026-04-02T00:00:00Z")).unwrap_err();
        assert_eq!(
            err,
            HkdError::InvalidTransition {
                id: id.clone(),
                from: DeclarationStatus::Submitted,
                to: DeclarationStatus::Submitted,
            }
        );
        // refused submission did not consume a reference number
        assert_eq!(book.reference_sequence.last, 1);
        assert!(book.save_draft(&id, at("2026-04-02T00:00:00Z")).is_err());
    }

    #[test]
    fn outcomes_only_after_submission() {
        let ledger = Ledger::new();
        let (mut book, id) = book_with_q1();
        assert!(book
            .record_outcome(&id, FilingOutcome::Confirmed, at("2026-04-01T00:00:00Z"))
            .is_err());

        book.submit(&id, &ledger, at("2026-04-01T00:00:00Z")).unwrap();
        let decl = book
            .record_outcome(&id, FilingOutcome::Confirmed, at("2026-04-10T00:00:00Z"))
            .unwrap();
        assert_eq!(decl.status, DeclarationStatus::Confirmed);
        assert!(book
            .record_outcome(&id, FilingOutcome::Rejected, at("2026-04-11T00:00:00Z"))
            .is_err());
    }

    #[test]
    fn rejected_is_terminal() {
        let ledger = Ledger::new();
        let (mut book, id) = book_with_q1();
        book.submit(&id, &ledger, at("2026-04-01T00:00:00Z")).unwrap();
        book.record_outcome(&id, FilingOutcome::Rejected, at("2026-04-10T00:00:00Z"))
            .unwrap();
        let err = book.submit(&id, &ledger, at("2026-04-12T00:00:00Z")).unwrap_err();
        assert!(matches!(
            err,
            HkdError::InvalidTransition {
                from: DeclarationStatus::Rejected,
                ..
            }
        ));
    }

    #[test]
    fn unknown_declaration_is_not_found() {
        let ledger = Ledger::new();
        let mut book = DeclarationBook::new();
        let err = book
            .submit("decl-404", &ledger, at("2026-04-01T00:00:00Z"))
            .unwrap_err();
        assert_eq!(err, HkdError::DeclarationNotFound("decl-404".to_string()));
    }

    #[test]
    fn upcoming_uses_largest_reminder_window() {
        let mut book = DeclarationBook::new();
        book.schedule(2026, at("2026-01-01T00:00:00Z"));

        let reminders = book.upcoming(date("2026-04-05"), &[30, 10, 1]);
        let periods: Vec<_> = reminders.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, ["Q1/2026"]);
        assert_eq!(reminders[0].days_left, 25);
        assert!(!reminders[0].overdue);

        let late = book.upcoming(date("2026-05-02"), &[]);
        assert_eq!(late.len(), 1);
        assert!(late[0].overdue);
        assert_eq!(late[0].days_left, -2);
    }

    #[test]
    fn serializes_form_codes_and_period_labels() {
        let (book, id) = book_with_q1();
        let json = serde_json::to_value(book.get(&id).unwrap()).unwrap();
        assert_eq!(json["type"], "01/CNKD");
        assert_eq!(json["period"], "Q1/2026");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["dueDate"], "2026-04-30");
        assert!(json.get("gdtReferenceNumber").is_none());
    }
}
