use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use barstock_core::{
    DomainError, DomainResult, Entity, IncomeSourceId, KeyedAmounts, Registry, SessionId,
};

/// Declared income per income source.
pub type IncomeBySource = KeyedAmounts<IncomeSourceId>;

/// How the session's income was actually collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplit {
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub card: f64,
    #[serde(default)]
    pub transfer: f64,
}

impl PaymentSplit {
    pub fn total(&self) -> f64 {
        self.cash + self.card + self.transfer
    }
}

/// Money paid out of the till during the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub concept: String,
    pub amount: f64,
}

/// One cash-register session (typically one business day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSession {
    id: SessionId,
    date: NaiveDate,
    #[serde(default)]
    label: String,
    #[serde(default)]
    income_by_source: IncomeBySource,
    #[serde(default)]
    payments: PaymentSplit,
    #[serde(default)]
    expenses: Vec<Expense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl CashSession {
    pub fn new(id: SessionId, date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            id,
            date,
            label: label.into(),
            income_by_source: IncomeBySource::new(),
            payments: PaymentSplit::default(),
            expenses: Vec::new(),
            notes: None,
        }
    }

    pub fn with_income(mut self, source: IncomeSourceId, amount: f64) -> Self {
        self.income_by_source.set(source, amount);
        self
    }

    pub fn with_payments(mut self, payments: PaymentSplit) -> Self {
        self.payments = payments;
        self
    }

    pub fn with_expense(mut self, concept: impl Into<String>, amount: f64) -> Self {
        self.expenses.push(Expense {
            concept: concept.into(),
            amount,
        });
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn id_typed(&self) -> SessionId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn income_by_source(&self) -> &IncomeBySource {
        &self.income_by_source
    }

    pub fn payments(&self) -> PaymentSplit {
        self.payments
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn total_income(&self) -> f64 {
        self.income_by_source.total()
    }

    pub fn total_payments(&self) -> f64 {
        self.payments.total()
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    pub fn net(&self) -> f64 {
        self.total_income() - self.total_expenses()
    }

    /// Declared income minus collected payments.
    ///
    /// A non-zero value means the split does not add up; it is reported, not rejected.
    pub fn payment_discrepancy(&self) -> f64 {
        self.total_income() - self.total_payments()
    }

    pub fn validate(&self, sources: &Registry<IncomeSourceId>) -> DomainResult<()> {
        self.income_by_source.validate_against(sources)?;
        if self.income_by_source.iter().any(|(_, a)| a < 0.0) {
            return Err(DomainError::validation("income cannot be negative"));
        }

        let p = self.payments;
        if [p.cash, p.card, p.transfer]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(DomainError::validation(
                "payment amounts must be non-negative numbers",
            ));
        }

        for expense in &self.expenses {
            if expense.concept.trim().is_empty() {
                return Err(DomainError::validation("expense concept cannot be empty"));
            }
            if !(expense.amount.is_finite() && expense.amount >= 0.0) {
                return Err(DomainError::validation(format!(
                    "expense '{}' must have a non-negative amount",
                    expense.concept
                )));
            }
        }
        Ok(())
    }
}

impl Entity for CashSession {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Aggregated figures over a date range of sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub sessions: usize,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net: f64,
    pub payment_discrepancy: f64,
    pub income_by_source: IncomeBySource,
}

/// Summarize sessions whose date falls in `from..=to`.
pub fn summarize(sessions: &[CashSession], from: NaiveDate, to: NaiveDate) -> SessionSummary {
    let mut summary = SessionSummary {
        from,
        to,
        sessions: 0,
        total_income: 0.0,
        total_expenses: 0.0,
        net: 0.0,
        payment_discrepancy: 0.0,
        income_by_source: IncomeBySource::new(),
    };

    for s in sessions.iter().filter(|s| s.date >= from && s.date <= to) {
        summary.sessions += 1;
        summary.total_income += s.total_income();
        summary.total_expenses += s.total_expenses();
        summary.payment_discrepancy += s.payment_discrepancy();
        for (source, amount) in s.income_by_source.iter() {
            let running = summary.income_by_source.get(source);
            summary.income_by_source.set(source.clone(), running + amount);
        }
    }
    summary.net = summary.total_income - summary.total_expenses;
    summary
}
