use crate::error::ValidationError;
use crate::operations::validate::validate;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A spending event as it is stored, with the id assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendingRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub industry: String,
    pub business: String,
    pub items: String,
    pub cost: Decimal,
    pub note: Option<String>,
}

impl SpendingRecord {
    pub fn from_new(id: i64, spend: NewSpend) -> Self {
        Self {
            id,
            date: spend.date,
            industry: spend.industry,
            business: spend.business,
            items: spend.items,
            cost: spend.cost,
            note: spend.note,
        }
    }
}

/// A validated spending event that has not been persisted yet.
///
/// Only `SpendBuilder::build` can produce one, so every instance has passed
/// validation and carries a cost rounded to two decimal places.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpend {
    date: NaiveDate,
    industry: String,
    business: String,
    items: String,
    cost: Decimal,
    note: Option<String>,
}

impl NewSpend {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn industry(&self) -> &str {
        &self.industry
    }

    pub fn business(&self) -> &str {
        &self.business
    }

    pub fn items(&self) -> &str {
        &self.items
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct SpendBuilder {
    date: Option<NaiveDate>,
    industry: String,
    business: String,
    items: String,
    cost: Decimal,
    note: Option<String>,
}

impl SpendBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn industry(mut self, industry: &str) -> Self {
        self.industry = normalize(industry);
        self
    }

    pub fn business(mut self, business: &str) -> Self {
        self.business = normalize(business);
        self
    }

    pub fn items(mut self, items: &str) -> Self {
        self.items = normalize(items);
        self
    }

    pub fn cost(mut self, cost: Decimal) -> Self {
        self.cost = cost.round_dp(2);
        self
    }

    /// Blank notes are dropped.
    pub fn note(mut self, note: &str) -> Self {
        let note = normalize(note);
        self.note = if note.is_empty() { None } else { Some(note) };
        self
    }

    pub fn build(self) -> Result<NewSpend, ValidationError> {
        validate(
            self.cost,
            &self.industry,
            &self.business,
            &self.items,
            self.date,
        )?;
        // validate accepts a missing date when a text field is filled in
        let date = self.date.ok_or(ValidationError::EmptyFields)?;

        Ok(NewSpend {
            date,
            industry: self.industry,
            business: self.business,
            items: self.items,
            cost: self.cost,
            note: self.note,
        })
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
