use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Ordered `(key, total)` pairs, keys in the order they were first seen.
pub type Totals<K> = Vec<(K, Decimal)>;

/// The six views drawn by the analysis report.
///
/// None of these are persisted; they are rebuilt from the full record set
/// every time the report runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportViews {
    pub monthly_totals: Totals<String>,
    pub business_frequency: Vec<(String, usize)>,
    pub current_month_business_totals: Totals<String>,
    pub current_month_industry_totals: Totals<String>,
    pub current_month_item_totals: Totals<String>,
    pub current_month_daily_totals: Totals<NaiveDate>,
}

impl ReportViews {
    pub fn is_empty(&self) -> bool {
        self.monthly_totals.is_empty() && self.business_frequency.is_empty()
    }
}
