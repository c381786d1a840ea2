use chrono::NaiveDate;
use serde::Deserialize;

/// Query params for GET /api/commandes/by-date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByDateQuery {
    pub date_livraison: Option<NaiveDate>,
}

/// Query params for GET /api/commandes/by-date-range.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByDateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ByDateRangeQuery {
    /// Both bounds present and ordered.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }
}
