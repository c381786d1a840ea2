use chrono::NaiveDate;
use serde_json::Value;

use crate::{
    middleware::session::BackendSession,
    services::backend::{BackendClient, BackendError},
};

pub struct OrderService;

impl OrderService {
    /// Orders delivered on `date`; an unknown date is an empty day.
    pub async fn by_date(
        backend: &BackendClient,
        session: &BackendSession,
        date: NaiveDate,
    ) -> Result<Vec<Value>, BackendError> {
        let query = [("dateLivraison", date.to_string())];
        empty_when_missing(
            backend
                .get_json("commandes.by_date", "/commandes/by-date", &query, session)
                .await,
        )
    }

    pub async fn by_date_range(
        backend: &BackendClient,
        session: &BackendSession,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Value>, BackendError> {
        let query = [("startDate", start.to_string()), ("endDate", end.to_string())];
        empty_when_missing(
            backend
                .get_json("commandes.by_date_range", "/commandes/by-date-range", &query, session)
                .await,
        )
    }

    /// Order history of one client.
    pub async fn by_client(
        backend: &BackendClient,
        session: &BackendSession,
        client_id: &str,
    ) -> Result<Value, BackendError> {
        backend
            .get_json(
                "commandes.by_client",
                &format!("/commandes/client/{client_id}"),
                &[],
                session,
            )
            .await
    }
}

fn empty_when_missing(result: Result<Vec<Value>, BackendError>) -> Result<Vec<Value>, BackendError> {
    match result {
        Err(BackendError::NotFound) => Ok(Vec::new()),
        other => other,
    }
}
