use chrono::{Datelike, NaiveDate};
use futures_util::future::join_all;
use reqwest::Method;

use crate::{
    middleware::session::BackendSession,
    models::menu::{CreateMenuWeekRequest, MenuJourDto, WeekMenu},
    services::{
        backend::{BackendClient, BackendError},
        week::{backend_jour, mondays_in_month},
    },
};

pub struct MenuService;

impl MenuService {
    /// Menu week starting on `monday`. The backend answers 500 or 404 when no week
    /// exists yet, so every failure degrades to an empty list.
    pub async fn week_by_date(
        backend: &BackendClient,
        session: &BackendSession,
        monday: NaiveDate,
    ) -> Vec<WeekMenu> {
        let query = [("dateDebut", monday.to_string())];
        match backend
            .get_json::<Vec<WeekMenu>>("menu_week.by_date", "/menu-week/by-date", &query, session)
            .await
        {
            Ok(weeks) => weeks,
            Err(BackendError::NotFound) | Err(BackendError::Status { status: 500, .. }) => {
                tracing::info!("No menu week found for date: {}", monday);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to fetch menu week for {}: {}", monday, e);
                Vec::new()
            }
        }
    }

    /// First week starting on `monday`, if any.
    pub async fn find_week(
        backend: &BackendClient,
        session: &BackendSession,
        monday: NaiveDate,
    ) -> Option<WeekMenu> {
        Self::week_by_date(backend, session, monday)
            .await
            .into_iter()
            .next()
    }

    /// All menu weeks touching the month of `date`, fetched concurrently.
    pub async fn weeks_for_month(
        backend: &BackendClient,
        session: &BackendSession,
        date: NaiveDate,
    ) -> Vec<WeekMenu> {
        let mondays = mondays_in_month(date.year(), date.month());
        let weeks = join_all(
            mondays
                .iter()
                .map(|&monday| Self::week_by_date(backend, session, monday)),
        )
        .await;
        weeks.into_iter().flatten().collect()
    }

    /// Create or replace a week. French `jour` tokens are translated for the backend.
    pub async fn create_or_update(
        backend: &BackendClient,
        session: &BackendSession,
        request: &CreateMenuWeekRequest,
    ) -> Result<WeekMenu, BackendError> {
        let body = Self::to_backend(request);
        tracing::info!(
            "Saving menu week {} → {} ({} days, status {})",
            body.date_debut,
            body.date_fin,
            body.menu_jours.len(),
            body.status
        );
        backend
            .send_json(
                "menu_week.create",
                Method::POST,
                "/menu-week/create",
                &[],
                Some(&body),
                session,
            )
            .await
    }

    pub async fn update_status(
        backend: &BackendClient,
        session: &BackendSession,
        id: i64,
        new_status: &str,
    ) -> Result<serde_json::Value, BackendError> {
        let query = [("newStatus", new_status.to_string())];
        backend
            .send_json::<(), _>(
                "menu_week.status",
                Method::PUT,
                &format!("/menu-week/{id}/status"),
                &query,
                None,
                session,
            )
            .await
    }

    fn to_backend(request: &CreateMenuWeekRequest) -> CreateMenuWeekRequest {
        CreateMenuWeekRequest {
            menu_jours: request
                .menu_jours
                .iter()
                .map(|jour| MenuJourDto {
                    jour: backend_jour(&jour.jour),
                    ..jour.clone()
                })
                .collect(),
            ..request.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::menu::MenuStatus;

    #[test]
    fn backend_payload_uses_english_days() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let request = CreateMenuWeekRequest {
            date_debut: date,
            date_fin: date,
            status: MenuStatus::Publie,
            menu_jours: vec![MenuJourDto {
                id: None,
                jour: "LUNDI".into(),
                date,
                plat_dejeuner_id: Some(1),
                plat_diner_id: None,
                alternatives_dejeuner_ids: vec![2],
                alternatives_diner_ids: vec![],
                entrees_jours_ids: vec![],
                desserts_jours_ids: vec![],
            }],
        };

        let body = MenuService::to_backend(&request);
        assert_eq!(body.menu_jours[0].jour, "MONDAY");
        assert_eq!(body.menu_jours[0].alternatives_dejeuner_ids, vec![2]);
        assert_eq!(body.status, MenuStatus::Publie);
    }
}
