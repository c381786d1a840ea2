use bytes::Bytes;
use chrono::NaiveDate;
use reqwest::{multipart, Method};
use serde_json::Value;

use crate::{
    middleware::session::BackendSession,
    models::{
        dish::{Plat, PlatData, PlatDetail, PlatFilter},
        menu::DishId,
    },
    services::backend::{BackendClient, BackendError},
};

/// An image received from the dashboard, ready to be relayed.
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

pub struct DishService;

impl DishService {
    /// Catalog listing. Failures degrade to an empty catalog.
    pub async fn list(
        backend: &BackendClient,
        session: &BackendSession,
        filter: PlatFilter,
    ) -> Vec<Plat> {
        backend
            .get_json("plats.list", &format!("/plats/{}", filter.as_str()), &[], session)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Error fetching plats ({}): {}", filter.as_str(), e);
                Vec::new()
            })
    }

    /// A single dish, `None` when it does not exist or cannot be fetched.
    pub async fn get(
        backend: &BackendClient,
        session: &BackendSession,
        id: DishId,
    ) -> Option<Plat> {
        match backend
            .get_json("plats.get", &format!("/plats/{id}"), &[], session)
            .await
        {
            Ok(plat) => Some(plat),
            Err(BackendError::NotFound) => None,
            Err(e) => {
                tracing::warn!("Error fetching plat {}: {}", id, e);
                None
            }
        }
    }

    pub async fn create(
        backend: &BackendClient,
        session: &BackendSession,
        data: &PlatData,
    ) -> Result<Plat, BackendError> {
        backend
            .send_json("plats.add", Method::POST, "/plats/add", &[], Some(data), session)
            .await
    }

    pub async fn update(
        backend: &BackendClient,
        session: &BackendSession,
        id: DishId,
        data: &PlatData,
    ) -> Result<Plat, BackendError> {
        backend
            .send_json(
                "plats.update",
                Method::PUT,
                &format!("/plats/update/{id}"),
                &[],
                Some(data),
                session,
            )
            .await
    }

    pub async fn delete(
        backend: &BackendClient,
        session: &BackendSession,
        id: DishId,
    ) -> Result<(), BackendError> {
        backend
            .delete("plats.delete", &format!("/plats/delete/{id}"), session)
            .await
    }

    /// Calories and price of a dish for one customer profile.
    pub async fn calories(
        backend: &BackendClient,
        session: &BackendSession,
        id: DishId,
        type_user: &str,
    ) -> Result<Value, BackendError> {
        backend
            .get_json(
                "plats.calories",
                &format!("/api/plat-calories/{id}/{type_user}"),
                &[],
                session,
            )
            .await
    }

    pub async fn stats_week(
        backend: &BackendClient,
        session: &BackendSession,
        id: DishId,
        date_debut: NaiveDate,
    ) -> Result<Value, BackendError> {
        let query = [("dateDebut", date_debut.to_string())];
        backend
            .get_json("plats.stats_week", &format!("/plats/{id}/stats-week"), &query, session)
            .await
    }

    /// Allergy breakdown for a week; `None` when the backend has no data.
    pub async fn allergy_stats_week(
        backend: &BackendClient,
        session: &BackendSession,
        id: DishId,
        date_debut: NaiveDate,
    ) -> Result<Option<Value>, BackendError> {
        let query = [("dateDebut", date_debut.to_string())];
        match backend
            .get_json(
                "plats.allergy_stats",
                &format!("/plats/{id}/allergy-stats/week"),
                &query,
                session,
            )
            .await
        {
            Ok(stats) => Ok(Some(stats)),
            Err(BackendError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Production report: how often each dish was ordered on a day (or its week).
    /// `None` when nothing is planned for that date.
    pub async fn plats_details(
        backend: &BackendClient,
        session: &BackendSession,
        date: NaiveDate,
        type_plat: &str,
        week: bool,
    ) -> Result<Option<Vec<PlatDetail>>, BackendError> {
        let mut query = vec![("date", date.to_string()), ("typePlat", type_plat.to_string())];
        if week {
            query.push(("week", "true".to_string()));
        }
        match backend
            .get_json("plats.details", "/plats/menujours/plats-details", &query, session)
            .await
        {
            Ok(details) => Ok(Some(details)),
            Err(BackendError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn upload_photo(
        backend: &BackendClient,
        session: &BackendSession,
        id: DishId,
        photo: PhotoUpload,
    ) -> Result<Value, BackendError> {
        let size = photo.bytes.len();
        let part = multipart::Part::stream(photo.bytes)
            .file_name(photo.file_name)
            .mime_str(&photo.content_type)?;
        let form = multipart::Form::new().part("file", part);
        tracing::info!("Uploading photo for plat {} ({} bytes)", id, size);
        backend
            .post_multipart("plats.upload_photo", &format!("/plats/{id}/upload-photo"), form, session)
            .await
    }
}
