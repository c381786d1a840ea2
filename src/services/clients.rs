use reqwest::Method;
use serde_json::Value;

use crate::{
    middleware::session::BackendSession,
    models::client::{Client, Page},
    services::backend::{BackendClient, BackendError},
};

pub struct ClientService;

impl ClientService {
    pub async fn list(
        backend: &BackendClient,
        session: &BackendSession,
        page: u32,
        size: u32,
    ) -> Result<Page<Client>, BackendError> {
        let query = [("page", page.to_string()), ("size", size.to_string())];
        backend
            .get_json("client.list", "/client/clients-light", &query, session)
            .await
    }

    /// Full client profile, including allergies and address.
    pub async fn get(
        backend: &BackendClient,
        session: &BackendSession,
        id: &str,
    ) -> Result<Value, BackendError> {
        backend
            .get_json("client.get", &format!("/client/{id}"), &[], session)
            .await
    }

    pub async fn update(
        backend: &BackendClient,
        session: &BackendSession,
        id: &str,
        body: &Value,
    ) -> Result<Value, BackendError> {
        backend
            .send_json(
                "client.update",
                Method::PUT,
                &format!("/client/{id}/update"),
                &[],
                Some(body),
                session,
            )
            .await
    }
}
