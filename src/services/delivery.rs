use reqwest::Method;
use serde_json::{json, Value};

use crate::{
    middleware::session::BackendSession,
    models::delivery::{Livreur, LivreurRequest},
    services::backend::{BackendClient, BackendError},
};

pub struct DeliveryService;

impl DeliveryService {
    pub async fn list_livreurs(
        backend: &BackendClient,
        session: &BackendSession,
    ) -> Result<Vec<Livreur>, BackendError> {
        backend
            .get_json("livreurs.list", "/livreurs", &[], session)
            .await
    }

    pub async fn get_livreur(
        backend: &BackendClient,
        session: &BackendSession,
        id: i64,
    ) -> Result<Livreur, BackendError> {
        backend
            .get_json("livreurs.get", &format!("/livreurs/{id}"), &[], session)
            .await
    }

    pub async fn create_livreur(
        backend: &BackendClient,
        session: &BackendSession,
        body: &LivreurRequest,
    ) -> Result<Livreur, BackendError> {
        backend
            .send_json("livreurs.create", Method::POST, "/livreurs", &[], Some(body), session)
            .await
    }

    pub async fn update_livreur(
        backend: &BackendClient,
        session: &BackendSession,
        id: i64,
        body: &LivreurRequest,
    ) -> Result<Livreur, BackendError> {
        let body = LivreurRequest {
            id: Some(id),
            ..body.clone()
        };
        backend
            .send_json(
                "livreurs.update",
                Method::PUT,
                &format!("/livreurs/{id}"),
                &[],
                Some(&body),
                session,
            )
            .await
    }

    pub async fn delete_livreur(
        backend: &BackendClient,
        session: &BackendSession,
        id: i64,
    ) -> Result<(), BackendError> {
        backend
            .delete("livreurs.delete", &format!("/livreurs/{id}"), session)
            .await
    }

    /// Attach (`assign = true`) or detach orders from a courier.
    pub async fn set_assignment(
        backend: &BackendClient,
        session: &BackendSession,
        livreur_id: i64,
        commande_ids: &[i64],
        assign: bool,
    ) -> Result<Value, BackendError> {
        let (endpoint, path) = if assign {
            ("livreurs.assign", "/livreurs/affecter-commandes")
        } else {
            ("livreurs.unassign", "/livreurs/desaffecter-commandes")
        };
        let body = json!({ "livreurId": livreur_id, "commandeIds": commande_ids });
        tracing::info!(
            "{} {} commande(s) for livreur {}",
            if assign { "Assigning" } else { "Unassigning" },
            commande_ids.len(),
            livreur_id
        );
        backend
            .send_json(endpoint, Method::POST, path, &[], Some(&body), session)
            .await
    }

    /// Packaging options offered at checkout.
    pub async fn list_emballages(
        backend: &BackendClient,
        session: &BackendSession,
    ) -> Result<Value, BackendError> {
        backend
            .get_json("emballage.list", "/emballage/all", &[], session)
            .await
    }

    pub async fn get_emballage(
        backend: &BackendClient,
        session: &BackendSession,
        id: i64,
    ) -> Result<Value, BackendError> {
        backend
            .get_json("emballage.get", &format!("/emballage/{id}"), &[], session)
            .await
    }
}
