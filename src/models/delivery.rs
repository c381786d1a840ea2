use serde::{Deserialize, Serialize};

/// A courier as returned by `/livreurs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Livreur {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub telephone: String,
    pub zone: String,
    #[serde(default)]
    pub commandes: Vec<serde_json::Value>,
}

/// Body for POST /livreurs and PUT /livreurs/{id}.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivreurRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nom: String,
    pub prenom: String,
    pub telephone: String,
    pub zone: String,
}

/// Body for POST /livreurs/affecter-commandes and /desaffecter-commandes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignCommandesRequest {
    pub livreur_id: Option<i64>,
    pub commande_ids: Option<Vec<i64>>,
}

impl AssignCommandesRequest {
    /// Both fields are required and the id list must not be empty.
    pub fn validated(&self) -> Option<(i64, &[i64])> {
        match (self.livreur_id, self.commande_ids.as_deref()) {
            (Some(livreur), Some(ids)) if livreur > 0 && !ids.is_empty() => Some((livreur, ids)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_requires_courier_and_orders() {
        let ok = AssignCommandesRequest { livreur_id: Some(3), commande_ids: Some(vec![1, 2]) };
        assert_eq!(ok.validated(), Some((3, &[1, 2][..])));

        let missing = AssignCommandesRequest { livreur_id: None, commande_ids: Some(vec![1]) };
        assert!(missing.validated().is_none());

        let empty = AssignCommandesRequest { livreur_id: Some(3), commande_ids: Some(vec![]) };
        assert!(empty.validated().is_none());
    }
}
