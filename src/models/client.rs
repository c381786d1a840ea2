use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adresse {
    pub rue: String,
    pub ville: String,
    pub code_postal: String,
    pub region: String,
}

/// Light client record used by the clients table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: serde_json::Value,
    pub username: String,
    pub prenom: Option<String>,
    pub num_tel: String,
    pub type_user: String,
    pub verified: bool,
    #[serde(default)]
    pub adresse_mail: Option<String>,
    #[serde(default)]
    pub adresse: Option<Adresse>,
    #[serde(default)]
    pub has_allergy: Option<bool>,
    #[serde(default)]
    pub allergy_details: Option<String>,
}

/// Spring-style page envelope returned by `/client/clients-light`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
    pub size: u32,
    pub number: u32,
}

/// Query params for GET /api/client/clients-light.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn size(&self) -> u32 {
        self.size.unwrap_or(10).clamp(1, 100)
    }
}
