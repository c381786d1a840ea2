use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::menu::DishId;

/// Catalog category of a dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlatType {
    Plat,
    Entree,
    Dessert,
}

/// Catalog filter accepted by `GET /plats/{filter}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatFilter {
    All,
    Only(PlatType),
}

impl PlatFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            PlatFilter::All => "ALL",
            PlatFilter::Only(PlatType::Plat) => "PLAT",
            PlatFilter::Only(PlatType::Entree) => "ENTREE",
            PlatFilter::Only(PlatType::Dessert) => "DESSERT",
        }
    }
}

impl std::str::FromStr for PlatFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(PlatFilter::All),
            "PLAT" => Ok(PlatFilter::Only(PlatType::Plat)),
            "ENTREE" => Ok(PlatFilter::Only(PlatType::Entree)),
            "DESSERT" => Ok(PlatFilter::Only(PlatType::Dessert)),
            _ => Err(anyhow::anyhow!("Unknown plat filter: {s}")),
        }
    }
}

/// Calories and price of a dish for one customer profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatCalories {
    pub type_user: String,
    pub calories: f64,
    pub prix: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plat {
    pub id: DishId,
    pub nom_plat: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredient: String,
    #[serde(default)]
    pub photo: Option<String>,
    pub type_plat: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prix: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plat_calories: Option<Vec<PlatCalories>>,
}

/// Body for POST /plats/add and PUT /plats/update/{id}.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatData {
    pub nom_plat: String,
    pub description: String,
    pub ingredient: String,
    #[serde(default)]
    pub photo: Option<String>,
    pub type_plat: PlatType,
    #[serde(default)]
    pub plat_calories: Vec<PlatCalories>,
}

impl PlatData {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.nom_plat.trim().is_empty(), "Le nom du plat est requis");
        for c in &self.plat_calories {
            anyhow::ensure!(
                c.calories >= 0.0 && c.prix >= 0.0,
                "Calories et prix doivent être positifs ({})",
                c.type_user
            );
        }
        Ok(())
    }
}

/// Query params for GET /api/plats/{id}/stats-week and allergy-stats/week.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekStatsQuery {
    pub date_debut: Option<NaiveDate>,
}

/// Query params for GET /api/plats/menujours/plats-details.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatsDetailsQuery {
    pub date: Option<NaiveDate>,
    pub type_plat: Option<String>,
    #[serde(default)]
    pub week: bool,
}

/// One line of the production report: how many times a dish was ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatDetail {
    pub id: DishId,
    pub nom: String,
    pub nb_commandes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parses_case_insensitively() {
        assert_eq!("entree".parse::<PlatFilter>().unwrap(), PlatFilter::Only(PlatType::Entree));
        assert_eq!("ALL".parse::<PlatFilter>().unwrap().as_str(), "ALL");
        assert!("soupe".parse::<PlatFilter>().is_err());
    }

    #[test]
    fn plat_data_rejects_blank_name() {
        let data = PlatData {
            nom_plat: "  ".into(),
            description: String::new(),
            ingredient: String::new(),
            photo: None,
            type_plat: PlatType::Plat,
            plat_calories: vec![],
        };
        assert!(data.validate().is_err());
    }
}
