use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a dish in the remote catalog.
pub type DishId = i64;

/// A chosen dish and how many units were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSelection {
    pub id: DishId,
    pub quantity: u32,
}

impl MealSelection {
    /// Every dashboard call site picks exactly one unit.
    pub fn single(id: DishId) -> Self {
        Self { id, quantity: 1 }
    }
}

/// Editable selection state for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyOrder {
    pub date: NaiveDate,
    pub plat_dejeuner: Option<MealSelection>,
    pub plat_diner: Option<MealSelection>,
    pub plat_dejeuner_alt: Vec<MealSelection>,
    pub plat_diner_alt: Vec<MealSelection>,
    pub entrees: Vec<MealSelection>,
    pub desserts: Vec<MealSelection>,
}

impl DailyOrder {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            plat_dejeuner: None,
            plat_diner: None,
            plat_dejeuner_alt: Vec::new(),
            plat_diner_alt: Vec::new(),
            entrees: Vec::new(),
            desserts: Vec::new(),
        }
    }

    pub fn main(&self, meal: Meal) -> Option<MealSelection> {
        match meal {
            Meal::Dejeuner => self.plat_dejeuner,
            Meal::Diner => self.plat_diner,
        }
    }

    pub fn list(&self, list: SelectionList) -> &[MealSelection] {
        match list {
            SelectionList::PlatDejeunerAlt => &self.plat_dejeuner_alt,
            SelectionList::PlatDinerAlt => &self.plat_diner_alt,
            SelectionList::Entrees => &self.entrees,
            SelectionList::Desserts => &self.desserts,
        }
    }

    pub(crate) fn list_mut(&mut self, list: SelectionList) -> &mut Vec<MealSelection> {
        match list {
            SelectionList::PlatDejeunerAlt => &mut self.plat_dejeuner_alt,
            SelectionList::PlatDinerAlt => &mut self.plat_diner_alt,
            SelectionList::Entrees => &mut self.entrees,
            SelectionList::Desserts => &mut self.desserts,
        }
    }

    pub(crate) fn main_mut(&mut self, meal: Meal) -> &mut Option<MealSelection> {
        match meal {
            Meal::Dejeuner => &mut self.plat_dejeuner,
            Meal::Diner => &mut self.plat_diner,
        }
    }

    pub fn has_any_main(&self) -> bool {
        self.plat_dejeuner.is_some() || self.plat_diner.is_some()
    }

    /// No dish of any kind selected.
    pub fn is_empty(&self) -> bool {
        !self.has_any_main()
            && self.plat_dejeuner_alt.is_empty()
            && self.plat_diner_alt.is_empty()
            && self.entrees.is_empty()
            && self.desserts.is_empty()
    }
}

/// The two services of a day: lunch and dinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Meal {
    Dejeuner,
    Diner,
}

impl Meal {
    pub fn other(self) -> Meal {
        match self {
            Meal::Dejeuner => Meal::Diner,
            Meal::Diner => Meal::Dejeuner,
        }
    }

    pub fn alternates(self) -> SelectionList {
        match self {
            Meal::Dejeuner => SelectionList::PlatDejeunerAlt,
            Meal::Diner => SelectionList::PlatDinerAlt,
        }
    }
}

/// List-valued fields of a [`DailyOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionList {
    PlatDejeunerAlt,
    PlatDinerAlt,
    Entrees,
    Desserts,
}

/// Any field of a [`DailyOrder`] except its date, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderField {
    PlatDejeuner,
    PlatDiner,
    PlatDejeunerAlt,
    PlatDinerAlt,
    Entrees,
    Desserts,
}

/// Either a main dish slot or one of the lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Main(Meal),
    List(SelectionList),
}

impl OrderField {
    pub fn kind(self) -> FieldKind {
        match self {
            OrderField::PlatDejeuner => FieldKind::Main(Meal::Dejeuner),
            OrderField::PlatDiner => FieldKind::Main(Meal::Diner),
            OrderField::PlatDejeunerAlt => FieldKind::List(SelectionList::PlatDejeunerAlt),
            OrderField::PlatDinerAlt => FieldKind::List(SelectionList::PlatDinerAlt),
            OrderField::Entrees => FieldKind::List(SelectionList::Entrees),
            OrderField::Desserts => FieldKind::List(SelectionList::Desserts),
        }
    }
}

impl std::str::FromStr for OrderField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "platDejeuner" => Ok(OrderField::PlatDejeuner),
            "platDiner" => Ok(OrderField::PlatDiner),
            "platDejeunerAlt" => Ok(OrderField::PlatDejeunerAlt),
            "platDinerAlt" => Ok(OrderField::PlatDinerAlt),
            "entrees" => Ok(OrderField::Entrees),
            "desserts" => Ok(OrderField::Desserts),
            _ => Err(anyhow::anyhow!("Unknown order field: {s}")),
        }
    }
}

/// Publication status of a menu week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MenuStatus {
    #[default]
    #[serde(rename = "BROUILLON")]
    Brouillon,
    #[serde(rename = "PUBLIÉ")]
    Publie,
    #[serde(rename = "ARCHIVÉ")]
    Archive,
}

impl MenuStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MenuStatus::Brouillon => "BROUILLON",
            MenuStatus::Publie => "PUBLIÉ",
            MenuStatus::Archive => "ARCHIVÉ",
        }
    }
}

impl std::fmt::Display for MenuStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire record of one day's dish ids. The backend sends `null` for empty lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuJourDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub jour: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub plat_dejeuner_id: Option<DishId>,
    #[serde(default)]
    pub plat_diner_id: Option<DishId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub alternatives_dejeuner_ids: Vec<DishId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub alternatives_diner_ids: Vec<DishId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entrees_jours_ids: Vec<DishId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub desserts_jours_ids: Vec<DishId>,
}

/// Wire record of a full week as returned by `GET /menu-week/by-date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekMenu {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub is_publied: bool,
    #[serde(default)]
    pub status: Option<String>,
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub menu_jours: Vec<MenuJourDto>,
}

impl WeekMenu {
    pub fn day(&self, date: NaiveDate) -> Option<&MenuJourDto> {
        self.menu_jours.iter().find(|j| j.date == date)
    }
}

/// Body for POST /menu-week/create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuWeekRequest {
    pub date_debut: NaiveDate,
    pub date_fin: NaiveDate,
    pub status: MenuStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub menu_jours: Vec<MenuJourDto>,
}

/// Query params for GET /api/menu-week/by-date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuWeekQuery {
    pub date_debut: Option<NaiveDate>,
}

/// Query params for GET /api/menu-week/month.
#[derive(Debug, Deserialize)]
pub struct MenuMonthQuery {
    /// Any date inside the desired month.
    pub date: NaiveDate,
}

/// Query params for PUT /api/menu-week/{id}/status.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuStatusQuery {
    pub new_status: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
