use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::menu::{
    CreateMenuWeekRequest, DailyOrder, DishId, FieldKind, MealSelection, MenuStatus, OrderField,
    WeekMenu,
};
use crate::services::order_store::WeeklyOrderStore;
use crate::services::week::{menu_days, week_start, MenuDay};

/// What a dish picked in the dashboard selector is meant to become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionTarget {
    PlatDejeuner,
    PlatDiner,
    PlatDejeunerAlt,
    PlatDinerAlt,
    Entree,
    Dessert,
}

/// A pick refused because the dish it depends on is missing.
/// The messages are shown to the kitchen staff as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatingError {
    #[error("Veuillez sélectionner au moins un plat principal (déjeuner ou dîner) avant d'ajouter des entrées ou desserts.")]
    MissingMainDish,
    #[error("Veuillez sélectionner un plat principal pour le déjeuner avant d'ajouter des alternatives.")]
    MissingLunchMain,
    #[error("Veuillez sélectionner un plat principal pour le dîner avant d'ajouter des alternatives.")]
    MissingDinnerMain,
    #[error("Le jour {0} ne fait pas partie de la semaine en cours.")]
    DayOutsideWeek(NaiveDate),
}

/// Proof that a week load was started; stale once another load begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    monday: NaiveDate,
}

impl LoadTicket {
    pub fn monday(&self) -> NaiveDate {
        self.monday
    }
}

/// One editing session of a menu week: the order store plus the interaction rules
/// around it (gating, cascades, user edits surviving reloads, stale loads).
#[derive(Debug, Clone)]
pub struct MenuEditor {
    store: WeeklyOrderStore,
    remote: Option<WeekMenu>,
    modified: BTreeSet<NaiveDate>,
    generation: u64,
}

/// Serializable snapshot of an editor for the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub days: Vec<MenuDay>,
    pub orders: Vec<DailyOrder>,
    pub week_menu: Option<WeekMenu>,
    pub modified_days: Vec<NaiveDate>,
}

impl MenuEditor {
    pub fn new(monday: NaiveDate) -> Self {
        Self {
            store: WeeklyOrderStore::new(menu_days(monday)),
            remote: None,
            modified: BTreeSet::new(),
            generation: 0,
        }
    }

    pub fn store(&self) -> &WeeklyOrderStore {
        &self.store
    }

    pub fn remote_week(&self) -> Option<&WeekMenu> {
        self.remote.as_ref()
    }

    pub fn monday(&self) -> Option<NaiveDate> {
        self.store.days().first().map(|d| d.date)
    }

    pub fn is_modified(&self, date: NaiveDate) -> bool {
        self.modified.contains(&date)
    }

    pub fn view(&self) -> EditorView {
        EditorView {
            days: self.store.days().to_vec(),
            orders: self.store.days().iter().map(|d| self.store.order(d.date)).collect(),
            week_menu: self.remote.clone(),
            modified_days: self.modified.iter().copied().collect(),
        }
    }

    /// Ticket for (re)loading the current week without discarding edits.
    pub fn begin_reload(&mut self) -> Option<LoadTicket> {
        let monday = self.monday()?;
        self.generation += 1;
        Some(LoadTicket {
            generation: self.generation,
            monday,
        })
    }

    /// Switch to the week containing `date`. Every pending edit is dropped.
    pub fn select_week(&mut self, date: NaiveDate) -> LoadTicket {
        let monday = week_start(date);
        self.store.reset_order();
        self.store.set_days(menu_days(monday));
        self.remote = None;
        self.modified.clear();
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
            monday,
        }
    }

    /// Apply a fetched week. Returns `false` when the ticket was superseded.
    ///
    /// Days the user already edited keep their local state.
    pub fn apply_loaded_week(&mut self, ticket: LoadTicket, week: Option<WeekMenu>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale menu week load for {} (generation {} < {})",
                ticket.monday,
                ticket.generation,
                self.generation
            );
            return false;
        }
        if let Some(week) = &week {
            let dates: Vec<NaiveDate> = self.store.days().iter().map(|d| d.date).collect();
            for date in dates {
                if self.modified.contains(&date) {
                    continue;
                }
                if let Some(jour) = week.day(date) {
                    self.store.load_day(date, jour);
                }
            }
        }
        self.remote = week;
        true
    }

    fn ensure_in_week(&self, date: NaiveDate) -> Result<(), GatingError> {
        if self.store.days().iter().any(|d| d.date == date) {
            Ok(())
        } else {
            Err(GatingError::DayOutsideWeek(date))
        }
    }

    /// Check that `target` may be filled for `date` given the current mains.
    pub fn check(&self, date: NaiveDate, target: SelectionTarget) -> Result<(), GatingError> {
        self.ensure_in_week(date)?;
        let order = self.store.order(date);
        match target {
            SelectionTarget::Entree | SelectionTarget::Dessert if !order.has_any_main() => {
                Err(GatingError::MissingMainDish)
            }
            SelectionTarget::PlatDejeunerAlt if order.plat_dejeuner.is_none() => {
                Err(GatingError::MissingLunchMain)
            }
            SelectionTarget::PlatDinerAlt if order.plat_diner.is_none() => {
                Err(GatingError::MissingDinnerMain)
            }
            _ => Ok(()),
        }
    }

    /// Apply a dish picked for `target`. `Ok(false)` means the store rejected it as a
    /// duplicate and nothing changed.
    pub fn pick(
        &mut self,
        date: NaiveDate,
        target: SelectionTarget,
        selection: MealSelection,
    ) -> Result<bool, GatingError> {
        self.check(date, target)?;
        self.modified.insert(date);
        let changed = match target {
            SelectionTarget::PlatDejeuner => {
                self.store.set_plat_dejeuner(date, Some(selection));
                true
            }
            SelectionTarget::PlatDiner => {
                self.store.set_plat_diner(date, Some(selection));
                true
            }
            SelectionTarget::PlatDejeunerAlt => self.store.add_alt_plat_dejeuner(date, selection),
            SelectionTarget::PlatDinerAlt => self.store.add_alt_plat_diner(date, selection),
            SelectionTarget::Entree => self.store.add_entree(date, selection),
            SelectionTarget::Dessert => self.store.add_dessert(date, selection),
        };
        Ok(changed)
    }

    /// Remove a selection; removing a main cascades to whatever depends on it.
    pub fn remove(
        &mut self,
        date: NaiveDate,
        field: OrderField,
        id: DishId,
    ) -> Result<(), GatingError> {
        self.ensure_in_week(date)?;
        self.modified.insert(date);
        match field.kind() {
            FieldKind::Main(meal) => self.store.remove_main_dish(date, meal),
            FieldKind::List(list) => self.store.remove_list_selection(date, list, id),
        }
        Ok(())
    }

    /// Drop local edits for `date` and restore what the backend holds, if anything.
    pub fn cancel_day(&mut self, date: NaiveDate) -> Result<(), GatingError> {
        self.ensure_in_week(date)?;
        self.store.reset_day(date);
        if let Some(jour) = self.remote.as_ref().and_then(|w| w.day(date)) {
            self.store.load_day(date, jour);
        }
        self.modified.remove(&date);
        Ok(())
    }

    /// The week to send, tagged with the generation it was built from.
    /// `None` when no day holds a single dish.
    pub fn payload(&self, status: MenuStatus) -> Option<(LoadTicket, CreateMenuWeekRequest)> {
        if self.store.orders().values().all(DailyOrder::is_empty) {
            return None;
        }
        let ticket = LoadTicket {
            generation: self.generation,
            monday: self.monday()?,
        };
        Some((ticket, self.store.to_week_payload(status)?))
    }

    /// Forget local edit markers once the backend accepted the week. Returns `false`
    /// and changes nothing when the editor moved on since the payload was built.
    pub fn mark_saved(&mut self, ticket: LoadTicket, saved: WeekMenu) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Ignoring save acknowledgement for week of {} (generation {} < {})",
                ticket.monday,
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.modified.clear();
        self.remote = Some(saved);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::menu::MenuJourDto;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn one(id: DishId) -> MealSelection {
        MealSelection::single(id)
    }

    fn remote_week() -> WeekMenu {
        WeekMenu {
            id: Some(12),
            is_publied: false,
            status: Some("BROUILLON".into()),
            date_debut: date(4),
            date_fin: date(8),
            menu_jours: vec![MenuJourDto {
                id: Some(1),
                jour: "MONDAY".into(),
                date: date(4),
                plat_dejeuner_id: Some(5),
                plat_diner_id: None,
                alternatives_dejeuner_ids: vec![6, 7],
                alternatives_diner_ids: vec![],
                entrees_jours_ids: vec![8],
                desserts_jours_ids: vec![9],
            }],
        }
    }

    #[test]
    fn sides_need_a_main_dish() {
        let mut editor = MenuEditor::new(date(4));
        assert_eq!(
            editor.pick(date(4), SelectionTarget::Entree, one(1)),
            Err(GatingError::MissingMainDish)
        );
        assert_eq!(
            editor.pick(date(4), SelectionTarget::PlatDejeunerAlt, one(1)),
            Err(GatingError::MissingLunchMain)
        );
        assert_eq!(
            editor.pick(date(4), SelectionTarget::PlatDinerAlt, one(1)),
            Err(GatingError::MissingDinnerMain)
        );
        assert!(!editor.is_modified(date(4)));
        assert!(editor.store().get(date(4)).is_none());

        editor.pick(date(4), SelectionTarget::PlatDiner, one(2)).unwrap();
        assert_eq!(editor.pick(date(4), SelectionTarget::Dessert, one(3)), Ok(true));
        assert_eq!(
            editor.pick(date(4), SelectionTarget::PlatDejeunerAlt, one(4)),
            Err(GatingError::MissingLunchMain)
        );
    }

    #[test]
    fn picks_outside_the_week_are_refused() {
        let mut editor = MenuEditor::new(date(4));
        assert_eq!(
            editor.pick(date(9), SelectionTarget::PlatDejeuner, one(1)),
            Err(GatingError::DayOutsideWeek(date(9)))
        );
    }

    #[test]
    fn duplicate_pick_reports_no_change() {
        let mut editor = MenuEditor::new(date(4));
        editor.pick(date(4), SelectionTarget::PlatDejeuner, one(1)).unwrap();
        assert_eq!(editor.pick(date(4), SelectionTarget::PlatDejeunerAlt, one(1)), Ok(false));
    }

    #[test]
    fn removing_last_main_clears_everything() {
        let mut editor = MenuEditor::new(date(4));
        editor.pick(date(5), SelectionTarget::PlatDejeuner, one(1)).unwrap();
        editor.pick(date(5), SelectionTarget::PlatDejeunerAlt, one(2)).unwrap();
        editor.pick(date(5), SelectionTarget::Entree, one(3)).unwrap();

        editor.remove(date(5), OrderField::PlatDejeuner, 1).unwrap();
        assert_eq!(editor.store().order(date(5)), DailyOrder::empty(date(5)));
    }

    #[test]
    fn loaded_week_fills_untouched_days_only() {
        let mut editor = MenuEditor::new(date(4));
        let ticket = editor.begin_reload().unwrap();
        editor.pick(date(4), SelectionTarget::PlatDiner, one(42)).unwrap();

        assert!(editor.apply_loaded_week(ticket, Some(remote_week())));
        let monday = editor.store().order(date(4));
        assert_eq!(monday.plat_diner, Some(one(42)));
        assert_eq!(monday.plat_dejeuner, None);

        editor.cancel_day(date(4)).unwrap();
        let monday = editor.store().order(date(4));
        assert_eq!(monday.plat_dejeuner, Some(one(5)));
        assert_eq!(monday.plat_dejeuner_alt, vec![one(6), one(7)]);
        assert_eq!(monday.desserts, vec![one(9)]);
        assert!(!editor.is_modified(date(4)));
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut editor = MenuEditor::new(date(4));
        let first = editor.select_week(date(4));
        let second = editor.select_week(date(11));

        assert!(!editor.apply_loaded_week(first, Some(remote_week())));
        assert!(editor.remote_week().is_none());
        assert!(editor.store().orders().is_empty());

        assert_eq!(second.monday(), date(11));
        assert!(editor.apply_loaded_week(second, None));
        assert_eq!(editor.monday(), Some(date(11)));
    }

    #[test]
    fn select_week_discards_edits() {
        let mut editor = MenuEditor::new(date(4));
        editor.pick(date(4), SelectionTarget::PlatDiner, one(1)).unwrap();
        editor.select_week(date(13));

        assert!(editor.store().orders().is_empty());
        assert!(!editor.is_modified(date(4)));
        assert_eq!(editor.view().days[0].date, date(11));
    }

    #[test]
    fn payload_reflects_edits() {
        let mut editor = MenuEditor::new(date(4));
        editor.pick(date(6), SelectionTarget::PlatDejeuner, one(1)).unwrap();
        let (ticket, payload) = editor.payload(MenuStatus::Brouillon).unwrap();
        assert_eq!(ticket.monday(), date(4));
        assert_eq!(payload.menu_jours[2].jour, "MERCREDI");
        assert_eq!(payload.menu_jours[2].plat_dejeuner_id, Some(1));
    }

    #[test]
    fn empty_week_has_no_payload() {
        let mut editor = MenuEditor::new(date(4));
        assert!(editor.payload(MenuStatus::Publie).is_none());

        editor.pick(date(5), SelectionTarget::PlatDiner, one(3)).unwrap();
        editor.remove(date(5), OrderField::PlatDiner, 3).unwrap();
        assert!(editor.store().get(date(5)).is_some());
        assert!(editor.payload(MenuStatus::Publie).is_none());
    }

    #[test]
    fn edits_outside_the_week_are_refused() {
        let mut editor = MenuEditor::new(date(4));
        let outside = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(
            editor.remove(outside, OrderField::Entrees, 3),
            Err(GatingError::DayOutsideWeek(outside))
        );
        assert_eq!(editor.cancel_day(outside), Err(GatingError::DayOutsideWeek(outside)));
        assert!(editor.view().modified_days.is_empty());
    }

    #[test]
    fn late_save_does_not_touch_the_next_week() {
        let mut editor = MenuEditor::new(date(4));
        editor.pick(date(4), SelectionTarget::PlatDejeuner, one(5)).unwrap();
        let (save_ticket, _) = editor.payload(MenuStatus::Brouillon).unwrap();

        let load_ticket = editor.select_week(date(11));
        editor.pick(date(11), SelectionTarget::PlatDejeuner, one(99)).unwrap();

        assert!(!editor.mark_saved(save_ticket, remote_week()));
        assert!(editor.is_modified(date(11)));
        assert!(editor.remote_week().is_none());

        let mut next_week = remote_week();
        next_week.date_debut = date(11);
        next_week.date_fin = date(15);
        next_week.menu_jours[0].date = date(11);
        next_week.menu_jours[0].plat_dejeuner_id = Some(7);
        assert!(editor.apply_loaded_week(load_ticket, Some(next_week)));
        assert_eq!(editor.store().order(date(11)).plat_dejeuner, Some(one(99)));
    }

    #[test]
    fn save_on_current_week_clears_markers() {
        let mut editor = MenuEditor::new(date(4));
        editor.pick(date(4), SelectionTarget::PlatDejeuner, one(5)).unwrap();
        let (ticket, _) = editor.payload(MenuStatus::Brouillon).unwrap();

        assert!(editor.mark_saved(ticket, remote_week()));
        assert!(!editor.is_modified(date(4)));
        assert_eq!(editor.remote_week().and_then(|w| w.id), Some(12));
    }
}
