use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::menu::{
    CreateMenuWeekRequest, DailyOrder, DishId, Meal, MealSelection, MenuJourDto, MenuStatus,
    SelectionList,
};
use crate::services::week::MenuDay;

/// In-memory selection state of one menu week being edited.
///
/// Days are created lazily on the first mutation and every mutator keeps the
/// alternates and side lists consistent with the main dishes. None of the
/// operations can fail: adders report whether they changed anything.
#[derive(Debug, Clone, Default)]
pub struct WeeklyOrderStore {
    days: Vec<MenuDay>,
    orders: BTreeMap<NaiveDate, DailyOrder>,
}

impl WeeklyOrderStore {
    pub fn new(days: Vec<MenuDay>) -> Self {
        Self {
            days,
            orders: BTreeMap::new(),
        }
    }

    pub fn days(&self) -> &[MenuDay] {
        &self.days
    }

    /// Replace the active week's days. Orders are left untouched.
    pub fn set_days(&mut self, days: Vec<MenuDay>) {
        self.days = days;
    }

    pub fn orders(&self) -> &BTreeMap<NaiveDate, DailyOrder> {
        &self.orders
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyOrder> {
        self.orders.get(&date)
    }

    /// Selection state of `date`, or the empty shape if nothing was touched.
    pub fn order(&self, date: NaiveDate) -> DailyOrder {
        self.orders
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DailyOrder::empty(date))
    }

    fn entry(&mut self, date: NaiveDate) -> &mut DailyOrder {
        self.orders
            .entry(date)
            .or_insert_with(|| DailyOrder::empty(date))
    }

    /// Set or clear the lunch main. Clearing does not cascade.
    pub fn set_plat_dejeuner(&mut self, date: NaiveDate, plat: Option<MealSelection>) {
        self.entry(date).plat_dejeuner = plat;
    }

    /// Set or clear the dinner main. Clearing does not cascade.
    pub fn set_plat_diner(&mut self, date: NaiveDate, plat: Option<MealSelection>) {
        self.entry(date).plat_diner = plat;
    }

    pub fn add_entree(&mut self, date: NaiveDate, entree: MealSelection) -> bool {
        self.push_unique(date, SelectionList::Entrees, entree)
    }

    pub fn add_dessert(&mut self, date: NaiveDate, dessert: MealSelection) -> bool {
        self.push_unique(date, SelectionList::Desserts, dessert)
    }

    /// Add a lunch alternate unless it repeats an alternate or the lunch main itself.
    pub fn add_alt_plat_dejeuner(&mut self, date: NaiveDate, plat: MealSelection) -> bool {
        self.add_alternate(date, Meal::Dejeuner, plat)
    }

    /// Add a dinner alternate unless it repeats an alternate or the dinner main itself.
    pub fn add_alt_plat_diner(&mut self, date: NaiveDate, plat: MealSelection) -> bool {
        self.add_alternate(date, Meal::Diner, plat)
    }

    fn add_alternate(&mut self, date: NaiveDate, meal: Meal, plat: MealSelection) -> bool {
        let order = self.entry(date);
        if order.main(meal).is_some_and(|main| main.id == plat.id) {
            return false;
        }
        Self::push_into(order.list_mut(meal.alternates()), plat)
    }

    fn push_unique(&mut self, date: NaiveDate, list: SelectionList, plat: MealSelection) -> bool {
        Self::push_into(self.entry(date).list_mut(list), plat)
    }

    fn push_into(items: &mut Vec<MealSelection>, plat: MealSelection) -> bool {
        if items.iter().any(|s| s.id == plat.id) {
            return false;
        }
        items.push(plat);
        true
    }

    /// Clear a main dish. `_id` only names the caller's intent; the slot is cleared
    /// whatever it holds. No-op for a day that was never touched.
    pub fn remove_meal_selection(&mut self, date: NaiveDate, meal: Meal, _id: DishId) {
        if let Some(order) = self.orders.get_mut(&date) {
            *order.main_mut(meal) = None;
        }
    }

    /// Remove the entry with `id` from a list. No-op if absent.
    pub fn remove_list_selection(&mut self, date: NaiveDate, list: SelectionList, id: DishId) {
        if let Some(order) = self.orders.get_mut(&date) {
            order.list_mut(list).retain(|s| s.id != id);
        }
    }

    /// Clear a main dish together with everything that depends on it.
    ///
    /// The meal's alternates always go. Entrées and desserts go only when the other
    /// main is unset as well, since they would no longer belong to any meal.
    pub fn remove_main_dish(&mut self, date: NaiveDate, meal: Meal) {
        let Some(order) = self.orders.get_mut(&date) else {
            return;
        };
        order.list_mut(meal.alternates()).clear();
        if order.main(meal.other()).is_none() {
            order.entrees.clear();
            order.desserts.clear();
        }
        *order.main_mut(meal) = None;
    }

    pub fn reset_day(&mut self, date: NaiveDate) {
        self.orders.remove(&date);
    }

    pub fn reset_order(&mut self) {
        self.orders.clear();
    }

    /// Rebuild `date` from a backend day record. Every id gets quantity 1 and goes
    /// through the same invariant checks as a manual pick.
    pub fn load_day(&mut self, date: NaiveDate, dto: &MenuJourDto) {
        self.reset_day(date);
        self.set_plat_dejeuner(date, dto.plat_dejeuner_id.map(MealSelection::single));
        self.set_plat_diner(date, dto.plat_diner_id.map(MealSelection::single));
        for &id in &dto.alternatives_dejeuner_ids {
            self.add_alt_plat_dejeuner(date, MealSelection::single(id));
        }
        for &id in &dto.alternatives_diner_ids {
            self.add_alt_plat_diner(date, MealSelection::single(id));
        }
        for &id in &dto.entrees_jours_ids {
            self.add_entree(date, MealSelection::single(id));
        }
        for &id in &dto.desserts_jours_ids {
            self.add_dessert(date, MealSelection::single(id));
        }
    }

    /// One backend day record per active day, in day order. Quantities are dropped.
    pub fn to_menu_jours(&self) -> Vec<MenuJourDto> {
        self.days
            .iter()
            .map(|day| {
                let order = self.order(day.date);
                MenuJourDto {
                    id: None,
                    jour: day.jour().to_string(),
                    date: day.date,
                    plat_dejeuner_id: order.plat_dejeuner.map(|s| s.id),
                    plat_diner_id: order.plat_diner.map(|s| s.id),
                    alternatives_dejeuner_ids: ids(&order.plat_dejeuner_alt),
                    alternatives_diner_ids: ids(&order.plat_diner_alt),
                    entrees_jours_ids: ids(&order.entrees),
                    desserts_jours_ids: ids(&order.desserts),
                }
            })
            .collect()
    }

    /// Full week payload, or `None` when no days are active.
    pub fn to_week_payload(&self, status: MenuStatus) -> Option<CreateMenuWeekRequest> {
        let date_debut = self.days.first()?.date;
        let date_fin = self.days.last()?.date;
        Some(CreateMenuWeekRequest {
            date_debut,
            date_fin,
            status,
            menu_jours: self.to_menu_jours(),
        })
    }
}

fn ids(items: &[MealSelection]) -> Vec<DishId> {
    items.iter().map(|s| s.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::week::menu_days;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn store() -> WeeklyOrderStore {
        WeeklyOrderStore::new(menu_days(monday()))
    }

    fn one(id: DishId) -> MealSelection {
        MealSelection::single(id)
    }

    #[test]
    fn add_entree_twice_keeps_one() {
        let mut s = store();
        assert!(s.add_entree(monday(), one(3)));
        assert!(!s.add_entree(monday(), MealSelection { id: 3, quantity: 2 }));
        assert_eq!(s.order(monday()).entrees, vec![one(3)]);
    }

    #[test]
    fn add_dessert_twice_keeps_one() {
        let mut s = store();
        s.add_dessert(monday(), one(9));
        s.add_dessert(monday(), one(9));
        assert_eq!(s.order(monday()).desserts, vec![one(9)]);
    }

    #[test]
    fn alternate_equal_to_main_is_rejected() {
        let mut s = store();
        s.set_plat_dejeuner(monday(), Some(one(1)));
        assert!(s.add_alt_plat_dejeuner(monday(), one(2)));
        assert!(!s.add_alt_plat_dejeuner(monday(), one(1)));
        assert!(!s.add_alt_plat_dejeuner(monday(), one(2)));
        assert_eq!(s.order(monday()).plat_dejeuner_alt, vec![one(2)]);
    }

    #[test]
    fn dinner_alternates_check_dinner_main_only() {
        let mut s = store();
        s.set_plat_dejeuner(monday(), Some(one(1)));
        s.set_plat_diner(monday(), Some(one(4)));
        assert!(s.add_alt_plat_diner(monday(), one(1)));
        assert!(!s.add_alt_plat_diner(monday(), one(4)));
        assert_eq!(s.order(monday()).plat_diner_alt, vec![one(1)]);
    }

    #[test]
    fn setting_main_to_none_does_not_cascade() {
        let mut s = store();
        s.set_plat_dejeuner(monday(), Some(one(1)));
        s.add_alt_plat_dejeuner(monday(), one(2));
        s.add_entree(monday(), one(5));
        s.set_plat_dejeuner(monday(), None);

        let order = s.order(monday());
        assert_eq!(order.plat_dejeuner, None);
        assert_eq!(order.plat_dejeuner_alt, vec![one(2)]);
        assert_eq!(order.entrees, vec![one(5)]);
    }

    #[test]
    fn caller_driven_cascade_empties_alternates() {
        let mut s = store();
        s.set_plat_dejeuner(monday(), Some(one(1)));
        s.add_alt_plat_dejeuner(monday(), one(2));
        s.add_alt_plat_dejeuner(monday(), one(3));

        for alt in s.order(monday()).plat_dejeuner_alt {
            s.remove_list_selection(monday(), SelectionList::PlatDejeunerAlt, alt.id);
        }
        s.remove_meal_selection(monday(), Meal::Dejeuner, 1);

        let order = s.order(monday());
        assert_eq!(order.plat_dejeuner, None);
        assert!(order.plat_dejeuner_alt.is_empty());
    }

    #[test]
    fn remove_main_dish_keeps_sides_while_other_main_is_set() {
        let mut s = store();
        s.set_plat_dejeuner(monday(), Some(one(1)));
        s.set_plat_diner(monday(), Some(one(10)));
        s.add_alt_plat_dejeuner(monday(), one(2));
        s.add_alt_plat_diner(monday(), one(11));
        s.add_entree(monday(), one(20));
        s.add_dessert(monday(), one(30));

        s.remove_main_dish(monday(), Meal::Dejeuner);
        let order = s.order(monday());
        assert_eq!(order.plat_dejeuner, None);
        assert!(order.plat_dejeuner_alt.is_empty());
        assert_eq!(order.plat_diner_alt, vec![one(11)]);
        assert_eq!(order.entrees, vec![one(20)]);
        assert_eq!(order.desserts, vec![one(30)]);

        s.remove_main_dish(monday(), Meal::Diner);
        let order = s.order(monday());
        assert_eq!(order, DailyOrder::empty(monday()));
    }

    #[test]
    fn removals_on_untouched_day_do_not_create_it() {
        let mut s = store();
        s.remove_meal_selection(monday(), Meal::Diner, 4);
        s.remove_list_selection(monday(), SelectionList::Entrees, 4);
        s.remove_main_dish(monday(), Meal::Dejeuner);
        assert!(s.get(monday()).is_none());
    }

    #[test]
    fn remove_missing_list_entry_is_noop() {
        let mut s = store();
        s.add_entree(monday(), one(1));
        s.remove_list_selection(monday(), SelectionList::Entrees, 99);
        assert_eq!(s.order(monday()).entrees, vec![one(1)]);
    }

    #[test]
    fn reset_day_and_reset_order_restore_empty_shape() {
        let mut s = store();
        let tuesday = monday().succ_opt().unwrap();
        s.set_plat_dejeuner(monday(), Some(one(1)));
        s.add_entree(tuesday, one(2));

        s.reset_day(monday());
        assert_eq!(s.order(monday()), DailyOrder::empty(monday()));
        assert_eq!(s.order(tuesday).entrees, vec![one(2)]);

        s.reset_order();
        assert_eq!(s.order(tuesday), DailyOrder::empty(tuesday));
        assert!(s.orders().is_empty());
        assert_eq!(s.days().len(), 5);
    }

    #[test]
    fn set_days_leaves_orders_alone() {
        let mut s = store();
        s.add_entree(monday(), one(1));
        s.set_days(Vec::new());
        assert_eq!(s.order(monday()).entrees, vec![one(1)]);
    }

    #[test]
    fn load_then_save_round_trips_ids() {
        let mut s = store();
        let dto = MenuJourDto {
            id: Some(77),
            jour: "MONDAY".into(),
            date: monday(),
            plat_dejeuner_id: Some(5),
            plat_diner_id: None,
            alternatives_dejeuner_ids: vec![6, 7],
            alternatives_diner_ids: vec![],
            entrees_jours_ids: vec![8],
            desserts_jours_ids: vec![],
        };
        s.load_day(monday(), &dto);

        let order = s.order(monday());
        assert_eq!(order.plat_dejeuner, Some(one(5)));
        assert_eq!(order.plat_dejeuner_alt, vec![one(6), one(7)]);

        let jours = s.to_menu_jours();
        assert_eq!(jours.len(), 5);
        assert_eq!(jours[0].jour, "LUNDI");
        assert_eq!(jours[0].plat_dejeuner_id, Some(5));
        assert_eq!(jours[0].alternatives_dejeuner_ids, vec![6, 7]);
        assert_eq!(jours[0].entrees_jours_ids, vec![8]);
        assert_eq!(jours[1].plat_dejeuner_id, None);
        assert!(jours[1].entrees_jours_ids.is_empty());
    }

    #[test]
    fn load_replaces_previous_state_and_filters_bad_alternates() {
        let mut s = store();
        s.add_dessert(monday(), one(40));
        let dto = MenuJourDto {
            id: None,
            jour: "LUNDI".into(),
            date: monday(),
            plat_dejeuner_id: Some(5),
            plat_diner_id: Some(6),
            alternatives_dejeuner_ids: vec![5, 7, 7],
            alternatives_diner_ids: vec![],
            entrees_jours_ids: vec![],
            desserts_jours_ids: vec![],
        };
        s.load_day(monday(), &dto);

        let order = s.order(monday());
        assert!(order.desserts.is_empty());
        assert_eq!(order.plat_dejeuner_alt, vec![one(7)]);
        assert_eq!(order.plat_diner, Some(one(6)));
    }

    #[test]
    fn save_drops_quantity() {
        let mut s = store();
        s.set_plat_diner(monday(), Some(MealSelection { id: 3, quantity: 4 }));
        let jours = s.to_menu_jours();
        assert_eq!(jours[0].plat_diner_id, Some(3));
    }

    #[test]
    fn week_payload_spans_first_to_last_day() {
        let s = store();
        let payload = s.to_week_payload(MenuStatus::Publie).unwrap();
        assert_eq!(payload.date_debut, monday());
        assert_eq!(payload.date_fin, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
        assert_eq!(payload.menu_jours.len(), 5);

        assert!(WeeklyOrderStore::default().to_week_payload(MenuStatus::Brouillon).is_none());
    }
}
