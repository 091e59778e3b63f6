//! # Entity Lists
//!
//! A [`ListStore`] holds the last fetched list of one entity kind.  It is refreshed by a
//! full re-fetch and never patched in place.  [`EntityLists`] holds one store per kind
//! and serves the reference lists that forms offer as choices.

use crate::api::LoanApi;
use crate::{
    City, Country, Coverage, Customer, EntityKind, Loan, LoanType, Occupation, Record, RecordId,
    State,
};

////////////////////////////////////////////// ListStore /////////////////////////////////////////////

/// The fetched records of one kind and the error of the last fetch.
#[derive(Debug, Clone)]
pub struct ListStore<R> {
    items: Vec<R>,
    error: Option<String>,
}

impl<R> Default for ListStore<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            error: None,
        }
    }
}

impl<R: Record> ListStore<R> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held records with a fresh fetch.
    ///
    /// On failure the list is emptied and the inline error is set; on success the
    /// inline error is cleared.
    pub async fn refresh(&mut self, api: &LoanApi) {
        match api.list::<R>().await {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(kind = %R::KIND, error = %e, "list fetch failed");
                self.items.clear();
                self.error = Some(format!("Error fetching {}", R::KIND.plural()));
            }
        }
    }

    /// The held records, in server order.
    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// The held record with `id`.
    pub fn find(&self, id: RecordId) -> Option<&R> {
        self.items.iter().find(|r| r.id() == id)
    }

    /// The inline error of the last fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `(id, label)` for every held record.
    pub fn options(&self) -> Vec<(RecordId, String)> {
        self.items.iter().map(|r| (r.id(), r.label())).collect()
    }
}

///////////////////////////////////////////// EntityLists ////////////////////////////////////////////

/// One list store per entity kind.
#[derive(Debug, Clone, Default)]
pub struct EntityLists {
    cities: ListStore<City>,
    states: ListStore<State>,
    countries: ListStore<Country>,
    occupations: ListStore<Occupation>,
    coverages: ListStore<Coverage>,
    loan_types: ListStore<LoanType>,
    customers: ListStore<Customer>,
    loans: ListStore<Loan>,
}

macro_rules! with_store {
    ($lists:expr, $kind:expr, |$store:ident| $body:expr) => {
        match $kind {
            EntityKind::City => {
                let $store = &$lists.cities;
                $body
            }
            EntityKind::State => {
                let $store = &$lists.states;
                $body
            }
            EntityKind::Country => {
                let $store = &$lists.countries;
                $body
            }
            EntityKind::Occupation => {
                let $store = &$lists.occupations;
                $body
            }
            EntityKind::Coverage => {
                let $store = &$lists.coverages;
                $body
            }
            EntityKind::LoanType => {
                let $store = &$lists.loan_types;
                $body
            }
            EntityKind::Customer => {
                let $store = &$lists.customers;
                $body
            }
            EntityKind::Loan => {
                let $store = &$lists.loans;
                $body
            }
        }
    };
}

impl EntityLists {
    /// Creates empty stores for every kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-fetches the list of `kind`.
    pub async fn refresh(&mut self, api: &LoanApi, kind: EntityKind) {
        match kind {
            EntityKind::City => self.cities.refresh(api).await,
            EntityKind::State => self.states.refresh(api).await,
            EntityKind::Country => self.countries.refresh(api).await,
            EntityKind::Occupation => self.occupations.refresh(api).await,
            EntityKind::Coverage => self.coverages.refresh(api).await,
            EntityKind::LoanType => self.loan_types.refresh(api).await,
            EntityKind::Customer => self.customers.refresh(api).await,
            EntityKind::Loan => self.loans.refresh(api).await,
        }
    }

    /// Re-fetches the lists a form of `kind` offers as choices.
    pub async fn refresh_for_form(&mut self, api: &LoanApi, kind: EntityKind) {
        for reference in Self::references(kind) {
            self.refresh(api, *reference).await;
        }
    }

    /// The kinds a form of `kind` refers to.
    pub fn references(kind: EntityKind) -> &'static [EntityKind] {
        match kind {
            EntityKind::Customer => &[
                EntityKind::City,
                EntityKind::State,
                EntityKind::Country,
                EntityKind::Occupation,
            ],
            EntityKind::Loan => &[
                EntityKind::Customer,
                EntityKind::Coverage,
                EntityKind::LoanType,
            ],
            _ => &[],
        }
    }

    /// The label of record `id` of `kind`, when it is held.
    pub fn label(&self, kind: EntityKind, id: RecordId) -> Option<String> {
        with_store!(self, kind, |store| store.find(id).map(Record::label))
    }

    /// `(id, label)` for every held record of `kind`.
    pub fn options(&self, kind: EntityKind) -> Vec<(RecordId, String)> {
        with_store!(self, kind, |store| store.options())
    }

    /// The inline fetch error of `kind`.
    pub fn error(&self, kind: EntityKind) -> Option<&str> {
        with_store!(self, kind, |store| store.error())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_utils::test_helpers::FakeApi;

    #[tokio::test]
    async fn refresh_replaces_items() {
        let fake = FakeApi::start().await;
        fake.seed(
            EntityKind::State,
            vec![json!({"stateId": 1, "stateName": "Rift Valley"})],
        );
        let api = fake.api();
        let mut store: ListStore<State> = ListStore::new();
        store.refresh(&api).await;
        assert_eq!(store.items().len(), 1);

        fake.seed(
            EntityKind::State,
            vec![
                json!({"stateId": 2, "stateName": "Central"}),
                json!({"stateId": 3, "stateName": "Coast"}),
            ],
        );
        store.refresh(&api).await;
        let names: Vec<_> = store.items().iter().map(|s| s.state_name.as_str()).collect();
        assert_eq!(names, vec!["Central", "Coast"]);
        assert!(store.find(RecordId::new(1)).is_none());
        assert!(store.find(RecordId::new(3)).is_some());
    }

    #[tokio::test]
    async fn failed_fetch_empties_and_sets_error() {
        let fake = FakeApi::start().await;
        fake.seed(
            EntityKind::Country,
            vec![json!({"countryId": 1, "countryName": "Kenya"})],
        );
        let api = fake.api();
        let mut store: ListStore<Country> = ListStore::new();
        store.refresh(&api).await;
        assert_eq!(store.items().len(), 1);

        fake.fail("GET", "countries");
        store.refresh(&api).await;
        assert!(store.items().is_empty());
        assert_eq!(store.error(), Some("Error fetching countries"));

        fake.heal();
        store.refresh(&api).await;
        assert_eq!(store.error(), None);
        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn form_references_fill_pickers() {
        let fake = FakeApi::start().await;
        fake.seed(EntityKind::City, vec![json!({"cityId": 4, "cityName": "Kisumu"})]);
        fake.seed(
            EntityKind::Occupation,
            vec![json!({"occupationId": 7, "occupationName": "Farmer"})],
        );
        let api = fake.api();
        let mut lists = EntityLists::new();
        lists.refresh_for_form(&api, EntityKind::Customer).await;
        assert_eq!(
            lists.label(EntityKind::City, RecordId::new(4)).as_deref(),
            Some("Kisumu")
        );
        assert_eq!(
            lists.options(EntityKind::Occupation),
            vec![(RecordId::new(7), "Farmer".to_string())]
        );
        assert!(lists.options(EntityKind::Loan).is_empty());

        let paths: Vec<_> = fake.journal().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["cities", "states", "countries", "occupations"]);
    }

    #[test]
    fn loan_form_refers_to_customers_coverages_and_types() {
        assert_eq!(
            EntityLists::references(EntityKind::Loan),
            &[EntityKind::Customer, EntityKind::Coverage, EntityKind::LoanType]
        );
        assert!(EntityLists::references(EntityKind::City).is_empty());
    }
}
