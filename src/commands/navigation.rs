//! # Screen Navigation
//!
//! The console shows one entity screen at a time.  Opening a kind mounts a fresh
//! [`CrudScreen`] for it (fetching its list and the reference lists its form offers) and
//! unmounts whatever was open before, so no list outlives its screen.  The customer
//! lookup panel lives and dies with the customer screen.

use crate::commands::console::Console;
use crate::commands::errors::UserError;
use crate::notify::Banner;
use crate::query::QueryPanel;
use crate::screen::CrudScreen;
use crate::store::EntityLists;
use crate::{
    City, Country, Coverage, Customer, EntityKind, Loan, LoanType, Occupation, Record, State,
};

/// Runs a generic async handler instantiated for the record type of `$kind`.
macro_rules! on_kind_async {
    ($kind:expr, $handler:ident ( $($arg:expr),* $(,)? )) => {
        match $kind {
            crate::EntityKind::City => $handler::<crate::City>($($arg),*).await,
            crate::EntityKind::State => $handler::<crate::State>($($arg),*).await,
            crate::EntityKind::Country => $handler::<crate::Country>($($arg),*).await,
            crate::EntityKind::Occupation => $handler::<crate::Occupation>($($arg),*).await,
            crate::EntityKind::Coverage => $handler::<crate::Coverage>($($arg),*).await,
            crate::EntityKind::LoanType => $handler::<crate::LoanType>($($arg),*).await,
            crate::EntityKind::Customer => $handler::<crate::Customer>($($arg),*).await,
            crate::EntityKind::Loan => $handler::<crate::Loan>($($arg),*).await,
        }
    };
}

/// Runs a generic handler instantiated for the record type of `$kind`.
macro_rules! on_kind {
    ($kind:expr, $handler:ident ( $($arg:expr),* $(,)? )) => {
        match $kind {
            crate::EntityKind::City => $handler::<crate::City>($($arg),*),
            crate::EntityKind::State => $handler::<crate::State>($($arg),*),
            crate::EntityKind::Country => $handler::<crate::Country>($($arg),*),
            crate::EntityKind::Occupation => $handler::<crate::Occupation>($($arg),*),
            crate::EntityKind::Coverage => $handler::<crate::Coverage>($($arg),*),
            crate::EntityKind::LoanType => $handler::<crate::LoanType>($($arg),*),
            crate::EntityKind::Customer => $handler::<crate::Customer>($($arg),*),
            crate::EntityKind::Loan => $handler::<crate::Loan>($($arg),*),
        }
    };
}

pub(crate) use on_kind_async;

/////////////////////////////////////////////// Screens //////////////////////////////////////////////

/// The mounted screen, if any, and the lists that belong to it.
#[derive(Debug, Default)]
pub struct Screens {
    open: Option<EntityKind>,
    cities: Option<CrudScreen<City>>,
    states: Option<CrudScreen<State>>,
    countries: Option<CrudScreen<Country>>,
    occupations: Option<CrudScreen<Occupation>>,
    coverages: Option<CrudScreen<Coverage>>,
    loan_types: Option<CrudScreen<LoanType>>,
    customers: Option<CrudScreen<Customer>>,
    loans: Option<CrudScreen<Loan>>,
    queries: Option<QueryPanel<Customer>>,
    references: EntityLists,
}

/// A record type with a screen slot.
pub trait ScreenSlot: Record {
    /// The slot holding this kind's screen.
    fn slot(screens: &mut Screens) -> &mut Option<CrudScreen<Self>>;

    /// Shared access to the slot.
    fn slot_ref(screens: &Screens) -> Option<&CrudScreen<Self>>;
}

macro_rules! screen_slot {
    ($record:ty, $field:ident) => {
        impl ScreenSlot for $record {
            fn slot(screens: &mut Screens) -> &mut Option<CrudScreen<Self>> {
                &mut screens.$field
            }

            fn slot_ref(screens: &Screens) -> Option<&CrudScreen<Self>> {
                screens.$field.as_ref()
            }
        }
    };
}

screen_slot!(City, cities);
screen_slot!(State, states);
screen_slot!(Country, countries);
screen_slot!(Occupation, occupations);
screen_slot!(Coverage, coverages);
screen_slot!(LoanType, loan_types);
screen_slot!(Customer, customers);
screen_slot!(Loan, loans);

impl Screens {
    /// The kind whose screen is mounted.
    pub fn open(&self) -> Option<EntityKind> {
        self.open
    }

    /// Drops every screen, its list, its draft and its notices.
    pub fn unmount_all(&mut self) {
        if let Some(kind) = self.open {
            tracing::debug!(%kind, "unmounting screen");
        }
        *self = Screens::default();
    }

    /// The mounted screen of `R`.
    pub fn screen<R: ScreenSlot>(&self) -> Option<&CrudScreen<R>> {
        R::slot_ref(self)
    }

    /// Mutable access to the mounted screen of `R`.
    pub fn screen_mut<R: ScreenSlot>(&mut self) -> Option<&mut CrudScreen<R>> {
        R::slot(self).as_mut()
    }

    /// The customer lookup panel, mounted with the customer screen.
    pub fn queries(&self) -> Option<&QueryPanel<Customer>> {
        self.queries.as_ref()
    }

    /// The reference lists of the mounted screen's form.
    pub fn references(&self) -> &EntityLists {
        &self.references
    }

    /// The kind whose delete confirmation is waiting for an answer.
    pub fn pending_confirm(&self) -> Option<EntityKind> {
        let kind = self.open?;
        on_kind!(kind, has_pending_delete(self)).then_some(kind)
    }

    /// The banner of the mounted screen.
    pub fn banner(&self) -> Option<Banner> {
        let kind = self.open?;
        on_kind!(kind, banner_of(self))
    }

    /// Hides the banner of the mounted screen.
    pub fn dismiss(&mut self) {
        if let Some(kind) = self.open {
            on_kind!(kind, dismiss_banner(self));
        }
    }
}

fn has_pending_delete<R: ScreenSlot>(screens: &Screens) -> bool {
    R::slot_ref(screens).is_some_and(|s| s.pending_delete().is_some())
}

fn banner_of<R: ScreenSlot>(screens: &Screens) -> Option<Banner> {
    R::slot_ref(screens).and_then(|s| s.notices().banner().cloned())
}

fn dismiss_banner<R: ScreenSlot>(screens: &mut Screens) {
    if let Some(screen) = R::slot(screens).as_mut() {
        screen.dismiss();
    }
}

/// Mounts the screen of `R` unless it is already the open one.
pub async fn ensure_open<R: ScreenSlot>(console: &mut Console) {
    if console.screens.open == Some(R::KIND) {
        return;
    }
    console.screens.unmount_all();
    tracing::debug!(kind = %R::KIND, "mounting screen");
    let mut screen = CrudScreen::<R>::new();
    screen.mount(&console.api).await;
    console
        .screens
        .references
        .refresh_for_form(&console.api, R::KIND)
        .await;
    *R::slot(&mut console.screens) = Some(screen);
    if R::KIND == EntityKind::Customer {
        console.screens.queries = Some(QueryPanel::new());
    }
    console.screens.open = Some(R::KIND);
}

/// The API and the mounted screen of `R`, mounting it first when needed.
pub async fn open_screen<'a, R: ScreenSlot + 'a>(
    console: &'a mut Console,
) -> Result<(&'a crate::api::LoanApi, &'a mut CrudScreen<R>), UserError> {
    ensure_open::<R>(console).await;
    let screen = R::slot(&mut console.screens)
        .as_mut()
        .ok_or_else(|| UserError::new(format!("The {} screen is not open", R::KIND.noun())))?;
    Ok((&console.api, screen))
}

/// The API and the customer lookup panel, mounting the customer screen first when
/// needed.
pub async fn open_queries(
    console: &mut Console,
) -> Result<(&crate::api::LoanApi, &mut QueryPanel<Customer>), UserError> {
    ensure_open::<Customer>(console).await;
    let panel = console
        .screens
        .queries
        .as_mut()
        .ok_or_else(|| UserError::new("The customer screen is not open"))?;
    Ok((&console.api, panel))
}
