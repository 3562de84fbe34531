use std::sync::Arc;

use fleet_store::{FleetStore, FleetTables};
use fleet_types::{Branch, Car, CarId, Custody, Driver};
use serde::{Deserialize, Serialize};

use crate::error::CustodyResult;
use crate::ledger::CustodyLedger;

/// Marker text shown for a car nobody holds.
pub const UNASSIGNED_MESSAGE: &str =
    "Currently unassigned. Please assign this car to a Branch or Driver";

/// Whoever currently holds a car, with that entity's full record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurrentlyWith {
    Branch(Branch),
    Driver(Driver),
    Unassigned { message: String },
}

impl CurrentlyWith {
    pub fn unassigned() -> Self {
        Self::Unassigned {
            message: UNASSIGNED_MESSAGE.to_string(),
        }
    }
}

/// A car rendered together with its resolved custody.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarView {
    pub id: CarId,
    pub make: String,
    pub model: String,
    pub year_of_manufacture: u32,
    pub currently_with: CurrentlyWith,
}

impl CarView {
    /// Render `car` against the tables it was read from.
    ///
    /// Custody is resolved through the ledger, so a stale `car.custody`
    /// never leaks into the view.
    pub fn render(tables: &FleetTables, car: &Car) -> CustodyResult<Self> {
        let custody = CustodyLedger::new(tables).current_custody(car.id)?;
        if custody != car.custody {
            tracing::warn!(
                car = %car.id,
                cached = %car.custody,
                live = %custody,
                "custody reference disagrees with ledger"
            );
        }
        let currently_with = match custody {
            Custody::AtBranch(id) => CurrentlyWith::Branch(tables.branch(id)?.clone()),
            Custody::WithDriver(id) => CurrentlyWith::Driver(tables.driver(id)?.clone()),
            Custody::Unassigned => CurrentlyWith::unassigned(),
        };
        Ok(Self {
            id: car.id,
            make: car.make.clone(),
            model: car.model.clone(),
            year_of_manufacture: car.year_of_manufacture,
            currently_with,
        })
    }
}

/// Read-side rendering of cars for API callers.
pub struct CarProjector<S> {
    store: Arc<S>,
}

impl<S> Clone for CarProjector<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: FleetStore> CarProjector<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Render a single car.
    pub fn render_car(&self, id: CarId) -> CustodyResult<CarView> {
        self.store.read(|tables| {
            let car = tables.car(id)?;
            CarView::render(tables, car)
        })?
    }

    /// Render every car, in id order.
    pub fn render_all(&self) -> CustodyResult<Vec<CarView>> {
        self.store.read(|tables| {
            tables
                .cars()
                .map(|car| CarView::render(tables, car))
                .collect::<CustodyResult<Vec<_>>>()
        })?
    }
}
