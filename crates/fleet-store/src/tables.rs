use std::collections::BTreeMap;

use fleet_types::{
    AssociationId, Branch, BranchId, BranchInventory, Car, CarId, Custody, Driver, DriverId,
    DriverInventory, NewBranch, NewCar, NewDriver,
};

use crate::error::{StoreError, StoreResult};

/// Last issued key per table.
#[derive(Clone, Debug, Default)]
struct Sequences {
    car: u64,
    branch: u64,
    driver: u64,
    branch_inventory: u64,
    driver_inventory: u64,
}

fn next(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

/// The full set of fleet tables as seen by one read or transaction.
///
/// Association rows are raw here: inserting one does not touch any other
/// row or the car's custody reference. Keeping those consistent is the job of
/// the custody transition service.
#[derive(Clone, Debug, Default)]
pub struct FleetTables {
    cars: BTreeMap<CarId, Car>,
    branches: BTreeMap<BranchId, Branch>,
    drivers: BTreeMap<DriverId, Driver>,
    branch_inventory: BTreeMap<AssociationId, BranchInventory>,
    driver_inventory: BTreeMap<AssociationId, DriverInventory>,
    sequences: Sequences,
}

impl FleetTables {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Cars
    // -----------------------------------------------------------------------

    /// Insert a new, unassigned car.
    pub fn insert_car(&mut self, draft: NewCar) -> Car {
        let id = CarId::new(next(&mut self.sequences.car));
        let car = Car {
            id,
            make: draft.make,
            model: draft.model,
            year_of_manufacture: draft.year_of_manufacture,
            custody: Custody::Unassigned,
        };
        self.cars.insert(id, car.clone());
        car
    }

    pub fn car(&self, id: CarId) -> StoreResult<&Car> {
        self.cars.get(&id).ok_or(StoreError::CarNotFound(id))
    }

    /// All cars in id order.
    pub fn cars(&self) -> impl Iterator<Item = &Car> {
        self.cars.values()
    }

    /// Overwrite the denormalized custody reference on a car.
    pub fn set_custody(&mut self, id: CarId, custody: Custody) -> StoreResult<()> {
        let car = self.cars.get_mut(&id).ok_or(StoreError::CarNotFound(id))?;
        car.custody = custody;
        Ok(())
    }

    /// Delete a car and every association that references it.
    pub fn delete_car(&mut self, id: CarId) -> StoreResult<Car> {
        let car = self.cars.remove(&id).ok_or(StoreError::CarNotFound(id))?;
        let branch_rows = self.remove_branch_associations_for_car(id).len();
        let driver_rows = self.remove_driver_associations_for_car(id).len();
        tracing::debug!(car = %id, branch_rows, driver_rows, "car deleted with cascade");
        Ok(car)
    }

    // -----------------------------------------------------------------------
    // Branches
    // -----------------------------------------------------------------------

    pub fn insert_branch(&mut self, draft: NewBranch) -> Branch {
        let id = BranchId::new(next(&mut self.sequences.branch));
        let branch = Branch {
            id,
            city: draft.city,
            postcode: draft.postcode,
            capacity: draft.capacity,
        };
        self.branches.insert(id, branch.clone());
        branch
    }

    pub fn branch(&self, id: BranchId) -> StoreResult<&Branch> {
        self.branches.get(&id).ok_or(StoreError::BranchNotFound(id))
    }

    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    /// Delete a branch. Refused while any car is associated with it.
    pub fn delete_branch(&mut self, id: BranchId) -> StoreResult<Branch> {
        self.branch(id)?;
        let cars = self.branch_associations_at(id).count();
        if cars > 0 {
            return Err(StoreError::BranchInUse { branch: id, cars });
        }
        self.branches.remove(&id).ok_or(StoreError::BranchNotFound(id))
    }

    // -----------------------------------------------------------------------
    // Drivers
    // -----------------------------------------------------------------------

    pub fn insert_driver(&mut self, draft: NewDriver) -> Driver {
        let id = DriverId::new(next(&mut self.sequences.driver));
        let driver = Driver {
            id,
            first_name: draft.first_name,
            middle_names: draft.middle_names,
            last_name: draft.last_name,
            date_of_birth: draft.date_of_birth,
        };
        self.drivers.insert(id, driver.clone());
        driver
    }

    pub fn driver(&self, id: DriverId) -> StoreResult<&Driver> {
        self.drivers.get(&id).ok_or(StoreError::DriverNotFound(id))
    }

    pub fn drivers(&self) -> impl Iterator<Item = &Driver> {
        self.drivers.values()
    }

    /// Delete a driver. Refused while the driver is renting a car.
    pub fn delete_driver(&mut self, id: DriverId) -> StoreResult<Driver> {
        self.driver(id)?;
        let cars = self.driver_associations_of(id).count();
        if cars > 0 {
            return Err(StoreError::DriverInUse { driver: id, cars });
        }
        self.drivers.remove(&id).ok_or(StoreError::DriverNotFound(id))
    }

    // -----------------------------------------------------------------------
    // Branch inventory
    // -----------------------------------------------------------------------

    pub fn branch_associations(&self) -> impl Iterator<Item = &BranchInventory> {
        self.branch_inventory.values()
    }

    pub fn branch_association(&self, id: AssociationId) -> StoreResult<&BranchInventory> {
        self.branch_inventory
            .get(&id)
            .ok_or(StoreError::AssociationNotFound(id))
    }

    pub fn branch_associations_for_car(
        &self,
        car: CarId,
    ) -> impl Iterator<Item = &BranchInventory> {
        self.branch_inventory.values().filter(move |row| row.car == car)
    }

    pub fn branch_associations_at(
        &self,
        branch: BranchId,
    ) -> impl Iterator<Item = &BranchInventory> {
        self.branch_inventory
            .values()
            .filter(move |row| row.branch == branch)
    }

    /// Insert a raw branch association. Both ends must exist.
    pub fn insert_branch_association(
        &mut self,
        car: CarId,
        branch: BranchId,
    ) -> StoreResult<BranchInventory> {
        self.car(car)?;
        self.branch(branch)?;
        let id = AssociationId::new(next(&mut self.sequences.branch_inventory));
        let row = BranchInventory { id, car, branch };
        self.branch_inventory.insert(id, row);
        Ok(row)
    }

    /// Remove every branch association of `car`, returning the removed rows.
    pub fn remove_branch_associations_for_car(&mut self, car: CarId) -> Vec<BranchInventory> {
        let ids: Vec<AssociationId> = self
            .branch_associations_for_car(car)
            .map(|row| row.id)
            .collect();
        ids.iter()
            .filter_map(|id| self.branch_inventory.remove(id))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Driver inventory
    // -----------------------------------------------------------------------

    pub fn driver_associations(&self) -> impl Iterator<Item = &DriverInventory> {
        self.driver_inventory.values()
    }

    pub fn driver_association(&self, id: AssociationId) -> StoreResult<&DriverInventory> {
        self.driver_inventory
            .get(&id)
            .ok_or(StoreError::AssociationNotFound(id))
    }

    pub fn driver_associations_for_car(
        &self,
        car: CarId,
    ) -> impl Iterator<Item = &DriverInventory> {
        self.driver_inventory.values().filter(move |row| row.car == car)
    }

    pub fn driver_associations_of(
        &self,
        driver: DriverId,
    ) -> impl Iterator<Item = &DriverInventory> {
        self.driver_inventory
            .values()
            .filter(move |row| row.driver == driver)
    }

    /// Insert a raw driver association. Both ends must exist.
    pub fn insert_driver_association(
        &mut self,
        car: CarId,
        driver: DriverId,
    ) -> StoreResult<DriverInventory> {
        self.car(car)?;
        self.driver(driver)?;
        let id = AssociationId::new(next(&mut self.sequences.driver_inventory));
        let row = DriverInventory { id, car, driver };
        self.driver_inventory.insert(id, row);
        Ok(row)
    }

    /// Remove every driver association of `car`, returning the removed rows.
    pub fn remove_driver_associations_for_car(&mut self, car: CarId) -> Vec<DriverInventory> {
        let ids: Vec<AssociationId> = self
            .driver_associations_for_car(car)
            .map(|row| row.id)
            .collect();
        ids.iter()
            .filter_map(|id| self.driver_inventory.remove(id))
            .collect()
    }
}
