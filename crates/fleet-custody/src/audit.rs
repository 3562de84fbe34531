use std::collections::BTreeMap;

use fleet_store::FleetTables;
use fleet_types::{AssociationId, BranchId, CarId, Custody, DriverId};
use serde::Serialize;

/// Result of auditing the custody tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub cars_checked: usize,
    pub branches_checked: usize,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific invariant violation detected during an audit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car: Option<CarId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<BranchId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association: Option<AssociationId>,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    BothAssociations,
    DuplicateBranchAssociation,
    DuplicateDriverAssociation,
    ReferenceMismatch,
    OverCapacity,
    DriverRentingSeveralCars,
    DanglingAssociation,
}

/// Whole-table custody invariant checker.
pub struct CustodyAuditor;

impl CustodyAuditor {
    /// Check every car and branch against the custody invariants.
    pub fn audit(tables: &FleetTables) -> AuditReport {
        let mut violations = Vec::new();

        let mut branch_rows: BTreeMap<CarId, Vec<BranchId>> = BTreeMap::new();
        let mut occupancy: BTreeMap<BranchId, usize> = BTreeMap::new();
        for row in tables.branch_associations() {
            if tables.car(row.car).is_err() || tables.branch(row.branch).is_err() {
                violations.push(Violation {
                    kind: ViolationKind::DanglingAssociation,
                    car: Some(row.car),
                    branch: Some(row.branch),
                    association: Some(row.id),
                    description: format!("branch association {} references a missing row", row.id),
                });
            }
            branch_rows.entry(row.car).or_default().push(row.branch);
            *occupancy.entry(row.branch).or_default() += 1;
        }

        let mut driver_rows: BTreeMap<CarId, usize> = BTreeMap::new();
        let mut rentals: BTreeMap<DriverId, usize> = BTreeMap::new();
        for row in tables.driver_associations() {
            if tables.car(row.car).is_err() || tables.driver(row.driver).is_err() {
                violations.push(Violation {
                    kind: ViolationKind::DanglingAssociation,
                    car: Some(row.car),
                    branch: None,
                    association: Some(row.id),
                    description: format!("driver association {} references a missing row", row.id),
                });
            }
            *driver_rows.entry(row.car).or_default() += 1;
            *rentals.entry(row.driver).or_default() += 1;
        }

        for (driver, cars) in rentals.iter().filter(|(_, cars)| **cars > 1) {
            violations.push(Violation {
                kind: ViolationKind::DriverRentingSeveralCars,
                car: None,
                branch: None,
                association: None,
                description: format!("driver {driver} is renting {cars} cars"),
            });
        }

        let mut cars_checked = 0;
        for car in tables.cars() {
            cars_checked += 1;
            let at_branches = branch_rows.get(&car.id).map_or(0, Vec::len);
            let with_drivers = driver_rows.get(&car.id).copied().unwrap_or(0);

            if at_branches > 1 {
                violations.push(Self::car_violation(
                    ViolationKind::DuplicateBranchAssociation,
                    car.id,
                    format!("car {} has {at_branches} branch associations", car.id),
                ));
            }
            if with_drivers > 1 {
                violations.push(Self::car_violation(
                    ViolationKind::DuplicateDriverAssociation,
                    car.id,
                    format!("car {} has {with_drivers} driver associations", car.id),
                ));
            }
            if at_branches > 0 && with_drivers > 0 {
                violations.push(Self::car_violation(
                    ViolationKind::BothAssociations,
                    car.id,
                    format!("car {} is with a branch and a driver", car.id),
                ));
                continue;
            }

            let expected = match (
                branch_rows.get(&car.id).and_then(|b| b.first()),
                tables.driver_associations_for_car(car.id).next(),
            ) {
                (Some(branch), _) => Custody::AtBranch(*branch),
                (None, Some(row)) => Custody::WithDriver(row.driver),
                (None, None) => Custody::Unassigned,
            };
            if expected != car.custody {
                violations.push(Self::car_violation(
                    ViolationKind::ReferenceMismatch,
                    car.id,
                    format!(
                        "car {} records custody {} but associations say {expected}",
                        car.id, car.custody
                    ),
                ));
            }
        }

        let mut branches_checked = 0;
        for branch in tables.branches() {
            branches_checked += 1;
            let held = occupancy.get(&branch.id).copied().unwrap_or(0);
            if held > branch.capacity as usize {
                violations.push(Violation {
                    kind: ViolationKind::OverCapacity,
                    car: None,
                    branch: Some(branch.id),
                    association: None,
                    description: format!(
                        "branch {} holds {held} cars with capacity {}",
                        branch.id, branch.capacity
                    ),
                });
            }
        }

        AuditReport {
            cars_checked,
            branches_checked,
            violations,
        }
    }

    fn car_violation(kind: ViolationKind, car: CarId, description: String) -> Violation {
        Violation {
            kind,
            car: Some(car),
            branch: None,
            association: None,
            description,
        }
    }
}
