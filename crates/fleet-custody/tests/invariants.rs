use std::sync::Arc;

use chrono::NaiveDate;
use fleet_custody::{CarProjector, CurrentlyWith, CustodyAuditor, CustodyError, CustodyLedger, TransitionService};
use fleet_store::{FleetStore, InMemoryFleetStore};
use fleet_types::{BranchId, CarId, DriverId, NewBranch, NewCar, NewDriver};
use proptest::prelude::*;

const CARS: u64 = 5;
const BRANCHES: u64 = 3;
const DRIVERS: u64 = 3;

#[derive(Clone, Debug)]
enum Op {
    Return { car: u64, branch: u64 },
    Rent { car: u64, driver: u64 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1..=CARS, 1..=BRANCHES).prop_map(|(car, branch)| Op::Return { car, branch }),
        (1..=CARS, 1..=DRIVERS).prop_map(|(car, driver)| Op::Rent { car, driver }),
    ]
}

fn seeded(capacities: &[u32]) -> Arc<InMemoryFleetStore> {
    let store = Arc::new(InMemoryFleetStore::new());
    for i in 0..CARS {
        store
            .create_car(NewCar::new("Make", format!("Model {i}"), 2000))
            .unwrap();
    }
    for (i, capacity) in capacities.iter().enumerate() {
        store
            .create_branch(NewBranch::new(format!("City {i}"), "AB1 2CD").with_capacity(*capacity))
            .unwrap();
    }
    for i in 0..DRIVERS {
        store
            .create_driver(NewDriver {
                first_name: format!("Driver{i}"),
                middle_names: None,
                last_name: "Test".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            })
            .unwrap();
    }
    store
}

proptest! {
    #[test]
    fn transitions_preserve_custody_invariants(
        capacities in proptest::collection::vec(1u32..=2, BRANCHES as usize),
        ops in proptest::collection::vec(op(), 1..40),
    ) {
        let store = seeded(&capacities);
        let service = TransitionService::new(Arc::clone(&store));
        let projector = CarProjector::new(Arc::clone(&store));

        for op in ops {
            let before = store.snapshot().unwrap();
            let result = match op {
                Op::Return { car, branch } => service
                    .assign_to_branch(CarId::new(car), BranchId::new(branch))
                    .map(|_| ()),
                Op::Rent { car, driver } => service
                    .assign_to_driver(CarId::new(car), DriverId::new(driver))
                    .map(|_| ()),
            };

            match result {
                Ok(()) => {}
                Err(
                    CustodyError::CapacityExceeded { .. }
                    | CustodyError::AlreadyAssigned { .. }
                    | CustodyError::DriverBusy { .. },
                ) => {
                    let after = store.snapshot().unwrap();
                    prop_assert_eq!(
                        before.branch_associations().collect::<Vec<_>>(),
                        after.branch_associations().collect::<Vec<_>>()
                    );
                    prop_assert_eq!(
                        before.driver_associations().collect::<Vec<_>>(),
                        after.driver_associations().collect::<Vec<_>>()
                    );
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }

            let report = store.read(CustodyAuditor::audit).unwrap();
            prop_assert!(report.is_valid(), "violations: {:?}", report.violations);

            for view in projector.render_all().unwrap() {
                let custody = store
                    .read(|t| CustodyLedger::new(t).current_custody(view.id))
                    .unwrap()
                    .unwrap();
                match view.currently_with {
                    CurrentlyWith::Branch(b) => prop_assert_eq!(custody.branch(), Some(b.id)),
                    CurrentlyWith::Driver(d) => prop_assert_eq!(custody.driver(), Some(d.id)),
                    CurrentlyWith::Unassigned { .. } => prop_assert!(custody.is_unassigned()),
                }
            }
        }
    }
}
