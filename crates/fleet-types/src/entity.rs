use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::custody::Custody;
use crate::id::{BranchId, CarId, DriverId};

/// Capacity given to a branch created without one.
pub const DEFAULT_BRANCH_CAPACITY: u32 = 10;

/// A car in the fleet.
///
/// `custody` is a denormalized copy of the custody ledger's answer for this
/// car. Only the transition service writes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub make: String,
    pub model: String,
    pub year_of_manufacture: u32,
    #[serde(default)]
    pub custody: Custody,
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} ({} {}, {})",
            self.id, self.make, self.model, self.year_of_manufacture
        )
    }
}

/// A branch that parks cars between rentals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub city: String,
    pub postcode: String,
    pub capacity: u32,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.postcode)
    }
}

/// A driver who may rent one car at a time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub first_name: String,
    pub middle_names: Option<String>,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl Driver {
    /// First, middle and last names separated by single spaces.
    pub fn full_name(&self) -> String {
        match &self.middle_names {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fiesta() -> Car {
        Car {
            id: CarId::new(1),
            make: "Ford".into(),
            model: "Fiesta".into(),
            year_of_manufacture: 2018,
            custody: Custody::Unassigned,
        }
    }

    #[test]
    fn car_display() {
        assert_eq!(fiesta().to_string(), "ID: 1 (Ford Fiesta, 2018)");
    }

    #[test]
    fn branch_display() {
        let branch = Branch {
            id: BranchId::new(1),
            city: "London".into(),
            postcode: "WC2B 6ST".into(),
            capacity: DEFAULT_BRANCH_CAPACITY,
        };
        assert_eq!(branch.to_string(), "London, WC2B 6ST");
    }

    #[test]
    fn driver_display_with_and_without_middle_names() {
        let mut driver = Driver {
            id: DriverId::new(1),
            first_name: "Aaron".into(),
            middle_names: Some("Toby".into()),
            last_name: "Traynor".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1997, 11, 7).unwrap(),
        };
        assert_eq!(driver.to_string(), "Aaron Toby Traynor");

        driver.middle_names = None;
        assert_eq!(driver.to_string(), "Aaron Traynor");
    }

    #[test]
    fn driver_serializes_iso_date_and_null_middle_names() {
        let driver = Driver {
            id: DriverId::new(2),
            first_name: "Joe".into(),
            middle_names: None,
            last_name: "Bloggs".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        };
        let json = serde_json::to_value(&driver).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 2,
                "first_name": "Joe",
                "middle_names": null,
                "last_name": "Bloggs",
                "date_of_birth": "1990-01-01"
            })
        );
    }

    #[test]
    fn car_without_custody_field_deserializes_unassigned() {
        let car: Car = serde_json::from_value(serde_json::json!({
            "id": 4,
            "make": "Tesla",
            "model": "Model S",
            "year_of_manufacture": 2016
        }))
        .unwrap();
        assert!(car.custody.is_unassigned());
    }
}
