//! Request bodies and their field-level checks.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use fleet_custody::CustodyError;
use fleet_store::{FleetTables, StoreError};
use fleet_types::{BranchId, CarId, DriverId, FieldErrors, FieldReader};
use serde_json::{Map, Value};

use crate::error::ServerError;

/// A JSON object request body. An empty body reads as `{}`.
#[derive(Debug, Default)]
pub struct JsonObject(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ServerError::MalformedBody(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        match serde_json::from_slice(&bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(FieldErrors::single(
                "non_field_errors",
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_kind(&other)
                ),
            )
            .into()),
            Err(e) => Err(ServerError::MalformedBody(e.to_string())),
        }
    }
}

/// A numeric record id taken from the request path.
///
/// An id that does not parse cannot name a record, so it is rejected as not
/// found rather than as a bad request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathId(pub u64);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ServerError::NotFound(e.body_text()))?;
        match raw.parse::<u64>() {
            Ok(id) => Ok(Self(id)),
            Err(_) => Err(ServerError::NotFound(raw)),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn invalid_pk(raw: impl std::fmt::Display) -> String {
    format!("Invalid pk \"{raw}\" - object does not exist.")
}

fn read_pk(reader: &mut FieldReader<'_>, field: &str) -> Option<u64> {
    let raw = reader.required_integer(field)?;
    match u64::try_from(raw) {
        Ok(pk) if pk > 0 => Some(pk),
        _ => {
            reader.reject(field, invalid_pk(raw));
            None
        }
    }
}

/// Body of a return-car request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReturnCar {
    pub car: CarId,
    pub branch: BranchId,
}

impl ReturnCar {
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(body);
        let car = read_pk(&mut reader, "car");
        let branch = read_pk(&mut reader, "branch");
        reader.finish()?;
        match (car, branch) {
            (Some(car), Some(branch)) => Ok(Self {
                car: CarId::new(car),
                branch: BranchId::new(branch),
            }),
            _ => Err(FieldErrors::single("non_field_errors", "Invalid data.")),
        }
    }

    /// Per-field errors for references that do not resolve.
    pub fn check_references(&self, tables: &FleetTables) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if tables.car(self.car).is_err() {
            errors.add("car", invalid_pk(self.car.get()));
        }
        if tables.branch(self.branch).is_err() {
            errors.add("branch", invalid_pk(self.branch.get()));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Body of a rent-car request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RentCar {
    pub car: CarId,
    pub driver: DriverId,
}

impl RentCar {
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(body);
        let car = read_pk(&mut reader, "car");
        let driver = read_pk(&mut reader, "driver");
        reader.finish()?;
        match (car, driver) {
            (Some(car), Some(driver)) => Ok(Self {
                car: CarId::new(car),
                driver: DriverId::new(driver),
            }),
            _ => Err(FieldErrors::single("non_field_errors", "Invalid data.")),
        }
    }

    pub fn check_references(&self, tables: &FleetTables) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if tables.car(self.car).is_err() {
            errors.add("car", invalid_pk(self.car.get()));
        }
        if tables.driver(self.driver).is_err() {
            errors.add("driver", invalid_pk(self.driver.get()));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Map a transition failure for a body-supplied reference to a field error.
///
/// A row deleted between the reference check and the transition surfaces
/// here as a not-found store error.
pub fn reference_error(err: CustodyError) -> ServerError {
    let field = match &err {
        CustodyError::Store(StoreError::CarNotFound(id)) => ("car", id.get()),
        CustodyError::Store(StoreError::BranchNotFound(id)) => ("branch", id.get()),
        CustodyError::Store(StoreError::DriverNotFound(id)) => ("driver", id.get()),
        _ => return err.into(),
    };
    FieldErrors::single(field.0, invalid_pk(field.1)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_types::{NewBranch, NewCar};
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn return_car_reads_numeric_strings() {
        let req = ReturnCar::from_body(&body(json!({"car": "2", "branch": 1}))).unwrap();
        assert_eq!(req.car, CarId::new(2));
        assert_eq!(req.branch, BranchId::new(1));
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let err = RentCar::from_body(&Map::new()).unwrap_err();
        assert_eq!(err.get("car").unwrap(), ["This field is required."]);
        assert_eq!(err.get("driver").unwrap(), ["This field is required."]);
    }

    #[test]
    fn non_positive_pk_is_invalid() {
        let err = ReturnCar::from_body(&body(json!({"car": 0, "branch": -3}))).unwrap_err();
        assert_eq!(err.get("car").unwrap(), ["Invalid pk \"0\" - object does not exist."]);
        assert_eq!(
            err.get("branch").unwrap(),
            ["Invalid pk \"-3\" - object does not exist."]
        );
    }

    #[test]
    fn unresolved_references_name_each_field() {
        let mut tables = FleetTables::new();
        let car = tables.insert_car(NewCar::new("Ford", "Fiesta", 2018)).id;
        tables.insert_branch(NewBranch::new("Welling", "DA16 3RR"));

        let ok = ReturnCar {
            car,
            branch: BranchId::new(1),
        };
        assert!(ok.check_references(&tables).is_ok());

        let missing = RentCar {
            car: CarId::new(9),
            driver: DriverId::new(4),
        };
        let err = missing.check_references(&tables).unwrap_err();
        assert_eq!(err.get("car").unwrap(), ["Invalid pk \"9\" - object does not exist."]);
        assert_eq!(err.get("driver").unwrap(), ["Invalid pk \"4\" - object does not exist."]);
    }

    #[test]
    fn not_found_during_transition_becomes_field_error() {
        let err = reference_error(CustodyError::Store(StoreError::BranchNotFound(
            BranchId::new(5),
        )));
        match err {
            ServerError::Validation(fields) => assert!(fields.get("branch").is_some()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
