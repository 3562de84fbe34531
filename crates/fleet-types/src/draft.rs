//! Drafts for new entities, built from untyped request bodies.
//!
//! [`FieldReader`] pulls typed values out of a JSON object and accumulates a
//! message per offending field instead of failing on the first one, so a
//! caller sees every problem with a request at once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::DEFAULT_BRANCH_CAPACITY;
use crate::error::FieldErrors;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_AN_INTEGER: &str = "A valid integer is required.";
pub const BAD_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

const MAKE_MAX: usize = 50;
const MODEL_MAX: usize = 50;
const CITY_MAX: usize = 50;
const POSTCODE_MAX: usize = 8;
const FIRST_NAME_MAX: usize = 50;
const MIDDLE_NAMES_MAX: usize = 255;
const LAST_NAME_MAX: usize = 50;

/// Typed, accumulating reader over a JSON object.
pub struct FieldReader<'a> {
    body: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(body: &'a Map<String, Value>) -> Self {
        Self {
            body,
            errors: FieldErrors::new(),
        }
    }

    /// Record an error that the reader itself cannot detect.
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// A non-blank string of at most `max_len` characters, trimmed.
    pub fn required_text(&mut self, field: &str, max_len: usize) -> Option<String> {
        match self.body.get(field) {
            None => {
                self.errors.add(field, REQUIRED);
                None
            }
            Some(Value::Null) => {
                self.errors.add(field, NOT_NULL);
                None
            }
            Some(value) => {
                let text = self.text(field, value, max_len)?;
                if text.is_empty() {
                    self.errors.add(field, NOT_BLANK);
                    return None;
                }
                Some(text)
            }
        }
    }

    /// Like [`required_text`](Self::required_text), but absence, `null` and
    /// blank all read as `None`.
    pub fn optional_text(&mut self, field: &str, max_len: usize) -> Option<String> {
        match self.body.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.text(field, value, max_len).filter(|t| !t.is_empty()),
        }
    }

    /// An integer, accepted either as a JSON number or a numeric string.
    pub fn required_integer(&mut self, field: &str) -> Option<i64> {
        match self.body.get(field) {
            None => {
                self.errors.add(field, REQUIRED);
                None
            }
            Some(Value::Null) => {
                self.errors.add(field, NOT_NULL);
                None
            }
            Some(value) => self.integer(field, value),
        }
    }

    pub fn optional_integer(&mut self, field: &str) -> Option<i64> {
        match self.body.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.integer(field, value),
        }
    }

    /// A `YYYY-MM-DD` calendar date.
    pub fn required_date(&mut self, field: &str) -> Option<NaiveDate> {
        match self.body.get(field) {
            None => {
                self.errors.add(field, REQUIRED);
                None
            }
            Some(Value::Null) => {
                self.errors.add(field, NOT_NULL);
                None
            }
            Some(Value::String(raw)) => match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    self.errors.add(field, BAD_DATE);
                    None
                }
            },
            Some(_) => {
                self.errors.add(field, BAD_DATE);
                None
            }
        }
    }

    /// Check `value` against inclusive bounds, recording a message on failure.
    pub fn bounded(&mut self, field: &str, value: i64, min: i64, max: Option<i64>) -> Option<i64> {
        if value < min {
            self.errors.add(
                field,
                format!("Ensure this value is greater than or equal to {min}."),
            );
            return None;
        }
        if let Some(max) = max {
            if value > max {
                self.errors
                    .add(field, format!("Ensure this value is less than or equal to {max}."));
                return None;
            }
        }
        Some(value)
    }

    /// Consume the reader. Returns the accumulated errors, if any.
    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn text(&mut self, field: &str, value: &Value, max_len: usize) -> Option<String> {
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.errors.add(field, NOT_A_STRING);
                return None;
            }
        };
        if text.chars().count() > max_len {
            self.errors.add(
                field,
                format!("Ensure this field has no more than {max_len} characters."),
            );
            return None;
        }
        Some(text)
    }

    fn integer(&mut self, field: &str, value: &Value) -> Option<i64> {
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.errors.add(field, NOT_AN_INTEGER);
        }
        parsed
    }
}

/// Validated fields for a new car.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year_of_manufacture: u32,
}

impl NewCar {
    /// Build from a request body. The year of manufacture may not be later
    /// than `current_year`.
    pub fn from_body(body: &Map<String, Value>, current_year: i32) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(body);
        let make = reader.required_text("make", MAKE_MAX);
        let model = reader.required_text("model", MODEL_MAX);
        let year = reader
            .required_integer("year_of_manufacture")
            .and_then(|y| reader.bounded("year_of_manufacture", y, 0, Some(i64::from(current_year))));
        reader.finish()?;

        match (make, model, year.and_then(|y| u32::try_from(y).ok())) {
            (Some(make), Some(model), Some(year_of_manufacture)) => Ok(Self {
                make,
                model,
                year_of_manufacture,
            }),
            _ => Err(FieldErrors::single("non_field_errors", "Invalid data.")),
        }
    }
}

/// Validated fields for a new branch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBranch {
    pub city: String,
    pub postcode: String,
    pub capacity: u32,
}

impl NewBranch {
    /// Build from a request body. A missing capacity falls back to `default_capacity`.
    pub fn from_body(body: &Map<String, Value>, default_capacity: u32) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(body);
        let city = reader.required_text("city", CITY_MAX);
        let postcode = reader.required_text("postcode", POSTCODE_MAX);
        let capacity = match reader.optional_integer("capacity") {
            Some(raw) => reader
                .bounded("capacity", raw, 1, Some(i64::from(u32::MAX)))
                .map(|c| c as u32),
            None => Some(default_capacity),
        };
        reader.finish()?;

        match (city, postcode, capacity) {
            (Some(city), Some(postcode), Some(capacity)) => Ok(Self {
                city,
                postcode,
                capacity,
            }),
            _ => Err(FieldErrors::single("non_field_errors", "Invalid data.")),
        }
    }

    /// Draft with the default capacity.
    pub fn new(city: impl Into<String>, postcode: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            postcode: postcode.into(),
            capacity: DEFAULT_BRANCH_CAPACITY,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Validated fields for a new driver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDriver {
    pub first_name: String,
    pub middle_names: Option<String>,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl NewDriver {
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(body);
        let first_name = reader.required_text("first_name", FIRST_NAME_MAX);
        let middle_names = reader.optional_text("middle_names", MIDDLE_NAMES_MAX);
        let last_name = reader.required_text("last_name", LAST_NAME_MAX);
        let date_of_birth = reader.required_date("date_of_birth");
        reader.finish()?;

        match (first_name, last_name, date_of_birth) {
            (Some(first_name), Some(last_name), Some(date_of_birth)) => Ok(Self {
                first_name,
                middle_names,
                last_name,
                date_of_birth,
            }),
            _ => Err(FieldErrors::single("non_field_errors", "Invalid data.")),
        }
    }
}

impl NewCar {
    pub fn new(make: impl Into<String>, model: impl Into<String>, year_of_manufacture: u32) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year_of_manufacture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_car_body_reports_every_required_field() {
        let errors = NewCar::from_body(&Map::new(), 2026).unwrap_err();
        for field in ["make", "model", "year_of_manufacture"] {
            assert_eq!(errors.get(field).unwrap(), [REQUIRED.to_string()]);
        }
    }

    #[test]
    fn car_year_after_current_year_is_rejected() {
        let errors = NewCar::from_body(
            &body(json!({"make": "Tesla", "model": "Model Y", "year_of_manufacture": 2027})),
            2026,
        )
        .unwrap_err();
        assert_eq!(
            errors.get("year_of_manufacture").unwrap(),
            ["Ensure this value is less than or equal to 2026.".to_string()]
        );
        assert!(errors.get("make").is_none());
    }

    #[test]
    fn car_accepts_numeric_string_year() {
        let car = NewCar::from_body(
            &body(json!({"make": "Reliant", "model": "Robin Mk2", "year_of_manufacture": "1990"})),
            2026,
        )
        .unwrap();
        assert_eq!(car, NewCar::new("Reliant", "Robin Mk2", 1990));
    }

    #[test]
    fn car_rejects_non_integer_year_and_blank_make() {
        let errors = NewCar::from_body(
            &body(json!({"make": "  ", "model": "Fiesta", "year_of_manufacture": "soon"})),
            2026,
        )
        .unwrap_err();
        assert_eq!(errors.get("make").unwrap(), [NOT_BLANK.to_string()]);
        assert_eq!(errors.get("year_of_manufacture").unwrap(), [NOT_AN_INTEGER.to_string()]);
    }

    #[test]
    fn overlong_text_is_rejected() {
        let errors = NewBranch::from_body(
            &body(json!({"city": "London", "postcode": "WC2B 6ST XX"})),
            10,
        )
        .unwrap_err();
        assert_eq!(
            errors.get("postcode").unwrap(),
            ["Ensure this field has no more than 8 characters.".to_string()]
        );
    }

    #[test]
    fn branch_capacity_defaults_and_must_be_positive() {
        let branch =
            NewBranch::from_body(&body(json!({"city": "London", "postcode": "WC2B 6ST"})), 10)
                .unwrap();
        assert_eq!(branch, NewBranch::new("London", "WC2B 6ST"));

        let errors = NewBranch::from_body(
            &body(json!({"city": "Welling", "postcode": "DA16 3RR", "capacity": 0})),
            10,
        )
        .unwrap_err();
        assert_eq!(
            errors.get("capacity").unwrap(),
            ["Ensure this value is greater than or equal to 1.".to_string()]
        );
    }

    #[test]
    fn empty_branch_body_reports_city_and_postcode_only() {
        let errors = NewBranch::from_body(&Map::new(), 10).unwrap_err();
        assert_eq!(errors.field_names().collect::<Vec<_>>(), vec!["city", "postcode"]);
    }

    #[test]
    fn driver_middle_names_optional() {
        let driver = NewDriver::from_body(&body(json!({
            "first_name": "Joe",
            "last_name": "Bloggs",
            "date_of_birth": "1990-01-01"
        })))
        .unwrap();
        assert_eq!(driver.middle_names, None);
        assert_eq!(driver.date_of_birth, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
    }

    #[test]
    fn driver_bad_date_and_missing_names() {
        let errors = NewDriver::from_body(&body(json!({"date_of_birth": "07/11/1997"}))).unwrap_err();
        assert_eq!(errors.get("date_of_birth").unwrap(), [BAD_DATE.to_string()]);
        assert_eq!(errors.get("first_name").unwrap(), [REQUIRED.to_string()]);
        assert_eq!(errors.get("last_name").unwrap(), [REQUIRED.to_string()]);
        assert!(errors.get("middle_names").is_none());
    }

    #[test]
    fn null_required_field() {
        let errors = NewCar::from_body(
            &body(json!({"make": null, "model": "Fiesta", "year_of_manufacture": 2018})),
            2026,
        )
        .unwrap_err();
        assert_eq!(errors.get("make").unwrap(), [NOT_NULL.to_string()]);
    }
}
