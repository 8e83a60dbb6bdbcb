use serde_json::Value;

use crate::errors::ServiceError;
use models::car::{CarChanges, NewCar};

/// Request body for create and update.
///
/// Each field distinguishes "absent" (`None`) from "sent" (`Some`), including
/// an explicit `null`. Values are coerced to text by `into_new_car` /
/// `into_changes`; unknown fields are ignored.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CarInput {
    pub color: Option<Value>,
    pub brand: Option<Value>,
}

/// Coerce a scalar to a string field value; `null` clears the field.
fn coerce(field: &str, value: Value) -> Result<Option<String>, ServiceError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err(ServiceError::Cast(format!("cannot cast array to string for `{field}`"))),
        Value::Object(_) => Err(ServiceError::Cast(format!("cannot cast object to string for `{field}`"))),
    }
}

impl CarInput {
    /// Pick the fields out of a parsed body by name.
    ///
    /// An array carries no fields. Scalars are not a body at all and give `None`.
    pub fn from_json(body: Value) -> Option<Self> {
        match body {
            Value::Object(mut fields) => Some(Self {
                color: fields.remove("color"),
                brand: fields.remove("brand"),
            }),
            Value::Array(_) => Some(Self::default()),
            _ => None,
        }
    }

    pub fn into_new_car(self) -> Result<NewCar, ServiceError> {
        Ok(NewCar {
            color: self.color.map(|v| coerce("color", v)).transpose()?.flatten(),
            brand: self.brand.map(|v| coerce("brand", v)).transpose()?.flatten(),
        })
    }

    pub fn into_changes(self) -> Result<CarChanges, ServiceError> {
        Ok(CarChanges {
            color: self.color.map(|v| coerce("color", v)).transpose()?,
            brand: self.brand.map(|v| coerce("brand", v)).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(v: Value) -> CarInput {
        CarInput::from_json(v).unwrap()
    }

    #[test]
    fn absent_and_null_are_distinct() {
        let i = input(json!({"color": null}));
        assert_eq!(i.color, Some(Value::Null));
        assert_eq!(i.brand, None);

        let changes = i.into_changes().unwrap();
        assert_eq!(changes, CarChanges { color: Some(None), brand: None });
    }

    #[test]
    fn scalars_are_coerced_to_text() {
        let new = input(json!({"color": 42, "brand": true})).into_new_car().unwrap();
        assert_eq!(new.color.as_deref(), Some("42"));
        assert_eq!(new.brand.as_deref(), Some("true"));
    }

    #[test]
    fn empty_body_creates_empty_car() {
        let new = input(json!({})).into_new_car().unwrap();
        assert_eq!(new, NewCar::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let new = input(json!({"color": "Blue", "wheels": 4})).into_new_car().unwrap();
        assert_eq!(new.color.as_deref(), Some("Blue"));
        assert_eq!(new.brand, None);
    }

    #[test]
    fn structured_values_fail_to_cast() {
        let err = input(json!({"brand": {"name": "BMW"}})).into_new_car().unwrap_err();
        assert!(matches!(err, ServiceError::Cast(_)));
        let err = input(json!({"color": ["Blue"]})).into_changes().unwrap_err();
        assert!(matches!(err, ServiceError::Cast(_)));
    }

    #[test]
    fn array_body_carries_no_fields() {
        assert_eq!(CarInput::from_json(json!(["x", "y"])), Some(CarInput::default()));
        let new = input(json!(["Blue", "BMW"])).into_new_car().unwrap();
        assert_eq!(new, NewCar::default());
    }

    #[test]
    fn scalar_body_is_rejected() {
        assert_eq!(CarInput::from_json(json!("my-secret-value")), None);
        assert_eq!(CarInput::from_json(json!(7)), None);
        assert_eq!(CarInput::from_json(Value::Null), None);
    }
}
