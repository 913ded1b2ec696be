//! Request validation for the robot routes.
//!
//! Every check on a request runs before the handler decides, so a request with
//! a bad id and a bad body reports both problems in one `errors` array.

use serde_json::Value;

use crate::api::response::{FieldError, Location};
use crate::entities::prelude::{AlertKind, Priority};
use crate::error::ApiError;

/// Validated body of `POST /` and `PUT /:id`.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotDraft {
    pub name: String,
    pub status: bool,
    /// `None` when the key was absent; `Some(None)` clears the alert.
    pub alert: Option<Option<AlertKind>>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn reject(&mut self, location: Location, path: &str, value: Value, msg: &str) {
        self.errors.push(FieldError::new(location, path, value, msg));
    }

    /// Path id: an optionally signed run of ASCII digits that fits in an i32.
    pub fn robot_id(&mut self, raw: &str) -> Option<i32> {
        let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
        let parsed = if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            raw.parse::<i32>().ok()
        } else {
            None
        };
        if parsed.is_none() {
            self.reject(Location::Params, "id", Value::String(raw.to_string()), "Id not valid");
        }
        parsed
    }

    pub fn robot_draft(&mut self, body: &Value) -> Option<RobotDraft> {
        let name = self.name(body);
        let status = self.status(body);
        let alert = match body.get("alert") {
            None => Some(None),
            Some(value) => self.alert_value(value).map(Some),
        };
        let priority = match body.get("priority") {
            None | Some(Value::Null) => Some(None),
            Some(value) => self.priority_value(value).map(Some),
        };

        Some(RobotDraft {
            name: name?,
            status: status?,
            alert: alert?,
            priority: priority?,
        })
    }

    /// Body of `PATCH /:id/alert`: `alert` must be present, either null or a known literal.
    pub fn alert_update(&mut self, body: &Value) -> Option<Option<AlertKind>> {
        match body.get("alert") {
            Some(value) => self.alert_value(value),
            None => {
                self.reject(Location::Body, "alert", Value::Null, "Invalid alert type");
                None
            }
        }
    }

    fn name(&mut self, body: &Value) -> Option<String> {
        match body.get("name") {
            Some(Value::String(name)) if !name.is_empty() => Some(name.clone()),
            Some(
                value @ (Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_)),
            ) => {
                self.reject(Location::Body, "name", value.clone(), "Name must be a string");
                None
            }
            other => {
                let value = other.cloned().unwrap_or(Value::Null);
                self.reject(Location::Body, "name", value, "Name is required");
                None
            }
        }
    }

    fn status(&mut self, body: &Value) -> Option<bool> {
        match body.get("status") {
            Some(Value::Bool(status)) => Some(*status),
            None | Some(Value::Null) => {
                self.reject(Location::Body, "status", Value::Null, "Status is required");
                None
            }
            Some(Value::String(s)) if s.is_empty() => {
                let value = Value::String(String::new());
                self.reject(Location::Body, "status", value, "Status is required");
                None
            }
            Some(value) => {
                self.reject(Location::Body, "status", value.clone(), "Status must be a boolean");
                None
            }
        }
    }

    fn alert_value(&mut self, value: &Value) -> Option<Option<AlertKind>> {
        match value {
            Value::Null => Some(None),
            Value::String(s) => match AlertKind::parse(s) {
                Some(kind) => Some(Some(kind)),
                None => {
                    self.reject(Location::Body, "alert", value.clone(), "Invalid alert type");
                    None
                }
            },
            _ => {
                self.reject(Location::Body, "alert", value.clone(), "Invalid alert type");
                None
            }
        }
    }

    fn priority_value(&mut self, value: &Value) -> Option<Priority> {
        let parsed = value.as_str().and_then(Priority::parse);
        if parsed.is_none() {
            self.reject(Location::Body, "priority", value.clone(), "Invalid priority");
        }
        parsed
    }

    /// Records a rejected query parameter (dashboard filters).
    pub fn reject_query(&mut self, path: &str, raw: &str, msg: &str) {
        self.reject(Location::Query, path, Value::String(raw.to_string()), msg);
    }

    /// Every rejected field leaves its value as `None`, so a complete value
    /// implies an empty error list.
    pub fn finish<T>(self, value: Option<T>) -> Result<T, ApiError> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(ApiError::Validation(self.errors)),
        }
    }
}
