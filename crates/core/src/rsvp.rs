//! RSVP submission parsing and validation.
//!
//! Public forms across template generations post slightly different field
//! names (`email` vs `guestEmail`, `guestCount` vs `guests`, an `attendance`
//! string vs an `attending` bool). [`RsvpPayload`] accepts all of them and
//! [`RsvpPayload::into_submission`] normalizes and validates into a single
//! [`RsvpSubmission`] or a list of field errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::error::{CoreError, FieldError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ATTENDANCE_ATTENDING: &str = "attending";
pub const ATTENDANCE_NOT_ATTENDING: &str = "not-attending";

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Attendance {
    Attending,
    NotAttending,
}

impl Attendance {
    pub fn as_str(self) -> &'static str {
        match self {
            Attendance::Attending => ATTENDANCE_ATTENDING,
            Attendance::NotAttending => ATTENDANCE_NOT_ATTENDING,
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attendance {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ATTENDANCE_ATTENDING => Ok(Attendance::Attending),
            ATTENDANCE_NOT_ATTENDING => Ok(Attendance::NotAttending),
            other => Err(CoreError::Validation(format!(
                "Attendance must be '{ATTENDANCE_ATTENDING}' or '{ATTENDANCE_NOT_ATTENDING}' (got '{other}')"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Raw RSVP body as posted by a public site. Unknown fields are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub guest_email: Option<String>,
    pub guest_count: Option<Value>,
    pub guests: Option<Value>,
    pub guest_names: Option<String>,
    pub attendance: Option<String>,
    pub attending: Option<bool>,
    pub message: Option<String>,
}

/// A validated, normalized RSVP ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpSubmission {
    pub first_name: String,
    pub last_name: String,
    /// Trimmed and lowercased; the duplicate check keys on it.
    pub email: String,
    pub guest_count: String,
    pub guest_names: Option<String>,
    pub attendance: Attendance,
    pub message: Option<String>,
}

#[derive(Debug, Validate)]
struct RsvpForm {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    last_name: String,
    #[validate(email(message = "Email must be a valid address"))]
    email: String,
    #[validate(length(min = 1, max = 20, message = "Guest count is required"))]
    guest_count: String,
    #[validate(length(max = 1000, message = "Guest names are too long"))]
    guest_names: Option<String>,
    #[validate(length(max = 2000, message = "Message is too long"))]
    message: Option<String>,
}

impl RsvpPayload {
    /// Normalize field aliases and validate. Errors are sorted by field name.
    pub fn into_submission(self) -> Result<RsvpSubmission, CoreError> {
        let attendance = self.resolve_attendance();

        let form = RsvpForm {
            first_name: trimmed(self.first_name),
            last_name: trimmed(self.last_name),
            email: trimmed(self.email.or(self.guest_email)).to_lowercase(),
            guest_count: self
                .guest_count
                .or(self.guests)
                .map(guest_count_to_string)
                .unwrap_or_default(),
            guest_names: non_empty(self.guest_names),
            message: non_empty(self.message),
        };

        let mut errors = match form.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };
        if let Err(message) = &attendance {
            errors.push(FieldError::new("attendance", message.clone()));
        }
        if !errors.is_empty() {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(CoreError::InvalidFields(errors));
        }

        Ok(RsvpSubmission {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            guest_count: form.guest_count,
            guest_names: form.guest_names,
            attendance: attendance.map_err(CoreError::Validation)?,
            message: form.message,
        })
    }

    fn resolve_attendance(&self) -> Result<Attendance, String> {
        match self.attendance.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.parse().map_err(|_| {
                format!("Attendance must be '{ATTENDANCE_ATTENDING}' or '{ATTENDANCE_NOT_ATTENDING}'")
            }),
            _ => match self.attending {
                Some(true) => Ok(Attendance::Attending),
                Some(false) => Ok(Attendance::NotAttending),
                None => Err("Attendance is required".to_string()),
            },
        }
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn guest_count_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Flatten validator output into camelCase field errors.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, errs) in errors.field_errors() {
        let name = camel_case(&field);
        for err in errs.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value ({})", err.code));
            out.push(FieldError::new(name.clone(), message));
        }
    }
    out
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
