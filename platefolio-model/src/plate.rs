use crate::ValidationError;
use platefolio_types::{OwnerId, PlateId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered plate.
///
/// `owner` is set from the caller's resolved identity at creation and is
/// never user-editable afterward. `is_public` defaults to false: a plate is
/// private until its owner says otherwise, even when linked into a public
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plate {
    pub id: PlateId,
    pub owner: OwnerId,
    pub country_code: String,
    pub region_code: Option<String>,
    pub year: Option<i32>,
    pub serial: Option<String>,
    pub is_public: bool,
    /// Milliseconds since the Unix epoch; lists are ordered newest-first.
    pub created_at: i64,
}

impl Plate {
    /// Builds a plate from validated input, stamping owner and creation time.
    #[must_use]
    pub fn from_draft(draft: PlateDraft, owner: OwnerId) -> Self {
        Self {
            id: PlateId::new(),
            owner,
            country_code: draft.country_code,
            region_code: draft.region_code,
            year: draft.year,
            serial: draft.serial,
            is_public: draft.is_public,
            created_at: crate::now_millis(),
        }
    }

    /// One-line rendering used by every list view:
    /// `{country}[-{region}][ {year}][ — {serial}]`, e.g. `US-NY 1977`.
    #[must_use]
    pub fn label(&self) -> String {
        let mut out = self.country_code.clone();
        if let Some(region) = &self.region_code {
            out.push('-');
            out.push_str(region);
        }
        if let Some(year) = self.year {
            out.push(' ');
            out.push_str(&year.to_string());
        }
        if let Some(serial) = &self.serial {
            out.push_str(" — ");
            out.push_str(serial);
        }
        out
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// User input for a new plate, before validation.
///
/// `validate` trims every text field, turns empty optional fields into
/// `None`, and rejects a missing country code, the only required field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateDraft {
    pub country_code: String,
    pub region_code: Option<String>,
    pub year: Option<i32>,
    pub serial: Option<String>,
    pub is_public: bool,
}

impl PlateDraft {
    /// Normalizes the draft in place and rejects invalid input.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.country_code = self.country_code.trim().to_string();
        if self.country_code.is_empty() {
            return Err(ValidationError("country code required".to_string()));
        }
        self.region_code = self.region_code.and_then(trim_optional);
        self.serial = self.serial.and_then(trim_optional);
        Ok(self)
    }
}

/// Trims a text field, mapping whitespace-only input to `None`.
pub(crate) fn trim_optional(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}
