//! Tool record and its creation payloads
//!
//! A `Tool` is the persisted record. `ToolData` is the validated payload a
//! store turns into a new `Tool`, and `ToolDraft` is the loosely-typed shape
//! that comes back from the intake model before validation.

use serde::{Deserialize, Serialize};

use super::status::ToolStatus;
use crate::error::{Result, ToolTrackError};
use crate::id::generate_tool_id;

/// A tracked tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Opaque identifier, immutable once assigned
    pub id: String,

    pub name: String,

    /// Inventory or serial code (intended unique, not enforced)
    pub inventory_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub status: ToolStatus,

    /// Person or team the tool is assigned to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_holder: Option<String>,

    /// Site, vehicle or warehouse where the tool is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
}

impl Tool {
    /// Build a new in-stock tool with a fresh id
    pub fn from_data(data: ToolData) -> Self {
        Self::with_id(generate_tool_id(), data)
    }

    /// Build a new in-stock tool under an id assigned elsewhere
    pub fn with_id(id: impl Into<String>, data: ToolData) -> Self {
        Self {
            id: id.into(),
            name: data.name,
            inventory_code: data.inventory_code,
            description: data.description,
            status: ToolStatus::InStock,
            current_holder: data.current_holder,
            current_location: data.current_location,
        }
    }

    /// Check the field invariants that hold on every create and edit
    ///
    /// Returns the tool with the same trimming `ToolData::normalized` applies.
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            name: required("name", self.name)?,
            inventory_code: required("inventoryCode", self.inventory_code)?,
            description: clean(self.description),
            current_holder: clean(self.current_holder),
            current_location: clean(self.current_location),
            ..self
        })
    }

    /// Copy of this tool with a different status
    pub fn with_status(&self, status: ToolStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Validated fields for creating a tool
///
/// Carries no id and no status: stores assign the id and every new tool
/// starts in stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolData {
    pub name: String,
    pub inventory_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_holder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
}

impl ToolData {
    /// Create a payload with the two required fields
    pub fn new(name: impl Into<String>, inventory_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inventory_code: inventory_code.into(),
            description: None,
            current_holder: None,
            current_location: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_holder(mut self, holder: impl Into<String>) -> Self {
        self.current_holder = Some(holder.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.current_location = Some(location.into());
        self
    }

    /// Check that the required fields are present
    ///
    /// Strings are trimmed and blank optional fields become `None`, so every
    /// store persists the same record for the same payload.
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            name: required("name", self.name)?,
            inventory_code: required("inventoryCode", self.inventory_code)?,
            description: clean(self.description),
            current_holder: clean(self.current_holder),
            current_location: clean(self.current_location),
        })
    }
}

/// Partial tool as produced by the intake model
///
/// Every field is optional here; `validate` decides whether the draft is
/// good enough to become `ToolData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDraft {
    pub name: Option<String>,
    pub inventory_code: Option<String>,
    pub description: Option<String>,
    pub current_holder: Option<String>,
    pub current_location: Option<String>,
}

/// Reason a draft could not be accepted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required field: {0}")]
pub struct MissingField(pub &'static str);

impl ToolDraft {
    /// Convert into validated `ToolData`
    ///
    /// Strings are trimmed; blank optional fields become `None`.
    pub fn validate(self) -> std::result::Result<ToolData, MissingField> {
        let name = clean(self.name).ok_or(MissingField("name"))?;
        let inventory_code = clean(self.inventory_code).ok_or(MissingField("inventoryCode"))?;

        Ok(ToolData {
            name,
            inventory_code,
            description: clean(self.description),
            current_holder: clean(self.current_holder),
            current_location: clean(self.current_location),
        })
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required(field: &str, value: String) -> Result<String> {
    clean(Some(value)).ok_or_else(|| ToolTrackError::Validation(format!("{} must not be empty", field)))
}
