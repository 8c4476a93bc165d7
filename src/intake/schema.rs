//! Response schema for tool intake
//!
//! Uses the OpenAPI-subset schema dialect the Gemini API accepts for
//! `responseSchema` (upper-case type names).

use serde_json::{Value, json};

/// Fields the model must always fill in
pub const REQUIRED_FIELDS: [&str; 2] = ["name", "inventoryCode"];

/// Schema for a single tool object, identical for every language
pub fn tool_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "The name of the tool (e.g., 'Power Drill', 'Circular Saw')."
            },
            "inventoryCode": {
                "type": "STRING",
                "description": "A unique inventory code or serial number for the tool."
            },
            "description": {
                "type": "STRING",
                "description": "Any additional details about the tool. Can be empty."
            },
            "currentHolder": {
                "type": "STRING",
                "description": "The name of the person or team the tool is assigned to."
            },
            "currentLocation": {
                "type": "STRING",
                "description": "The construction site, vehicle, or warehouse where the tool is located."
            }
        },
        "required": REQUIRED_FIELDS
    })
}
