//! Built-in starting schemas.

use serde_json::{json, Value};

/// Schema for KC safety-standard documents: document metadata plus the
/// safety-criteria table. Written in the natural nested form: run it
/// through [`crate::schema::auto_fix_schema`] before extraction, the same
/// path generated schemas take.
pub fn kc_safety_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "document_metadata": {
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "Document title"},
                    "revision_date": {"type": "string", "description": "Revision date"},
                    "product_scope": {"type": "string", "description": "Covered product range"}
                }
            },
            "safety_criteria": {
                "type": "array",
                "description": "Safety criteria entries",
                "items": {
                    "type": "object",
                    "properties": {
                        "test_item": {
                            "type": "string",
                            "description": "Test item name (e.g. viscosity, boiling point, tensile strength)"
                        },
                        "conditions": {
                            "type": "object",
                            "properties": {
                                "temperature": {"type": "string", "description": "Test temperature (e.g. 25±3°C)"},
                                "time": {"type": "string", "description": "Test duration (e.g. 24 hours)"},
                                "method": {"type": "string", "description": "Test method summary"}
                            }
                        },
                        "standard_value": {
                            "type": "object",
                            "properties": {
                                "value": {"type": "string", "description": "Threshold value, including ranges"},
                                "unit": {"type": "string", "description": "Unit (e.g. mm²/s, mg/kg)"}
                            }
                        }
                    },
                    "required": ["test_item"]
                }
            }
        },
        "required": ["safety_criteria"]
    })
}

/// Flat invoice schema, already API-compliant as written.
pub fn invoice_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "invoice_number": {"type": "string", "description": "Unique identifier for the invoice"},
            "invoice_date": {"type": "string", "description": "Date of issue"},
            "vendor_name": {"type": "string", "description": "Name of the vendor"},
            "vendor_address": {"type": "string", "description": "Address of the vendor"},
            "total_amount": {"type": "number", "description": "Grand total including tax"},
            "line_items": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "description": {"type": "string"},
                        "amount": {"type": "number"}
                    }
                }
            }
        },
        "required": ["invoice_number", "total_amount"]
    })
}
