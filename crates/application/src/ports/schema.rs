//! Body-shape validation port

use serde_json::Value;
use volley_domain::shape;

/// Port for the engine that checks a parsed response body against a declared
/// `json` shape.
pub trait ShapeValidator: Send + Sync {
    /// Checks `body` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns the mismatch detail, including the offending JSON path.
    fn validate(&self, schema: &Value, body: &Value) -> Result<(), String>;
}

/// The default engine: the structural matcher from the domain crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl ShapeValidator for StructuralValidator {
    fn validate(&self, schema: &Value, body: &Value) -> Result<(), String> {
        shape::check(schema, body)
    }
}
