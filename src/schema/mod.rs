//! Case record schema and validation

pub mod registry;
pub mod validator;

pub use registry::{SchemaRegistry, CASE_SCHEMA};
pub use validator::{
    is_valid_email, validate_case, CheckError, SchemaError, ValidationError, Validator, Violation,
};
