//! Data quality module.
//!
//! Row-level validation rules that reject implausible records.

mod validator;

pub use validator::DataValidator;
