pub mod validation;

pub use validation::{ValidationConfig, ValidationService};
