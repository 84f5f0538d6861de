pub mod validation;

pub use validation::{AnyJsonBody, JsonBody, ValidatedJson};
