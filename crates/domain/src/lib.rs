pub mod envelope;
pub mod errors;
pub mod todo;
pub mod validation;

pub use envelope::*;
pub use errors::*;
pub use todo::*;
pub use validation::*;
