// Re-export all model types
pub use self::enums::*;
pub use self::errors::*;
pub use self::pizza::*;
pub use self::validation::*;

mod enums;
mod errors;
mod pizza;
mod validation;
