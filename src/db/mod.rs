pub mod executor;
pub mod value;

pub use executor::*;
pub use value::*;
