pub mod errors;
pub mod fee;
pub mod value_objects;

pub use errors::*;
pub use fee::*;
pub use value_objects::*;
