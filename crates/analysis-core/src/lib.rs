pub mod display;
pub mod error;
pub mod types;
pub mod vote;
pub mod wire_date;

pub use error::*;
pub use types::*;
