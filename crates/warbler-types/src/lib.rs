pub mod error;
pub mod forms;
pub mod models;

pub use error::{Result, WarblerError};
