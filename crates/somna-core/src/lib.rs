pub mod advice;
pub mod calendar;
pub mod config;
pub mod cycle;
pub mod debt;
pub mod error;
pub mod quality;
pub mod session;

pub use error::CoreError;
