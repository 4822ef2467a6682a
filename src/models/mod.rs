//! Domain model module declarations.

pub mod failure;
pub mod outcome;
pub mod request;
