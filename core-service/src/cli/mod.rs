//! Terminal front end

pub mod display;
pub mod input;
