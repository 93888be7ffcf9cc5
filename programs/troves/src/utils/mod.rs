#[macro_use]
pub mod macros;

pub mod bn;
pub mod consts;
pub mod coretypes;
pub mod finance;
pub mod math;
pub mod oracle;
