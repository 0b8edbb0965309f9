//! Module containing the type-erased single-value container

pub(crate) mod descriptor;
mod raw;
pub(crate) mod storage;

pub use self::raw::RawHoldall;
