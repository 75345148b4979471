//! Validate network configuration DSL programs and compile them into
//! RouterOS scripts.

pub mod address;
pub mod compile;
pub mod emit;
pub mod report;
pub mod resolve;
pub mod section;
pub mod settings;
pub mod translate;
pub mod typecheck;
pub mod validate;
pub mod verify;
