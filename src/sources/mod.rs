//! Concrete product API backends

pub mod dummyjson;

pub use dummyjson::DummyJsonSource;
