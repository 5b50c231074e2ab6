//! rowcraft_engine - rich-text table computation engine.

pub mod engine;
