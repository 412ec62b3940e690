//! Conversion between canonical types and wire formats

pub mod openai;
pub mod vertex;
