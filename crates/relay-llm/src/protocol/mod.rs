//! Wire format types
//!
//! Pure serde structs for the inbound chat surface and the Vertex AI
//! upstream. They are only used at the boundary; everything in between
//! works on the canonical types.

pub mod openai;
pub mod vertex;
