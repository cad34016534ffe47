//! sea-orm entities
pub mod scores;
