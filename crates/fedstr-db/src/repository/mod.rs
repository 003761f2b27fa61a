//! Repository layer: query functions organized by table.

pub mod cache;
pub mod mappings;
