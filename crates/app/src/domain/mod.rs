//! Shop Domain Concerns

pub mod items;
pub mod orders;
