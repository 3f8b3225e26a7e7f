//! Shop application domain, persistence and payment integration.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod ids;
pub mod money;
pub mod pagination;
pub mod payments;

#[cfg(test)]
mod test;
