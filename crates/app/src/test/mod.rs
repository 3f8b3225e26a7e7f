//! Service test support: per-test databases and shared fixtures.

mod context;
mod db;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
