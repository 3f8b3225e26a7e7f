//! Bearer token guards

pub(crate) mod middleware;
