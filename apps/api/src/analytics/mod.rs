pub mod aggregate;
pub mod cache;
pub mod flatten;
pub mod handlers;
