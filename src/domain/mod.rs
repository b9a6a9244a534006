pub mod keys;
pub mod models;
