//! Persistence layer: the `customers` entity, connection helpers and the
//! store gateway every repository goes through.

pub mod errors;
pub mod db;
pub mod customer;
pub mod gateway;

#[cfg(test)]
mod tests;
