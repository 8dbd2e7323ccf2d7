//! Service layer for the customer API.
//! - `customer::repository` maps domain operations onto the store gateway.
//! - `customer::service` enforces the business rules on top of it.
//! - Errors are tagged by kind so callers never inspect message text.

pub mod customer;
#[cfg(test)]
pub mod test_support;
