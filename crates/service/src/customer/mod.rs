//! Customer module: three-layer architecture (domain, repository, service).
//!
//! The repository normalizes store-level "no rows" into `Option`/`bool`, so
//! the service only ever reasons about domain outcomes.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{Customer, CustomerId, CustomerPatch, NewCustomer};
pub use errors::{CustomerError, RepositoryError};
pub use repository::CustomerRepository;
pub use service::CustomerService;
