use async_trait::async_trait;

use super::domain::{Customer, CustomerId, CustomerPatch, NewCustomer};
use super::errors::RepositoryError;

/// Repository abstraction for customer persistence.
///
/// Lookups by `customer_id` or `email` are exact-match and yield at most one
/// row. `find_all` is ordered by `customer_id` ascending.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, input: &NewCustomer) -> Result<Customer, RepositoryError>;
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError>;
    /// `None` when no row has this id.
    async fn update(&self, id: CustomerId, patch: &CustomerPatch) -> Result<Option<Customer>, RepositoryError>;
    /// `false` when no row has this id.
    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError>;
    /// Whether the backing store answers at all.
    async fn ping(&self) -> bool;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use models::errors::StoreError;

    #[derive(Default)]
    struct State {
        rows: BTreeMap<CustomerId, Customer>,
        last_id: CustomerId,
        failure: Option<StoreError>,
    }

    /// Mirrors the store contract: ids come from a counter and are never
    /// reused, and email is unique.
    #[derive(Default)]
    pub struct InMemoryCustomerRepository {
        state: Mutex<State>,
    }

    impl InMemoryCustomerRepository {
        /// Make every subsequent call fail with `err` until cleared.
        pub fn fail_with(&self, err: Option<StoreError>) {
            self.state.lock().unwrap().failure = err;
        }

        fn check(state: &State) -> Result<(), RepositoryError> {
            match &state.failure {
                Some(err) => Err(RepositoryError::from(err.clone())),
                None => Ok(()),
            }
        }

        fn email_taken(state: &State, email: &str, except: Option<CustomerId>) -> bool {
            state.rows.values().any(|c| c.email == email && Some(c.customer_id) != except)
        }
    }

    #[async_trait]
    impl CustomerRepository for InMemoryCustomerRepository {
        async fn create(&self, input: &NewCustomer) -> Result<Customer, RepositoryError> {
            let mut state = self.state.lock().unwrap();
            Self::check(&state)?;
            let email = input.email.clone().unwrap_or_default();
            if Self::email_taken(&state, &email, None) {
                return Err(RepositoryError::Conflict(format!("duplicate email {email}")));
            }
            state.last_id += 1;
            let customer = Customer {
                customer_id: state.last_id,
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                dob: input.dob,
                address: input.address.clone(),
                email,
                phone_number: input.phone_number.clone(),
                date_joined: input.date_joined.unwrap_or_else(|| chrono::Utc::now().date_naive()),
                status: input.status.clone().unwrap_or_else(|| "active".to_string()),
            };
            state.rows.insert(customer.customer_id, customer.clone());
            Ok(customer)
        }

        async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
            let state = self.state.lock().unwrap();
            Self::check(&state)?;
            Ok(state.rows.get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
            let state = self.state.lock().unwrap();
            Self::check(&state)?;
            Ok(state.rows.values().find(|c| c.email == email).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
            let state = self.state.lock().unwrap();
            Self::check(&state)?;
            Ok(state.rows.values().cloned().collect())
        }

        async fn update(&self, id: CustomerId, patch: &CustomerPatch) -> Result<Option<Customer>, RepositoryError> {
            let mut state = self.state.lock().unwrap();
            Self::check(&state)?;
            if let Some(email) = &patch.email {
                if Self::email_taken(&state, email, Some(id)) {
                    return Err(RepositoryError::Conflict(format!("duplicate email {email}")));
                }
            }
            let Some(row) = state.rows.get_mut(&id) else { return Ok(None) };
            if let Some(v) = &patch.first_name { row.first_name = v.clone(); }
            if let Some(v) = &patch.last_name { row.last_name = v.clone(); }
            if let Some(v) = patch.dob { row.dob = v; }
            if let Some(v) = &patch.address { row.address = v.clone(); }
            if let Some(v) = &patch.email { row.email = v.clone(); }
            if let Some(v) = &patch.phone_number { row.phone_number = v.clone(); }
            if let Some(v) = patch.date_joined { row.date_joined = v; }
            if let Some(v) = &patch.status { row.status = v.clone(); }
            Ok(Some(row.clone()))
        }

        async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
            let mut state = self.state.lock().unwrap();
            Self::check(&state)?;
            Ok(state.rows.remove(&id).is_some())
        }

        async fn ping(&self) -> bool {
            self.state.lock().unwrap().failure.is_none()
        }
    }
}
