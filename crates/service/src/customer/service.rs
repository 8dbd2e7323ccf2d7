use std::sync::Arc;

use tracing::{error, info, instrument};

use super::domain::{normalize_email, Customer, CustomerId, CustomerPatch, NewCustomer};
use super::errors::{CustomerError, RepositoryError, EMAIL_REQUIRED, NOTHING_TO_UPDATE};
use super::repository::CustomerRepository;

/// Customer business service, independent of the web framework.
///
/// Enforces email presence and uniqueness and checks existence before every
/// mutation. The check-then-write sequences are not transactional; the
/// store's unique constraint is the final word on concurrent duplicates and
/// surfaces as [`CustomerError::Conflict`] as well.
pub struct CustomerService<R: CustomerRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CustomerRepository + ?Sized> CustomerService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a customer after checking the email is present and unused.
    ///
    /// # Examples
    /// ```
    /// use service::customer::{CustomerService, NewCustomer, repository::mock::InMemoryCustomerRepository};
    /// use std::sync::Arc;
    /// let svc = CustomerService::new(Arc::new(InMemoryCustomerRepository::default()));
    /// let created = tokio_test::block_on(svc.create_customer(NewCustomer::with_email("a@x.com"))).unwrap();
    /// assert_eq!(created.email, "a@x.com");
    /// let dup = tokio_test::block_on(svc.create_customer(NewCustomer::with_email("a@x.com")));
    /// assert!(matches!(dup, Err(service::customer::CustomerError::Conflict(_))));
    /// ```
    #[instrument(skip(self, input), fields(email = ?input.email))]
    pub async fn create_customer(&self, mut input: NewCustomer) -> Result<Customer, CustomerError> {
        let email = normalize_email(input.email.as_deref())
            .ok_or_else(|| CustomerError::Validation(EMAIL_REQUIRED.into()))?;
        self.ensure_email_available(&email, "create customer").await?;

        input.email = Some(email);
        let created = self.repo.create(&input).await.map_err(store_failure("create customer"))?;
        info!(customer_id = created.customer_id, "customer_created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_customer_by_id(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(store_failure("fetch customer"))?
            .ok_or_else(CustomerError::not_found)
    }

    /// All customers ordered by id; an empty list is not an error.
    #[instrument(skip(self))]
    pub async fn get_all_customers(&self) -> Result<Vec<Customer>, CustomerError> {
        self.repo.find_all().await.map_err(store_failure("list customers"))
    }

    /// Apply a partial update.
    ///
    /// Order: empty-patch check, existence check, email uniqueness (only when
    /// the email actually changes), write. `customer_id` is never written.
    #[instrument(skip(self, patch))]
    pub async fn update_customer(&self, id: CustomerId, mut patch: CustomerPatch) -> Result<Customer, CustomerError> {
        if patch.is_empty() {
            return Err(CustomerError::Validation(NOTHING_TO_UPDATE.into()));
        }

        let existing = self.get_customer_by_id(id).await?;

        if patch.email.is_some() {
            let email = normalize_email(patch.email.as_deref())
                .ok_or_else(|| CustomerError::Validation(EMAIL_REQUIRED.into()))?;
            if email != existing.email {
                self.ensure_email_available(&email, "update customer").await?;
            }
            patch.email = Some(email);
        }

        if !patch.has_changes() {
            return Ok(existing);
        }

        let updated = self
            .repo
            .update(id, &patch)
            .await
            .map_err(store_failure("update customer"))?
            .ok_or_else(CustomerError::not_found)?;
        info!(customer_id = updated.customer_id, "customer_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), CustomerError> {
        self.get_customer_by_id(id).await?;
        let removed = self.repo.delete(id).await.map_err(store_failure("delete customer"))?;
        if !removed {
            return Err(CustomerError::not_found());
        }
        info!(customer_id = id, "customer_deleted");
        Ok(())
    }

    /// Whether the backing store is reachable.
    pub async fn store_connected(&self) -> bool {
        self.repo.ping().await
    }

    async fn ensure_email_available(&self, email: &str, action: &'static str) -> Result<(), CustomerError> {
        match self.repo.find_by_email(email).await.map_err(store_failure(action))? {
            Some(_) => Err(CustomerError::email_taken()),
            None => Ok(()),
        }
    }
}

/// Translate a repository failure into a domain error. Store details are
/// logged here and replaced by a generic message.
fn store_failure(action: &'static str) -> impl Fn(RepositoryError) -> CustomerError {
    move |err| match err {
        RepositoryError::Conflict(_) => CustomerError::email_taken(),
        RepositoryError::Store(e) => {
            error!(%action, code = %e.code, error = %e.message, "customer store failure");
            CustomerError::Internal(format!("failed to {action}"))
        }
    }
}
