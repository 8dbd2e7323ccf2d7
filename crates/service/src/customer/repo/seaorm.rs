use sea_orm::{ActiveValue, ColumnTrait, Condition, DatabaseConnection};

use models::customer::{ActiveModel, Column, Entity};
use models::errors::StoreError;
use models::gateway::StoreGateway;

use crate::customer::domain::{Customer, CustomerId, CustomerPatch, NewCustomer};
use crate::customer::errors::RepositoryError;
use crate::customer::repository::CustomerRepository;

/// Table backing this repository; also the target of the liveness probe.
pub const TABLE_NAME: &str = "customers";

/// Store-backed repository; every call goes through the [`StoreGateway`].
pub struct SeaOrmCustomerRepository {
    gateway: StoreGateway,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { gateway: StoreGateway::new(db) }
    }

    pub fn from_gateway(gateway: StoreGateway) -> Self {
        Self { gateway }
    }
}

fn by_id(id: CustomerId) -> Condition {
    Condition::all().add(Column::CustomerId.eq(id))
}

fn by_email(email: &str) -> Condition {
    Condition::all().add(Column::Email.eq(email))
}

fn set_or_skip<T>(value: Option<T>) -> ActiveValue<T>
where
    T: Into<sea_orm::Value>,
{
    match value {
        Some(v) => ActiveValue::Set(v),
        None => ActiveValue::NotSet,
    }
}

/// "No rows" is absence, anything else is a failure.
fn optional<T>(res: Result<T, StoreError>) -> Result<Option<T>, RepositoryError> {
    match res {
        Ok(row) => Ok(Some(row)),
        Err(e) if e.is_no_rows() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn new_model(input: &NewCustomer) -> ActiveModel {
    ActiveModel {
        customer_id: ActiveValue::NotSet,
        first_name: ActiveValue::Set(input.first_name.clone()),
        last_name: ActiveValue::Set(input.last_name.clone()),
        dob: ActiveValue::Set(input.dob),
        address: ActiveValue::Set(input.address.clone()),
        email: set_or_skip(input.email.clone()),
        phone_number: ActiveValue::Set(input.phone_number.clone()),
        date_joined: set_or_skip(input.date_joined),
        status: set_or_skip(input.status.clone()),
    }
}

fn patch_model(id: CustomerId, patch: &CustomerPatch) -> ActiveModel {
    ActiveModel {
        customer_id: ActiveValue::Unchanged(id),
        first_name: set_or_skip(patch.first_name.clone()),
        last_name: set_or_skip(patch.last_name.clone()),
        dob: set_or_skip(patch.dob),
        address: set_or_skip(patch.address.clone()),
        email: set_or_skip(patch.email.clone()),
        phone_number: set_or_skip(patch.phone_number.clone()),
        date_joined: set_or_skip(patch.date_joined),
        status: set_or_skip(patch.status.clone()),
    }
}

#[async_trait::async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn create(&self, input: &NewCustomer) -> Result<Customer, RepositoryError> {
        Ok(self.gateway.insert_one("customer.create", new_model(input)).await?)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        optional(self.gateway.select_one::<Entity>("customer.find_by_id", by_id(id)).await)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        optional(self.gateway.select_one::<Entity>("customer.find_by_email", by_email(email)).await)
    }

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self
            .gateway
            .select_all_ordered::<Entity>("customer.find_all", Column::CustomerId)
            .await?)
    }

    async fn update(&self, id: CustomerId, patch: &CustomerPatch) -> Result<Option<Customer>, RepositoryError> {
        if !patch.has_changes() {
            return self.find_by_id(id).await;
        }
        optional(self.gateway.update_one("customer.update", patch_model(id, patch)).await)
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        optional(self.gateway.delete_one::<Entity>("customer.delete", by_id(id)).await)
            .map(|done| done.is_some())
    }

    async fn ping(&self) -> bool {
        self.gateway.probe(TABLE_NAME).await
    }
}
