//! Store gateway: the single place where rows cross the process boundary.
//!
//! Every operation is single-table and single-row (except the ordered full
//! scan). Failures come back as [`StoreError`] with a store-level code; the
//! gateway never interprets them beyond logging.

use std::time::Instant;

use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, HistogramVec};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityName, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Statement,
};
use tracing::{debug, error};

use crate::errors::{StoreError, StoreErrorCode};

pub static STORE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "customer_api_store_duration_seconds",
        "Store round-trip duration in seconds",
        &["op"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("register store_duration")
});

#[derive(Clone, Debug)]
pub struct StoreGateway {
    db: DatabaseConnection,
}

impl StoreGateway {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert one row and return it as stored, defaults included.
    pub async fn insert_one<A>(
        &self,
        op: &'static str,
        row: A,
    ) -> Result<<A::Entity as EntityTrait>::Model, StoreError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let table = A::Entity::default().table_name().to_owned();
        let started = Instant::now();
        let res = row.insert(&self.db).await;
        observe(op, started);
        res.map_err(|e| fail(op, &table, e))
    }

    /// Select the single row matching `filter`; `NoRows` when nothing matches.
    pub async fn select_one<E>(&self, op: &'static str, filter: Condition) -> Result<E::Model, StoreError>
    where
        E: EntityTrait,
    {
        let table = E::default().table_name().to_owned();
        let started = Instant::now();
        let res = E::find().filter(filter).one(&self.db).await;
        observe(op, started);
        match res {
            Ok(Some(row)) => Ok(row),
            Ok(None) => Err(log_failure(op, &table, StoreError::no_rows())),
            Err(e) => Err(fail(op, &table, e)),
        }
    }

    /// Select every row, ascending by `order_by`.
    pub async fn select_all_ordered<E>(&self, op: &'static str, order_by: E::Column) -> Result<Vec<E::Model>, StoreError>
    where
        E: EntityTrait,
    {
        let table = E::default().table_name().to_owned();
        let started = Instant::now();
        let res = E::find().order_by_asc(order_by).all(&self.db).await;
        observe(op, started);
        res.map_err(|e| fail(op, &table, e))
    }

    /// Write the set columns of `row` to the row its primary key identifies
    /// and return the updated row; `NoRows` when the key matches nothing.
    pub async fn update_one<A>(
        &self,
        op: &'static str,
        row: A,
    ) -> Result<<A::Entity as EntityTrait>::Model, StoreError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let table = A::Entity::default().table_name().to_owned();
        let started = Instant::now();
        let res = row.update(&self.db).await;
        observe(op, started);
        res.map_err(|e| fail(op, &table, e))
    }

    /// Delete the row matching `filter`; `NoRows` when nothing was removed.
    pub async fn delete_one<E>(&self, op: &'static str, filter: Condition) -> Result<(), StoreError>
    where
        E: EntityTrait,
    {
        let table = E::default().table_name().to_owned();
        let started = Instant::now();
        let res = E::delete_many().filter(filter).exec(&self.db).await;
        observe(op, started);
        match res {
            Ok(done) if done.rows_affected == 0 => Err(log_failure(op, &table, StoreError::no_rows())),
            Ok(_) => Ok(()),
            Err(e) => Err(fail(op, &table, e)),
        }
    }

    /// Liveness probe against `table`.
    ///
    /// Any answer from the store counts as connected, including "no rows" and
    /// "relation does not exist"; only transport or other store failures
    /// report disconnected.
    pub async fn probe(&self, table: &str) -> bool {
        if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            error!(op = "probe", %table, "refusing to probe invalid table name");
            return false;
        }
        let stmt = Statement::from_string(
            self.db.get_database_backend(),
            format!("SELECT * FROM \"{table}\" LIMIT 1"),
        );
        let started = Instant::now();
        let res = self.db.query_one(stmt).await;
        observe("probe", started);
        match res {
            Ok(_) => true,
            Err(e) => {
                let err = StoreError::from(e);
                match err.code {
                    StoreErrorCode::NoRows | StoreErrorCode::UndefinedTable => {
                        debug!(op = "probe", %table, code = %err.code, "store reachable");
                        true
                    }
                    _ => {
                        error!(op = "probe", %table, code = %err.code, error = %err.message, "store unreachable");
                        false
                    }
                }
            }
        }
    }
}

fn observe(op: &'static str, started: Instant) {
    STORE_DURATION.with_label_values(&[op]).observe(started.elapsed().as_secs_f64());
}

fn fail(op: &'static str, table: &str, err: DbErr) -> StoreError {
    log_failure(op, table, StoreError::from(err))
}

fn log_failure(op: &'static str, table: &str, err: StoreError) -> StoreError {
    if err.is_no_rows() {
        debug!(%op, %table, code = %err.code, "store call matched no rows");
    } else {
        error!(%op, %table, code = %err.code, error = %err.message, "store call failed");
    }
    err
}
