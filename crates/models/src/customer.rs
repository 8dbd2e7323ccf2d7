use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A row of the `customers` table.
///
/// `customer_id`, `date_joined` and `status` are assigned by the store when
/// the row is inserted without them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub customer_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: Option<String>,
    #[sea_orm(default_expr = "sea_orm::sea_query::Expr::current_date()")]
    pub date_joined: NaiveDate,
    #[sea_orm(default_value = "active")]
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
