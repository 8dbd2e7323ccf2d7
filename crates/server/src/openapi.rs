use utoipa::OpenApi;
use utoipa::ToSchema;

/// Stored customer row as returned in `data`.
#[derive(ToSchema)]
pub struct CustomerDoc {
    pub customer_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `YYYY-MM-DD`
    pub dob: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    pub date_joined: String,
    pub status: String,
}

#[derive(ToSchema)]
pub struct NewCustomerDoc {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    pub date_joined: Option<String>,
    pub status: Option<String>,
}

/// Any subset of the columns; `customer_id` is accepted and ignored.
#[derive(ToSchema)]
pub struct CustomerPatchDoc {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_joined: Option<String>,
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct ErrorBodyDoc {
    pub success: bool,
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::root,
        crate::routes::health,
        crate::routes::db_status,
        crate::routes::customers::create_customer,
        crate::routes::customers::list_customers,
        crate::routes::customers::get_customer,
        crate::routes::customers::update_customer,
        crate::routes::customers::delete_customer,
    ),
    components(
        schemas(
            CustomerDoc,
            NewCustomerDoc,
            CustomerPatchDoc,
            ErrorBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "customers")
    )
)]
pub struct ApiDoc;
