use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use common::metrics::record_request;
use service::customer::{domain::normalize_email, errors::EMAIL_REQUIRED, errors::NOTHING_TO_UPDATE};
use service::customer::{Customer, CustomerId, CustomerPatch, NewCustomer};

use crate::envelope::ApiResponse;
use crate::errors::ApiError;
use crate::routes::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// Routes mounted under `/api/customers`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_customer).get(list_customers))
        .route("/:id", get(get_customer).put(update_customer).delete(delete_customer))
}

fn parse_id(op: &'static str, raw: &str) -> ApiResult<CustomerId> {
    raw.trim()
        .parse::<CustomerId>()
        .map_err(|_| ApiError::bad_request(op, "Invalid customer ID"))
}

fn parse_body<T>(op: &'static str, body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(v)| v).map_err(|rejection| ApiError::from_rejection(op, rejection))
}

#[utoipa::path(
    post, path = "/api/customers", tag = "customers",
    request_body = crate::openapi::NewCustomerDoc,
    responses(
        (status = 201, description = "Customer created"),
        (status = 400, description = "Missing email or malformed body"),
        (status = 409, description = "Email already exists"),
        (status = 500, description = "Store failure"),
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    body: Result<Json<NewCustomer>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Customer>>)> {
    const OP: &str = "create_customer";
    let input = parse_body(OP, body)?;
    if normalize_email(input.email.as_deref()).is_none() {
        return Err(ApiError::bad_request(OP, EMAIL_REQUIRED));
    }

    let customer = state.customers.create_customer(input).await.map_err(|e| ApiError::new(OP, e))?;
    info!(customer_id = customer.customer_id, "created customer");
    record_request(OP, "success");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(customer).with_message("Customer created successfully")),
    ))
}

#[utoipa::path(
    get, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer found"),
        (status = 400, description = "Invalid customer ID"),
        (status = 404, description = "Customer not found"),
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<ApiResponse<Customer>>> {
    const OP: &str = "get_customer";
    let id = parse_id(OP, &raw_id)?;
    let customer = state.customers.get_customer_by_id(id).await.map_err(|e| ApiError::new(OP, e))?;
    record_request(OP, "success");
    Ok(Json(ApiResponse::data(customer)))
}

#[utoipa::path(
    get, path = "/api/customers", tag = "customers",
    responses(
        (status = 200, description = "All customers ordered by id"),
        (status = 500, description = "Store failure"),
    )
)]
pub async fn list_customers(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<Customer>>>> {
    const OP: &str = "list_customers";
    let customers = state.customers.get_all_customers().await.map_err(|e| ApiError::new(OP, e))?;
    info!(count = customers.len(), "list customers");
    record_request(OP, "success");
    Ok(Json(ApiResponse::list(customers)))
}

#[utoipa::path(
    put, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = crate::openapi::CustomerPatchDoc,
    responses(
        (status = 200, description = "Customer updated"),
        (status = 400, description = "Invalid customer ID or empty body"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Email already exists"),
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<CustomerPatch>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Customer>>> {
    const OP: &str = "update_customer";
    let id = parse_id(OP, &raw_id)?;
    let patch = parse_body(OP, body)?;
    if patch.is_empty() {
        return Err(ApiError::bad_request(OP, NOTHING_TO_UPDATE));
    }

    let customer = state.customers.update_customer(id, patch).await.map_err(|e| ApiError::new(OP, e))?;
    info!(customer_id = customer.customer_id, "updated customer");
    record_request(OP, "success");
    Ok(Json(ApiResponse::data(customer).with_message("Customer updated successfully")))
}

#[utoipa::path(
    delete, path = "/api/customers/{id}", tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer deleted"),
        (status = 400, description = "Invalid customer ID"),
        (status = 404, description = "Customer not found"),
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    const OP: &str = "delete_customer";
    let id = parse_id(OP, &raw_id)?;
    state.customers.delete_customer(id).await.map_err(|e| ApiError::new(OP, e))?;
    info!(customer_id = id, "deleted customer");
    record_request(OP, "success");
    Ok(Json(ApiResponse::message("Customer deleted successfully")))
}
