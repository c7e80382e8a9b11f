use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use models::phone_address::{PhoneAddress, PhoneAddressCreate, PhoneAddressUpdate};
use tracing::info;

use crate::errors::ApiError;
use crate::observability::{self, Outcome};
use crate::state::AppState;

/// Count a store failure and hand it on unchanged.
fn failed(op: &'static str) -> impl FnOnce(service::errors::StoreError) -> ApiError {
    move |e| {
        observability::record(op, Outcome::Error);
        ApiError::Store(e)
    }
}

#[utoipa::path(
    get, path = "/api/v1/phone-addresses/{phone}", tag = "phone-addresses",
    params(("phone" = String, Path, description = "Phone number to look up.")),
    responses(
        (status = 200, description = "Address for the phone", body = crate::openapi::PhoneAddressDoc),
        (status = 404, description = "Phone number was not found in the storage.", body = crate::openapi::ErrorResponseDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorResponseDoc)
    )
)]
pub async fn get_phone_address(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<PhoneAddress>, ApiError> {
    let Path(phone) = path?;
    match state.phone_addresses.lookup(&phone).await.map_err(failed("lookup"))? {
        Some(binding) => {
            observability::record("lookup", Outcome::Ok);
            Ok(Json(binding))
        }
        None => {
            observability::record("lookup", Outcome::NotFound);
            Err(ApiError::NotFound)
        }
    }
}

#[utoipa::path(
    post, path = "/api/v1/phone-addresses", tag = "phone-addresses",
    request_body = crate::openapi::PhoneAddressCreateDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::PhoneAddressDoc),
        (status = 409, description = "Phone number already exists and cannot be created again.", body = crate::openapi::ErrorResponseDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorResponseDoc)
    )
)]
pub async fn create_phone_address(
    State(state): State<AppState>,
    payload: Result<Json<PhoneAddressCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<PhoneAddress>), ApiError> {
    let Json(input) = payload?;
    input.validate()?;

    let created = state
        .phone_addresses
        .create(&input.phone, &input.address)
        .await
        .map_err(failed("create"))?;
    if !created {
        observability::record("create", Outcome::Conflict);
        return Err(ApiError::Conflict);
    }
    observability::record("create", Outcome::Ok);
    info!(phone = %input.phone, "created phone address");
    Ok((StatusCode::CREATED, Json(input.into())))
}

#[utoipa::path(
    put, path = "/api/v1/phone-addresses/{phone}", tag = "phone-addresses",
    params(("phone" = String, Path, description = "Phone number whose address should be updated.")),
    request_body = crate::openapi::PhoneAddressUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::PhoneAddressDoc),
        (status = 404, description = "Phone number not found; nothing to update.", body = crate::openapi::ErrorResponseDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorResponseDoc)
    )
)]
pub async fn update_phone_address(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<PhoneAddressUpdate>, JsonRejection>,
) -> Result<Json<PhoneAddress>, ApiError> {
    let Path(phone) = path?;
    let Json(input) = payload?;
    input.validate()?;

    let updated = state
        .phone_addresses
        .update(&phone, &input.address)
        .await
        .map_err(failed("update"))?;
    if !updated {
        observability::record("update", Outcome::NotFound);
        return Err(ApiError::NotFound);
    }
    observability::record("update", Outcome::Ok);
    info!(phone = %phone, "updated phone address");
    Ok(Json(PhoneAddress::new(phone, input.address)))
}

#[utoipa::path(
    delete, path = "/api/v1/phone-addresses/{phone}", tag = "phone-addresses",
    params(("phone" = String, Path, description = "Phone number whose record should be deleted.")),
    responses(
        (status = 204, description = "Record was successfully deleted."),
        (status = 404, description = "Phone number not found; nothing to delete.", body = crate::openapi::ErrorResponseDoc),
        (status = 422, description = "Validation Error", body = crate::openapi::ErrorResponseDoc)
    )
)]
pub async fn delete_phone_address(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(phone) = path?;
    let deleted = state.phone_addresses.delete(&phone).await.map_err(failed("delete"))?;
    if !deleted {
        observability::record("delete", Outcome::NotFound);
        return Err(ApiError::NotFound);
    }
    observability::record("delete", Outcome::Ok);
    info!(phone = %phone, "deleted phone address");
    Ok(StatusCode::NO_CONTENT)
}
