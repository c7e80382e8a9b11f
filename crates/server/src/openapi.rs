use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: String,
    /// `ok` or `unavailable`
    pub redis: String,
}

#[derive(ToSchema)]
pub struct PhoneAddressDoc {
    #[schema(example = "+7 999 123-45-67")]
    pub phone: String,
    #[schema(example = "Moscow, Tverskaya street, 1")]
    pub address: String,
}

/// Phone is used verbatim as the storage key; its format is not checked.
#[derive(ToSchema)]
pub struct PhoneAddressCreateDoc {
    #[schema(example = "+7 999 123-45-67", min_length = 3, max_length = 64)]
    pub phone: String,
    #[schema(example = "Moscow, Tverskaya street, 1", min_length = 1, max_length = 1024)]
    pub address: String,
}

#[derive(ToSchema)]
pub struct PhoneAddressUpdateDoc {
    #[schema(example = "New Address", min_length = 1, max_length = 1024)]
    pub address: String,
}

#[derive(ToSchema)]
pub struct ErrorResponseDoc {
    pub detail: String,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Phone Address Service",
        version = "1.0.0",
        description = "Storage for phone to address bindings on top of a key-value store."
    ),
    paths(
        crate::routes::health,
        crate::routes::phone_addresses::get_phone_address,
        crate::routes::phone_addresses::create_phone_address,
        crate::routes::phone_addresses::update_phone_address,
        crate::routes::phone_addresses::delete_phone_address,
    ),
    components(
        schemas(
            HealthResponse,
            PhoneAddressDoc,
            PhoneAddressCreateDoc,
            PhoneAddressUpdateDoc,
            ErrorResponseDoc,
        )
    ),
    tags(
        (name = "service"),
        (name = "phone-addresses")
    )
)]
pub struct ApiDoc;

/// The generated document, titled with the configured project name.
pub fn document(project_name: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = project_name.to_string();
    doc
}
