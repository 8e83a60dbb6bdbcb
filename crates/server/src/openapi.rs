use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Car document as returned by every car route.
#[derive(ToSchema)]
pub struct CarDoc {
    pub id: String,
    pub color: Option<String>,
    pub brand: Option<String>,
    /// Store revision, bumped when an update changes a field.
    pub revision: i32,
}

/// Create/update body. On update, omitted fields stay as they are and `null` clears.
#[derive(ToSchema)]
pub struct CarInputDoc {
    pub color: Option<String>,
    pub brand: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::cars::create,
        crate::routes::cars::list,
        crate::routes::cars::get,
        crate::routes::cars::update,
        crate::routes::cars::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CarDoc,
            CarInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "cars")
    )
)]
pub struct ApiDoc;
