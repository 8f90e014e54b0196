use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::categories::{
    dtos as categories_dtos, handlers as categories_handlers, services as categories_services,
};
use crate::features::works::{
    dtos as works_dtos, handlers as works_handlers, models as works_models, registry,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::login,
        // Works (public)
        works_handlers::list_works,
        works_handlers::list_works_by_category,
        works_handlers::get_work_by_slug,
        works_handlers::get_work,
        works_handlers::get_work_view,
        works_handlers::list_views,
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::list_category_names,
        // Works (admin)
        works_handlers::admin_list_works,
        works_handlers::create_work,
        works_handlers::update_work,
        works_handlers::delete_work,
    ),
    components(
        schemas(
            Meta,
            ApiResponse<auth_dtos::AccessTokenDto>,
            ApiResponse<works_dtos::WorkResponseDto>,
            ApiResponse<Vec<works_dtos::WorkSummaryDto>>,
            ApiResponse<works_dtos::WorkViewDto>,
            ApiResponse<Vec<registry::ViewDefinition>>,
            ApiResponse<categories_dtos::CategoryListDto>,
            ApiResponse<categories_dtos::CategoryNamesDto>,
            // Auth
            auth_dtos::LoginRequestDto,
            auth_dtos::AccessTokenDto,
            // Works
            works_models::WorkStatus,
            works_dtos::WorkSummaryDto,
            works_dtos::WorkResponseDto,
            works_dtos::WorkViewDto,
            works_dtos::CreateWorkDto,
            works_dtos::UpdateWorkDto,
            registry::ViewDefinition,
            registry::ViewTarget,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryListDto,
            categories_dtos::CategoryNamesDto,
            categories_services::CategorySource,
        )
    ),
    tags(
        (name = "auth", description = "Admin login"),
        (name = "works", description = "Public works catalog"),
        (name = "categories", description = "Work categories"),
        (name = "admin-works", description = "Works management (bearer token required)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Works Index API",
        version = "0.1.0",
        description = "Catalog of published analysis works",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
