use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth, catalog, forms, products as product_dto, sizes as size_dto, stock,
        users as user_dto, warehouse,
    },
    models::{
        Brand, Category, Choice, Color, Gender, Location, Mapping, MovementType, Product,
        ProductVariant, Rack, RecordStatus, Role, SizeKind, SizeLibrary, SizeType, StockMovement,
        Subcategory, User, Zone,
    },
    response::{ApiResponse, Meta},
    routes::{
        auth as auth_routes, brands, categories, colors, genders, health, locations, mappings,
        params, products, racks, size_types, sizes, stock_movements, subcategories, users, zones,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
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

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth_routes::login,
        auth_routes::me,
        auth_routes::update_password,
        auth_routes::forgot,
        auth_routes::reset,
        brands::list_brands,
        brands::create_brand,
        brands::get_brand,
        brands::update_brand,
        brands::delete_brand,
        brands::mark_brand_available,
        brands::mark_brand_unavailable,
        brands::upload_brand_image,
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        categories::mark_category_available,
        categories::mark_category_unavailable,
        categories::upload_category_image,
        subcategories::list_subcategories,
        subcategories::create_subcategory,
        subcategories::get_subcategory,
        subcategories::update_subcategory,
        subcategories::delete_subcategory,
        subcategories::mark_subcategory_available,
        subcategories::mark_subcategory_unavailable,
        mappings::list_mappings,
        mappings::mapping_form,
        mappings::create_mapping,
        mappings::get_mapping,
        mappings::edit_mapping,
        mappings::update_mapping,
        mappings::delete_mapping,
        mappings::mark_mapping_available,
        mappings::mark_mapping_unavailable,
        colors::list_colors,
        colors::create_color,
        colors::get_color,
        colors::update_color,
        colors::delete_color,
        colors::mark_color_available,
        colors::mark_color_unavailable,
        genders::list_genders,
        genders::create_gender,
        genders::get_gender,
        genders::update_gender,
        genders::delete_gender,
        genders::mark_gender_available,
        genders::mark_gender_unavailable,
        zones::list_zones,
        zones::create_zone,
        zones::get_zone,
        zones::update_zone,
        zones::delete_zone,
        zones::mark_zone_available,
        zones::mark_zone_unavailable,
        racks::list_racks,
        racks::create_rack,
        racks::get_rack,
        racks::update_rack,
        racks::delete_rack,
        racks::mark_rack_available,
        racks::mark_rack_unavailable,
        locations::list_locations,
        locations::location_form,
        locations::create_location,
        locations::get_location,
        locations::edit_location,
        locations::update_location,
        locations::delete_location,
        locations::mark_location_available,
        locations::mark_location_unavailable,
        sizes::list_sizes,
        sizes::size_form,
        sizes::create_size,
        sizes::get_size,
        sizes::edit_size,
        sizes::update_size,
        sizes::delete_size,
        sizes::mark_size_available,
        sizes::mark_size_unavailable,
        size_types::list_size_types,
        size_types::size_type_form,
        size_types::create_size_type,
        size_types::get_size_type,
        size_types::edit_size_type,
        size_types::update_size_type,
        size_types::delete_size_type,
        size_types::mark_size_type_available,
        size_types::mark_size_type_unavailable,
        products::list_products,
        products::product_form,
        products::create_product,
        products::get_product,
        products::edit_product,
        products::update_product,
        products::delete_product,
        products::mark_product_available,
        products::mark_product_unavailable,
        products::upload_product_image,
        products::export_products,
        users::list_users,
        users::user_form,
        users::create_user,
        users::get_user,
        users::edit_user,
        users::update_user,
        users::delete_user,
        users::mark_user_available,
        users::mark_user_unavailable,
        stock_movements::list_movements,
        stock_movements::movement_form,
        stock_movements::create_movement,
        stock_movements::export_movements,
        stock_movements::get_movement
    ),
    components(
        schemas(
            RecordStatus,
            Role,
            MovementType,
            SizeKind,
            Choice,
            Brand,
            Category,
            Subcategory,
            Mapping,
            Color,
            Gender,
            Zone,
            Rack,
            Location,
            SizeLibrary,
            SizeType,
            Product,
            ProductVariant,
            StockMovement,
            User,
            Meta,
            params::Pagination,
            params::SortOrder,
            params::ListQuery,
            params::ProductQuery,
            params::MovementQuery,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::ChangePasswordRequest,
            auth::ForgotPasswordRequest,
            auth::ResetPasswordRequest,
            catalog::CreateNamedRequest,
            catalog::UpdateNamedRequest,
            catalog::GenderRequest,
            catalog::CreateColorRequest,
            catalog::UpdateColorRequest,
            catalog::CreateMappingRequest,
            catalog::UpdateMappingRequest,
            warehouse::CreateLocationRequest,
            warehouse::UpdateLocationRequest,
            size_dto::CreateSizeRequest,
            size_dto::UpdateSizeRequest,
            size_dto::CreateSizeTypeRequest,
            size_dto::UpdateSizeTypeRequest,
            product_dto::VariantInput,
            product_dto::CreateProductRequest,
            product_dto::UpdateProductRequest,
            stock::CreateMovementRequest,
            user_dto::CreateUserRequest,
            user_dto::UpdateUserRequest,
            forms::MappingFormOptions,
            forms::LocationFormOptions,
            forms::SizeFormOptions,
            forms::SizeTypeFormOptions,
            forms::ProductFormOptions,
            forms::MovementFormOptions,
            forms::UserFormOptions,
            forms::ImageUploadForm,
            forms::XlsxFile,
            ApiResponse<User>,
            ApiResponse<Product>,
            ApiResponse<StockMovement>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Login, current account and password flows"),
        (name = "Brands", description = "Brand master data"),
        (name = "Categories", description = "Category master data"),
        (name = "Subcategories", description = "Subcategory master data"),
        (name = "Mappings", description = "Allowed category/subcategory pairs"),
        (name = "Colors", description = "Color master data"),
        (name = "Genders", description = "Gender master data"),
        (name = "Zones", description = "Warehouse zones"),
        (name = "Racks", description = "Warehouse racks"),
        (name = "Locations", description = "Rack placements inside zones"),
        (name = "Sizes", description = "Clothing and shoe size libraries"),
        (name = "Size Types", description = "Sizes offered per category"),
        (name = "Products", description = "Products, variants, images and export"),
        (name = "Stock Movements", description = "Stock ledger and export"),
        (name = "Users", description = "Account management"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
