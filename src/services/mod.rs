pub mod auth_service;
pub mod brand_service;
pub mod category_service;
pub mod color_service;
pub mod common;
pub mod gender_service;
pub mod location_service;
pub mod mapping_service;
pub mod product_service;
pub mod rack_service;
pub mod size_service;
pub mod size_type_service;
pub mod stock_service;
pub mod subcategory_service;
pub mod user_service;
pub mod zone_service;
