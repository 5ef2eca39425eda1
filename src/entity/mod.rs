pub mod audit_logs;
pub mod brands;
pub mod categories;
pub mod colors;
pub mod genders;
pub mod locations;
pub mod mappings;
pub mod password_reset_tokens;
pub mod product_variants;
pub mod products;
pub mod racks;
pub mod size_libraries;
pub mod size_types;
pub mod stock_movements;
pub mod subcategories;
pub mod users;
pub mod zones;

pub use audit_logs::Entity as AuditLogs;
pub use brands::Entity as Brands;
pub use categories::Entity as Categories;
pub use colors::Entity as Colors;
pub use genders::Entity as Genders;
pub use locations::Entity as Locations;
pub use mappings::Entity as Mappings;
pub use password_reset_tokens::Entity as PasswordResetTokens;
pub use product_variants::Entity as ProductVariants;
pub use products::Entity as Products;
pub use racks::Entity as Racks;
pub use size_libraries::Entity as SizeLibraries;
pub use size_types::Entity as SizeTypes;
pub use stock_movements::Entity as StockMovements;
pub use subcategories::Entity as Subcategories;
pub use users::Entity as Users;
pub use zones::Entity as Zones;
