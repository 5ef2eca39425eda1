//! Data behind the `create` and `edit` screens: option lists for dependent selects.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Choice, Mapping, MovementType, Role, SizeKind};

/// The record being edited next to the options its form needs.
#[derive(Debug, Serialize, ToSchema)]
pub struct EditForm<T, O> {
    pub record: T,
    pub options: O,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MappingFormOptions {
    pub categories: Vec<Choice>,
    pub subcategories: Vec<Choice>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationFormOptions {
    pub zones: Vec<Choice>,
    pub racks: Vec<Choice>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SizeFormOptions {
    pub kind: SizeKind,
    pub genders: Vec<Choice>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SizeTypeFormOptions {
    pub categories: Vec<Choice>,
    pub clothing_sizes: Vec<Choice>,
    pub shoe_sizes: Vec<Choice>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductFormOptions {
    pub categories: Vec<Choice>,
    pub subcategories: Vec<Choice>,
    pub mappings: Vec<Mapping>,
    pub brands: Vec<Choice>,
    pub genders: Vec<Choice>,
    pub colors: Vec<Choice>,
    pub zones: Vec<Choice>,
    pub racks: Vec<Choice>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovementFormOptions {
    pub products: Vec<Choice>,
    pub movement_types: Vec<MovementType>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserFormOptions {
    pub roles: Vec<Role>,
}

/// Multipart body of the image upload endpoints.
#[derive(Debug, ToSchema)]
pub struct ImageUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Binary `.xlsx` download.
#[derive(Debug, ToSchema)]
#[schema(value_type = String, format = Binary)]
pub struct XlsxFile(pub Vec<u8>);
