use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;
use wms_admin_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        catalog::{
            CreateColorRequest, CreateMappingRequest, CreateNamedRequest, UpdateMappingRequest,
        },
        products::{CreateProductRequest, VariantInput},
        stock::CreateMovementRequest,
        warehouse::{CreateLocationRequest, UpdateLocationRequest},
    },
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::auth::AuthUser,
    models::{Category, MovementType, RecordStatus, Role, Subcategory},
    routes::params::MovementQuery,
    services::{
        brand_service, category_service, color_service, location_service, mapping_service,
        product_service, rack_service, stock_service, subcategory_service, zone_service,
    },
    state::AppState,
};

fn database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

fn named(name: &str) -> CreateNamedRequest {
    CreateNamedRequest {
        name: name.to_string(),
        description: None,
    }
}

fn field_error(result: Result<impl std::fmt::Debug, AppError>, field: &str) -> String {
    match result {
        Err(AppError::Validation(fields)) => fields
            .get(field)
            .and_then(|messages| messages.first().cloned())
            .unwrap_or_else(|| panic!("no error on {field}: {fields:?}")),
        other => panic!("expected validation error on {field}, got {other:?}"),
    }
}

// Integration flow: master data -> warehouse layout -> product -> stock ledger.
// Runs against a real Postgres; skipped when no database is configured.
#[tokio::test]
async fn master_data_layout_and_stock_flow() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        eprintln!(
            "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
        );
        return Ok(());
    };
    let state = setup_state(&url).await?;
    let admin = create_user(&state, Role::SuperAdmin, "root@example.com").await?;
    let staff = create_user(&state, Role::Staff, "staff@example.com").await?;

    // Names are unique regardless of case and surrounding spaces.
    let brand = brand_service::create_brand(&state, &admin, named("Acme"))
        .await?
        .data
        .expect("brand");
    let duplicate = brand_service::create_brand(&state, &admin, named("  acme ")).await;
    assert_eq!(field_error(duplicate, "name"), "The name has already been taken.");

    // Status toggles persist.
    brand_service::set_brand_status(&state, &admin, brand.id, RecordStatus::Unavailable).await?;
    let reloaded = brand_service::get_brand(&state, brand.id).await?.data.expect("brand");
    assert_eq!(reloaded.status, RecordStatus::Unavailable);

    // A zone holds at most ten racks.
    let zone = zone_service::create_zone(&state, &admin, named("Zone A"))
        .await?
        .data
        .expect("zone");
    let mut racks = Vec::new();
    let mut locations = Vec::new();
    for i in 1..=11 {
        let rack = rack_service::create_rack(&state, &admin, named(&format!("Rack {i:02}")))
            .await?
            .data
            .expect("rack");
        racks.push(rack.id);
    }
    for rack_id in &racks[..10] {
        let location = location_service::create_location(
            &state,
            &admin,
            CreateLocationRequest {
                zone_id: zone.id,
                rack_id: *rack_id,
                description: None,
            },
        )
        .await?
        .data
        .expect("location");
        locations.push(location.id);
    }
    let eleventh = location_service::create_location(
        &state,
        &admin,
        CreateLocationRequest {
            zone_id: zone.id,
            rack_id: racks[10],
            description: None,
        },
    )
    .await;
    assert!(field_error(eleventh, "zone_id").contains("maximum of 10"));

    // A category with a mapping cannot be deleted.
    let category = category_service::create_category(&state, &admin, named("Apparel"))
        .await?
        .data
        .expect("category");
    let subcategory = subcategory_service::create_subcategory(&state, &admin, named("Jacket"))
        .await?
        .data
        .expect("subcategory");
    let mapping = mapping_service::create_mapping(
        &state,
        &admin,
        CreateMappingRequest {
            category_id: category.id,
            subcategory_id: subcategory.id,
        },
    )
    .await?
    .data
    .expect("mapping");
    let blocked = category_service::delete_category(&state, &admin, category.id).await;
    assert!(matches!(blocked, Err(AppError::Validation(_))));

    // Product placed on a valid mapping and location.
    let product = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            name: "Rain Jacket".into(),
            sku: "RJ-001".into(),
            description: None,
            category_id: category.id,
            subcategory_id: subcategory.id,
            brand_id: None,
            gender_id: None,
            zone_id: zone.id,
            rack_id: racks[0],
            variants: vec![
                VariantInput {
                    color_id: None,
                    size: "M".into(),
                    quantity: 0,
                },
                VariantInput {
                    color_id: None,
                    size: "L".into(),
                    quantity: 0,
                },
            ],
        },
    )
    .await?
    .data
    .expect("product");
    assert_eq!(product.variants.len(), 2);
    let variant_id = product
        .variants
        .iter()
        .find(|v| v.size == "M")
        .map(|v| v.id)
        .expect("variant M");

    // Staff move stock; every row records before and after.
    let moved_in = move_stock(&state, &staff, variant_id, MovementType::In, 5).await?;
    assert_eq!((moved_in.0, moved_in.1), (0, 5));
    let moved_out = move_stock(&state, &staff, variant_id, MovementType::Out, 3).await?;
    assert_eq!((moved_out.0, moved_out.1), (5, 2));
    let too_many = move_stock(&state, &staff, variant_id, MovementType::Out, 10).await;
    assert_eq!(field_error(too_many, "quantity"), "Only 2 units are in stock.");
    let adjusted = move_stock(&state, &staff, variant_id, MovementType::Adjustment, 7).await?;
    assert_eq!((adjusted.0, adjusted.1), (2, 7));

    let reloaded = product_service::get_product(&state, product.id)
        .await?
        .data
        .expect("product");
    assert_eq!(reloaded.total_quantity, 7);

    // Products with ledger history stay.
    let delete = product_service::delete_product(&state, &admin, product.id).await;
    assert!(matches!(delete, Err(AppError::Validation(_))));

    // Pairs in use by a product keep their keys; unused ones may move.
    let parka = subcategory_service::create_subcategory(&state, &admin, named("Parka"))
        .await?
        .data
        .expect("subcategory");
    let remap = mapping_service::update_mapping(
        &state,
        &admin,
        mapping.id,
        UpdateMappingRequest {
            category_id: None,
            subcategory_id: Some(parka.id),
        },
    )
    .await;
    assert!(field_error(remap, "record").starts_with("Cannot change this mapping"));

    let relocate = location_service::update_location(
        &state,
        &admin,
        locations[0],
        UpdateLocationRequest {
            rack_id: Some(racks[10]),
            ..Default::default()
        },
    )
    .await;
    assert!(field_error(relocate, "record").starts_with("Cannot change this location"));
    let moved = location_service::update_location(
        &state,
        &admin,
        locations[9],
        UpdateLocationRequest {
            rack_id: Some(racks[10]),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("location");
    assert_eq!(moved.rack_id, racks[10]);

    // Colors are unique by hex code and rgb, however they are written.
    let red = color_service::create_color(&state, &admin, color("Red", Some("#ff0000"), None))
        .await?
        .data
        .expect("color");
    assert_eq!((red.hex_code.as_str(), red.rgb.as_str()), ("#FF0000", "255,0,0"));
    let same_hex =
        color_service::create_color(&state, &admin, color("Crimson", Some("#F00"), None)).await;
    assert_eq!(field_error(same_hex, "hex_code"), "The hex code has already been taken.");
    let same_rgb =
        color_service::create_color(&state, &admin, color("Scarlet", None, Some("255, 0, 0")))
            .await;
    assert!(matches!(same_rgb, Err(AppError::Validation(_))));
    let blue = color_service::create_color(&state, &admin, color("Blue", None, Some("0,0,255")))
        .await?
        .data
        .expect("color");
    assert_eq!(blue.hex_code, "#0000FF");

    // New references must be Available; the brand was switched off above.
    let with_brand = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            brand_id: Some(brand.id),
            ..jacket("RJ-002", &category, &subcategory, zone.id, racks[1])
        },
    )
    .await;
    assert_eq!(
        field_error(with_brand, "brand_id"),
        "The selected brand id is unavailable."
    );

    color_service::set_color_status(&state, &admin, blue.id, RecordStatus::Unavailable).await?;
    let with_blue = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            variants: vec![VariantInput {
                color_id: Some(blue.id),
                size: "S".into(),
                quantity: 0,
            }],
            ..jacket("RJ-003", &category, &subcategory, zone.id, racks[1])
        },
    )
    .await;
    assert!(field_error(with_blue, "variants").contains("unavailable"));

    let closed = category_service::create_category(&state, &admin, named("Footwear"))
        .await?
        .data
        .expect("category");
    category_service::set_category_status(&state, &admin, closed.id, RecordStatus::Unavailable)
        .await?;
    let closed_mapping = mapping_service::create_mapping(
        &state,
        &admin,
        CreateMappingRequest {
            category_id: closed.id,
            subcategory_id: parka.id,
        },
    )
    .await;
    assert_eq!(
        field_error(closed_mapping, "category_id"),
        "The selected category id is unavailable."
    );

    // Export resolves variant colors.
    let red_jacket = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            variants: vec![VariantInput {
                color_id: Some(red.id),
                size: "M".into(),
                quantity: 0,
            }],
            ..jacket("RJ-004", &category, &subcategory, zone.id, racks[1])
        },
    )
    .await?
    .data
    .expect("product");
    move_stock(&state, &staff, red_jacket.variants[0].id, MovementType::In, 4).await?;
    let (file_name, bytes) = stock_service::export_movements(
        &state,
        MovementQuery {
            product_id: Some(red_jacket.id),
            ..Default::default()
        },
    )
    .await?;
    assert!(file_name.ends_with(".xlsx"));
    assert!(bytes.starts_with(b"PK"));

    Ok(())
}

fn color(name: &str, hex_code: Option<&str>, rgb: Option<&str>) -> CreateColorRequest {
    CreateColorRequest {
        name: name.to_string(),
        hex_code: hex_code.map(str::to_string),
        rgb: rgb.map(str::to_string),
    }
}

fn jacket(
    sku: &str,
    category: &Category,
    subcategory: &Subcategory,
    zone_id: Uuid,
    rack_id: Uuid,
) -> CreateProductRequest {
    CreateProductRequest {
        name: format!("Jacket {sku}"),
        sku: sku.into(),
        description: None,
        category_id: category.id,
        subcategory_id: subcategory.id,
        brand_id: None,
        gender_id: None,
        zone_id,
        rack_id,
        variants: vec![VariantInput {
            color_id: None,
            size: "M".into(),
            quantity: 0,
        }],
    }
}

async fn move_stock(
    state: &AppState,
    user: &AuthUser,
    variant_id: Uuid,
    movement_type: MovementType,
    quantity: i32,
) -> Result<(i32, i32), AppError> {
    let movement = stock_service::create_movement(
        state,
        user,
        CreateMovementRequest {
            variant_id,
            movement_type,
            quantity,
            reference: None,
            notes: None,
        },
    )
    .await?
    .data
    .expect("movement");
    Ok((movement.quantity_before, movement.quantity_after))
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE stock_movements, product_variants, products, size_types, size_libraries, \
         locations, racks, zones, mappings, subcategories, categories, brands, colors, genders, \
         password_reset_tokens, audit_logs, users CASCADE",
    ))
    .await?;

    let pool = create_pool(database_url).await?;
    Ok(AppState::new(pool, orm, AppConfig::for_tests(database_url)))
}

async fn create_user(state: &AppState, role: Role, email: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("{role} user")),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role),
        status: Set(RecordStatus::Available),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}
