//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{CartService, MenuService, OrderService, PaymentService, TableService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{auth, carts, health, menus, orders, payments, tables};

/// Security scheme modifier for OpenAPI
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
                        .description(Some("JWT Bearer token for staff routes"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::change_password,
        // Tables
        tables::scan_table,
        tables::list_tables,
        tables::get_table_stats,
        tables::get_table,
        tables::create_table,
        tables::update_table,
        tables::update_table_status,
        tables::regenerate_qr,
        tables::delete_table,
        // Menus
        menus::list_menus,
        menus::get_menu,
        menus::list_all_menus,
        menus::create_menu,
        menus::update_menu,
        menus::update_menu_availability,
        menus::delete_menu,
        menus::list_menu_options,
        menus::create_menu_option,
        menus::update_menu_option,
        menus::delete_menu_option,
        // Carts
        carts::get_cart,
        carts::add_cart_item,
        carts::update_cart_item,
        carts::remove_cart_item,
        carts::clear_cart,
        carts::sweep_carts,
        // Orders
        orders::create_order,
        orders::get_order,
        orders::list_active_orders,
        orders::cancel_order,
        orders::list_orders,
        orders::update_order_status,
        orders::get_status_counts,
        orders::get_today_stats,
        // Payments
        payments::pay_by_card,
        payments::pay_by_cash,
        payments::get_payment,
        payments::get_payment_by_order,
        payments::refund_payment,
        payments::get_today_stats,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<tables::TableResponse>,
            PaginatedResponse<menus::MenuResponse>,
            PaginatedResponse<orders::OrderResponse>,
            PaginationParams,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::ChangePasswordRequest,
            auth::UserInfo,
            // Tables
            tables::TableResponse,
            tables::CreateTableRequest,
            tables::UpdateTableRequest,
            tables::UpdateTableStatusRequest,
            tables::TableStatsResponse,
            // Menus
            menus::MenuResponse,
            menus::MenuDetailResponse,
            menus::MenuOptionResponse,
            menus::CreateMenuRequest,
            menus::UpdateMenuRequest,
            menus::UpdateMenuAvailabilityRequest,
            menus::CreateMenuOptionRequest,
            menus::UpdateMenuOptionRequest,
            // Carts
            carts::CartResponse,
            carts::CartItemResponse,
            carts::AddCartItemRequest,
            carts::UpdateCartItemRequest,
            carts::SweepResponse,
            // Orders
            orders::OrderResponse,
            orders::OrderItemResponse,
            orders::CreateOrderRequest,
            orders::CancelOrderRequest,
            orders::UpdateOrderStatusRequest,
            orders::OrderStatusCountsResponse,
            orders::DayOrderStatsResponse,
            // Payments
            payments::PaymentResponse,
            payments::PaymentRequest,
            payments::RefundRequest,
            payments::DayPaymentStatsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Staff login (JWT), account management"),
        (name = "Tables", description = "QR scan and table management"),
        (name = "Menus", description = "Menu catalog and options"),
        (name = "Carts", description = "Per-table cart mutation"),
        (name = "Orders", description = "Order placement and kitchen status chain"),
        (name = "Payments", description = "Settlement attempts and refunds"),
    ),
    info(
        title = "Brewtab API",
        version = "0.1.0",
        description = "REST API for the café table-ordering backend",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
#[allow(clippy::too_many_arguments)]
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    tables: Arc<TableService>,
    menus: Arc<MenuService>,
    carts: Arc<CartService>,
    orders: Arc<OrderService>,
    payments: Arc<PaymentService>,
) -> Router {
    let auth_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── Auth ───────────────────────────────────────────────────
    let auth_handler_state = auth::AuthHandlerState { repos, jwt_config };
    let auth_public_routes = Router::new()
        .route("/login", post(auth::login))
        .with_state(auth_handler_state.clone());
    let auth_protected_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/me", get(auth::get_current_user))
        .route("/change-password", put(auth::change_password))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_handler_state);

    // ── Tables ─────────────────────────────────────────────────
    let table_state = tables::TableHandlerState { tables };
    let table_public_routes = Router::new()
        .route("/scan/{qr_code}", get(tables::scan_table))
        .with_state(table_state.clone());
    let table_admin_routes = Router::new()
        .route("/", get(tables::list_tables).post(tables::create_table))
        .route("/stats", get(tables::get_table_stats))
        .route(
            "/{id}",
            get(tables::get_table)
                .put(tables::update_table)
                .delete(tables::delete_table),
        )
        .route("/{id}/status", patch(tables::update_table_status))
        .route("/{id}/regenerate-qr", post(tables::regenerate_qr))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(table_state);

    // ── Menus ──────────────────────────────────────────────────
    let menu_state = menus::MenuHandlerState { menus };
    let menu_public_routes = Router::new()
        .route("/", get(menus::list_menus))
        .route("/{id}", get(menus::get_menu))
        .route("/{id}/options", get(menus::list_menu_options))
        .with_state(menu_state.clone());
    let menu_admin_routes = Router::new()
        .route("/", post(menus::create_menu))
        .route("/admin", get(menus::list_all_menus))
        .route(
            "/{id}",
            put(menus::update_menu).delete(menus::delete_menu),
        )
        .route("/{id}/availability", patch(menus::update_menu_availability))
        .route("/{id}/options", post(menus::create_menu_option))
        .route(
            "/{id}/options/{option_id}",
            put(menus::update_menu_option).delete(menus::delete_menu_option),
        )
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(menu_state);

    // ── Carts ──────────────────────────────────────────────────
    let cart_state = carts::CartHandlerState { carts };
    let cart_public_routes = Router::new()
        .route(
            "/table/{table_id}",
            get(carts::get_cart).delete(carts::clear_cart),
        )
        .route("/table/{table_id}/items", post(carts::add_cart_item))
        .route(
            "/table/{table_id}/items/{item_id}",
            put(carts::update_cart_item).delete(carts::remove_cart_item),
        )
        .with_state(cart_state.clone());
    let cart_admin_routes = Router::new()
        .route("/sweep", post(carts::sweep_carts))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(cart_state);

    // ── Orders ─────────────────────────────────────────────────
    let order_state = orders::OrderHandlerState { orders };
    let order_public_routes = Router::new()
        .route("/table/{table_id}", post(orders::create_order))
        .route("/table/{table_id}/active", get(orders::list_active_orders))
        .route("/{id}", get(orders::get_order))
        .route("/{id}/cancel", post(orders::cancel_order))
        .with_state(order_state.clone());
    let order_admin_routes = Router::new()
        .route("/", get(orders::list_orders))
        .route("/{id}/status", patch(orders::update_order_status))
        .route("/stats/status-counts", get(orders::get_status_counts))
        .route("/stats/today", get(orders::get_today_stats))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(order_state);

    // ── Payments ───────────────────────────────────────────────
    let payment_state = payments::PaymentHandlerState { payments };
    let payment_public_routes = Router::new()
        .route("/card", post(payments::pay_by_card))
        .route("/cash", post(payments::pay_by_cash))
        .route("/{id}", get(payments::get_payment))
        .route("/order/{order_id}", get(payments::get_payment_by_order))
        .with_state(payment_state.clone());
    let payment_admin_routes = Router::new()
        .route("/{id}/refund", post(payments::refund_payment))
        .route("/stats/today", get(payments::get_today_stats))
        .layer(middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(payment_state);

    // ── Health ─────────────────────────────────────────────────
    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .nest("/api/v1/auth", auth_public_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        .nest("/api/v1/tables", table_public_routes)
        .nest("/api/v1/tables", table_admin_routes)
        .nest("/api/v1/menus", menu_public_routes)
        .nest("/api/v1/menus", menu_admin_routes)
        .nest("/api/v1/carts", cart_public_routes)
        .nest("/api/v1/carts", cart_admin_routes)
        .nest("/api/v1/orders", order_public_routes)
        .nest("/api/v1/orders", order_admin_routes)
        .nest("/api/v1/payments", payment_public_routes)
        .nest("/api/v1/payments", payment_admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
