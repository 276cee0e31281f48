// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{config::AppState, handlers, middleware::auth::auth_guard};

/// Todas as rotas da API, já com o estado aplicado.
pub fn api_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas, exceto /me)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::get_me));

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route("/mine", get(handlers::products::list_my_products))
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    let order_routes = Router::new()
        .route(
            "/",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route("/{id}", get(handlers::orders::get_order))
        .route("/{id}/status", put(handlers::orders::update_order_status));

    let transport_routes = Router::new()
        .route("/create-delivery", post(handlers::transport::create_delivery))
        .route("/available", get(handlers::transport::list_available))
        .route("/my-deliveries", get(handlers::transport::list_my_deliveries))
        .route("/track/{order_id}", get(handlers::transport::track_delivery))
        .route("/{id}/accept", post(handlers::transport::accept_delivery))
        .route("/{id}/status", put(handlers::transport::update_delivery_status));

    // O chatbot é público; o resto do chat passa pelo guard
    let chat_routes = Router::new()
        .route("/send", post(handlers::chat::send_message))
        .route("/conversations", get(handlers::chat::list_conversations))
        .route("/messages/{user_id}", get(handlers::chat::list_messages))
        .route("/unread", get(handlers::chat::unread_count))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
        .route("/chatbot", post(handlers::chat::chatbot));

    let pest_routes = Router::new()
        .route("/diagnose", post(handlers::pest::diagnose))
        .route("/history", get(handlers::pest::history))
        .route("/common-pests", get(handlers::pest::common_pests));

    let supplier_routes = Router::new()
        .route(
            "/products",
            post(handlers::supplier::create_product).get(handlers::supplier::list_products),
        )
        .route(
            "/products/{id}",
            get(handlers::supplier::get_product).put(handlers::supplier::update_product),
        )
        .route("/my-products", get(handlers::supplier::list_my_products))
        .route("/categories", get(handlers::supplier::list_categories));

    let cooperative_routes = Router::new()
        .route(
            "/",
            post(handlers::cooperative::create_cooperative)
                .get(handlers::cooperative::list_cooperatives),
        )
        .route("/my/memberships", get(handlers::cooperative::my_memberships))
        .route("/{id}", get(handlers::cooperative::get_cooperative))
        .route("/{id}/join", post(handlers::cooperative::join_cooperative))
        .route("/{id}/leave", delete(handlers::cooperative::leave_cooperative));

    let weather_routes = Router::new()
        .route(
            "/alerts",
            get(handlers::weather::list_alerts).post(handlers::weather::create_alert),
        )
        .route("/forecast/{province}", get(handlers::weather::get_forecast));

    let admin_routes = Router::new()
        .route("/dashboard", get(handlers::admin::dashboard))
        .route("/users", get(handlers::admin::list_users))
        .route("/users/{id}/verify", put(handlers::admin::verify_user))
        .route("/users/{id}/toggle-active", put(handlers::admin::toggle_user_active))
        .route("/transactions", get(handlers::admin::list_transactions))
        .route("/reports/monthly", get(handlers::admin::monthly_report));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/products", product_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/transport", transport_routes)
        .nest("/api/chat", chat_routes)
        .nest("/api/pest", pest_routes)
        .nest("/api/supplier", supplier_routes)
        .nest("/api/cooperative", cooperative_routes)
        .nest("/api/weather", weather_routes)
        .nest("/api/admin", admin_routes)
        .with_state(app_state)
}
