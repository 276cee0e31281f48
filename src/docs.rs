// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Products ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::list_my_products,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Orders ---
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::update_order_status,

        // --- Transport ---
        handlers::transport::create_delivery,
        handlers::transport::list_available,
        handlers::transport::accept_delivery,
        handlers::transport::update_delivery_status,
        handlers::transport::list_my_deliveries,
        handlers::transport::track_delivery,

        // --- Chat ---
        handlers::chat::send_message,
        handlers::chat::list_conversations,
        handlers::chat::list_messages,
        handlers::chat::unread_count,
        handlers::chat::chatbot,

        // --- Pest ---
        handlers::pest::diagnose,
        handlers::pest::history,
        handlers::pest::common_pests,

        // --- Supplier ---
        handlers::supplier::create_product,
        handlers::supplier::list_products,
        handlers::supplier::get_product,
        handlers::supplier::update_product,
        handlers::supplier::list_my_products,
        handlers::supplier::list_categories,

        // --- Cooperative ---
        handlers::cooperative::create_cooperative,
        handlers::cooperative::list_cooperatives,
        handlers::cooperative::get_cooperative,
        handlers::cooperative::join_cooperative,
        handlers::cooperative::leave_cooperative,
        handlers::cooperative::my_memberships,

        // --- Weather ---
        handlers::weather::list_alerts,
        handlers::weather::create_alert,
        handlers::weather::get_forecast,

        // --- Admin ---
        handlers::admin::dashboard,
        handlers::admin::list_users,
        handlers::admin::verify_user,
        handlers::admin::toggle_user_active,
        handlers::admin::list_transactions,
        handlers::admin::monthly_report,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::UserSummary,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Products ---
            models::product::ProductStatus,
            models::product::Product,
            models::product::ProductListing,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,

            // --- Orders ---
            models::order::OrderStatus,
            models::order::PaymentStatus,
            models::order::Order,
            models::order::OrderItem,
            models::order::OrderRow,
            models::order::OrderItemDetail,
            models::order::OrderDetail,
            models::order::OrderItemInput,
            models::order::CreateOrderPayload,
            models::order::UpdateOrderStatusPayload,

            // --- Transport ---
            models::delivery::DeliveryStatus,
            models::delivery::Delivery,
            models::delivery::DeliveryListing,
            models::delivery::DeliveryTracking,
            models::delivery::CreateDeliveryPayload,
            models::delivery::UpdateDeliveryStatusPayload,

            // --- Chat ---
            models::chat::Chat,
            models::chat::ChatMessage,
            models::chat::ConversationPartner,
            models::chat::SendMessagePayload,
            models::chat::ChatbotPayload,
            services::chatbot::ChatLanguage,
            services::chatbot::ChatbotReply,

            // --- Pest ---
            models::pest::PestMatch,
            models::pest::PestDiagnostic,
            models::pest::PestDiagnosticHistoryEntry,
            models::pest::SupplierRecommendation,
            models::pest::DiagnosisOutcome,
            models::pest::DiagnosePayload,

            // --- Supplier ---
            models::supplier::SupplierProduct,
            models::supplier::SupplierProductListing,
            models::supplier::CreateSupplierProductPayload,
            models::supplier::UpdateSupplierProductPayload,

            // --- Cooperative ---
            models::cooperative::Cooperative,
            models::cooperative::CooperativeSummary,
            models::cooperative::CooperativeMember,
            models::cooperative::MemberProfile,
            models::cooperative::CooperativeDetail,
            models::cooperative::Membership,
            models::cooperative::CreateCooperativePayload,

            // --- Weather ---
            models::weather::WeatherAlert,
            models::weather::CreateAlertPayload,
            models::weather::Forecast,

            // --- Admin ---
            models::admin::OrderSnapshot,
            models::admin::UsersByType,
            models::admin::DashboardStats,
            models::admin::DashboardResponse,
            models::admin::MonthlyReport,
            models::admin::VerifyUserPayload,
            models::admin::ToggleActivePayload,
            models::admin::TransactionEntry,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Products", description = "Produtos dos Agricultores"),
        (name = "Orders", description = "Pedidos e Baixa de Estoque"),
        (name = "Transport", description = "Entregas e Rastreio"),
        (name = "Chat", description = "Mensagens e Assistente"),
        (name = "Pest", description = "Diagnóstico de Pragas"),
        (name = "Supplier", description = "Insumos dos Fornecedores"),
        (name = "Cooperative", description = "Cooperativas de Agricultores"),
        (name = "Weather", description = "Alertas e Previsão do Tempo"),
        (name = "Admin", description = "Painel Administrativo")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_resource_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/products/{id}",
            "/api/orders/{id}/status",
            "/api/transport/{id}/accept",
            "/api/chat/chatbot",
            "/api/pest/diagnose",
            "/api/supplier/categories",
            "/api/cooperative/{id}/join",
            "/api/weather/forecast/{province}",
            "/api/admin/reports/monthly",
        ] {
            assert!(doc.paths.paths.contains_key(path), "rota sem documentação: {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("componentes");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
