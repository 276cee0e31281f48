// src/models/admin.rs

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    auth::Role,
    delivery::DeliveryStatus,
    order::OrderStatus,
    product::ProductStatus,
};

/// Quantidade de pedidos recentes exibidos no painel.
pub const RECENT_ORDERS_LIMIT: usize = 10;

// --- Projeções leves lidas para o painel ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderSnapshot {
    pub id: Uuid,
    pub total_amount: Decimal,
    pub order_status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct UsersByType {
    pub agricultores: usize,
    pub compradores: usize,
    pub transportadores: usize,
    pub fornecedores: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_users: usize,
    pub users_by_type: UsersByType,
    pub total_products: usize,
    pub available_products: usize,
    pub total_orders: usize,
    pub pending_orders: usize,
    pub completed_orders: usize,
    #[schema(example = "12500.00")]
    pub total_revenue: Decimal,
    pub active_deliveries: usize,
}

impl DashboardStats {
    /// Recalcula todos os contadores a partir das linhas lidas.
    /// `active_user_roles` deve conter apenas usuários ativos.
    pub fn compute(
        active_user_roles: &[Role],
        product_statuses: &[ProductStatus],
        orders: &[OrderSnapshot],
        delivery_statuses: &[DeliveryStatus],
    ) -> Self {
        let count_role = |role: Role| active_user_roles.iter().filter(|r| **r == role).count();
        let count_orders = |status: OrderStatus| {
            orders.iter().filter(|o| o.order_status == status).count()
        };

        Self {
            total_users: active_user_roles.len(),
            users_by_type: UsersByType {
                agricultores: count_role(Role::Agricultor),
                compradores: count_role(Role::Comprador),
                transportadores: count_role(Role::Transportador),
                fornecedores: count_role(Role::Fornecedor),
            },
            total_products: product_statuses.len(),
            available_products: product_statuses
                .iter()
                .filter(|s| **s == ProductStatus::Disponivel)
                .count(),
            total_orders: orders.len(),
            pending_orders: count_orders(OrderStatus::Pendente),
            completed_orders: count_orders(OrderStatus::Entregue),
            total_revenue: orders.iter().map(|o| o.total_amount).sum(),
            active_deliveries: delivery_statuses
                .iter()
                .filter(|s| **s == DeliveryStatus::EmTransito)
                .count(),
        }
    }
}

/// Os pedidos mais recentes primeiro, limitado ao tamanho do painel.
pub fn most_recent_orders(mut orders: Vec<OrderSnapshot>) -> Vec<OrderSnapshot> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders.truncate(RECENT_ORDERS_LIMIT);
    orders
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    #[serde(rename = "recentOrders")]
    pub recent_orders: Vec<OrderSnapshot>,
}

// --- Relatório mensal ---
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthlyReportQuery {
    #[param(example = 2025)]
    pub year: Option<i32>,
    #[param(example = 3)]
    pub month: Option<u32>,
}

/// Intervalo `[start, end)` de um mês do calendário.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// Ano ausente usa o ano de `today`; mês ausente é janeiro.
    /// Retorna `None` para um mês fora de 1..=12.
    pub fn resolve(year: Option<i32>, month: Option<u32>, today: NaiveDate) -> Option<Self> {
        let year = year.unwrap_or(today.year());
        let month = month.unwrap_or(1);

        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };

        Some(Self {
            start: Utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0)?),
            end: Utc.from_utc_datetime(&next.and_hms_opt(0, 0, 0)?),
        })
    }

    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyReport {
    #[schema(example = "01/03/2025 - 01/04/2025")]
    pub period: String,
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub new_users: i64,
    #[schema(example = "350.25")]
    pub average_order_value: Decimal,
}

impl MonthlyReport {
    pub fn build(window: &ReportWindow, order_totals: &[Decimal], new_users: i64) -> Self {
        let total_revenue: Decimal = order_totals.iter().copied().sum();
        let average_order_value = if order_totals.is_empty() {
            Decimal::ZERO
        } else {
            (total_revenue / Decimal::from(order_totals.len())).round_dp(2)
        };

        Self {
            period: window.label(),
            total_orders: order_totals.len(),
            total_revenue,
            new_users,
            average_order_value,
        }
    }
}

// --- Gestão de usuários ---
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    pub user_type: Option<Role>,
    pub is_verified: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyUserPayload {
    pub is_verified: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ToggleActivePayload {
    pub is_active: bool,
}

// Transação com os dados do usuário dono
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TransactionEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_id: Option<Uuid>,
    pub amount: Decimal,
    #[schema(example = "pagamento")]
    pub transaction_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub full_name: String,
    pub email: String,
    pub user_type: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn snapshot(total: i64, status: OrderStatus, minutes_ago: i64) -> OrderSnapshot {
        OrderSnapshot {
            id: Uuid::new_v4(),
            total_amount: Decimal::from(total),
            order_status: status,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn stats_count_each_bucket() {
        let roles = [Role::Agricultor, Role::Agricultor, Role::Comprador, Role::Admin];
        let products = [ProductStatus::Disponivel, ProductStatus::Vendido];
        let orders = [
            snapshot(100, OrderStatus::Pendente, 1),
            snapshot(50, OrderStatus::Entregue, 2),
            snapshot(25, OrderStatus::Cancelado, 3),
        ];
        let deliveries = [DeliveryStatus::EmTransito, DeliveryStatus::Aceito];

        let stats = DashboardStats::compute(&roles, &products, &orders, &deliveries);

        assert_eq!(stats.total_users, 4);
        assert_eq!(stats.users_by_type.agricultores, 2);
        assert_eq!(stats.users_by_type.compradores, 1);
        assert_eq!(stats.users_by_type.fornecedores, 0);
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.available_products, 1);
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.total_revenue, Decimal::from(175));
        assert_eq!(stats.active_deliveries, 1);
    }

    #[test]
    fn empty_store_gives_zeroed_stats() {
        assert_eq!(DashboardStats::compute(&[], &[], &[], &[]), DashboardStats::default());
    }

    #[test]
    fn recent_orders_are_newest_first_and_capped() {
        let orders: Vec<OrderSnapshot> = (0..15)
            .map(|i| snapshot(i, OrderStatus::Pendente, 100 - i))
            .collect();

        let recent = most_recent_orders(orders);
        assert_eq!(recent.len(), RECENT_ORDERS_LIMIT);
        assert_eq!(recent[0].total_amount, Decimal::from(14));
        assert!(recent.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn dashboard_uses_camel_case_key_for_recent_orders() {
        let body = serde_json::to_value(DashboardResponse {
            stats: DashboardStats::default(),
            recent_orders: Vec::new(),
        })
        .unwrap();
        assert!(body.get("recentOrders").is_some());
        assert!(body["stats"].get("users_by_type").is_some());
    }

    #[test]
    fn report_window_defaults_to_january_of_the_current_year() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let window = ReportWindow::resolve(None, None, today).unwrap();
        assert_eq!(window.start.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(window.end.date_naive(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(window.label(), "01/01/2025 - 01/02/2025");
    }

    #[test]
    fn year_without_month_reports_its_january() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let window = ReportWindow::resolve(Some(2024), None, today).unwrap();
        assert_eq!(window.label(), "01/01/2024 - 01/02/2024");
    }

    #[test]
    fn december_window_rolls_into_next_year() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let window = ReportWindow::resolve(Some(2024), Some(12), today).unwrap();
        assert_eq!(window.end.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn invalid_month_has_no_window() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(ReportWindow::resolve(Some(2025), Some(13), today).is_none());
        assert!(ReportWindow::resolve(Some(2025), Some(0), today).is_none());
    }

    #[test]
    fn average_order_value_is_rounded_to_cents() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let window = ReportWindow::resolve(None, None, today).unwrap();
        let totals = [Decimal::from(10), Decimal::from(10), Decimal::from(11)];

        let report = MonthlyReport::build(&window, &totals, 4);
        assert_eq!(report.total_orders, 3);
        assert_eq!(report.total_revenue, Decimal::from(31));
        assert_eq!(report.average_order_value, Decimal::new(1033, 2));
        assert_eq!(report.new_users, 4);
    }

    #[test]
    fn month_without_orders_reports_zero_average() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let window = ReportWindow::resolve(None, None, today).unwrap();
        let report = MonthlyReport::build(&window, &[], 0);
        assert_eq!(report.average_order_value, Decimal::ZERO);
        assert_eq!(report.total_revenue, Decimal::ZERO);
    }
}
