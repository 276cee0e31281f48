// src/services/admin_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AdminRepository, UserRepository},
    models::{
        admin::{
            most_recent_orders, DashboardResponse, DashboardStats, MonthlyReport,
            MonthlyReportQuery, ReportWindow, TransactionEntry, UserFilter,
        },
        auth::User,
    },
};

#[derive(Clone)]
pub struct AdminService {
    admin_repo: AdminRepository,
    user_repo: UserRepository,
}

impl AdminService {
    pub fn new(admin_repo: AdminRepository, user_repo: UserRepository) -> Self {
        Self { admin_repo, user_repo }
    }

    /// Recalculado a cada chamada; nada fica em cache.
    pub async fn dashboard(&self) -> Result<DashboardResponse, AppError> {
        let roles = self.admin_repo.active_user_roles().await?;
        let products = self.admin_repo.product_statuses().await?;
        let orders = self.admin_repo.order_snapshots().await?;
        let deliveries = self.admin_repo.delivery_statuses().await?;

        let stats = DashboardStats::compute(&roles, &products, &orders, &deliveries);
        Ok(DashboardResponse {
            stats,
            recent_orders: most_recent_orders(orders),
        })
    }

    pub async fn monthly_report(&self, query: &MonthlyReportQuery) -> Result<MonthlyReport, AppError> {
        let window = ReportWindow::resolve(query.year, query.month, Utc::now().date_naive())
            .ok_or_else(|| AppError::BadRequest("Mês ou ano inválido".into()))?;

        let totals = self.admin_repo.order_totals_between(window.start, window.end).await?;
        let new_users = self.admin_repo.new_users_between(window.start, window.end).await?;

        Ok(MonthlyReport::build(&window, &totals, new_users))
    }

    pub async fn users(&self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        self.user_repo.list(filter).await
    }

    pub async fn set_verified(&self, id: Uuid, is_verified: bool) -> Result<User, AppError> {
        self.user_repo
            .set_verified(id, is_verified)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário não encontrado"))
    }

    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<User, AppError> {
        let user = self
            .user_repo
            .set_active(id, is_active)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário não encontrado"))?;
        tracing::info!("👤 Usuário {} agora está {}", id, if is_active { "ativo" } else { "inativo" });
        Ok(user)
    }

    pub async fn transactions(&self) -> Result<Vec<TransactionEntry>, AppError> {
        self.admin_repo.latest_transactions().await
    }
}
