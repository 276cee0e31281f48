// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::Role,
};

/// 1. O Trait que define um conjunto de perfis aceitos
pub trait RoleSet: Send + Sync + 'static {
    fn allowed() -> &'static [Role];

    fn permits(role: Role) -> bool {
        Self::allowed().contains(&role)
    }
}

/// 2. O Extractor (Guardião): só passa se o perfil do token estiver no conjunto
pub struct RequireRole<T>(pub AuthenticatedUser, pub PhantomData<T>);

impl<T> RequireRole<T> {
    pub fn user(&self) -> &AuthenticatedUser {
        &self.0
    }
}

impl<T: RoleSet> RequireRole<T> {
    pub fn check(user: AuthenticatedUser) -> Result<Self, AppError> {
        if !T::permits(user.role) {
            return Err(AppError::Forbidden);
        }
        Ok(RequireRole(user, PhantomData))
    }
}

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleSet,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        Self::check(user)
    }
}

// ---
// CONJUNTOS DE PERFIS (TIPOS)
// ---

pub struct FarmerOnly;
impl RoleSet for FarmerOnly {
    fn allowed() -> &'static [Role] { &[Role::Agricultor] }
}

pub struct BuyerOnly;
impl RoleSet for BuyerOnly {
    fn allowed() -> &'static [Role] { &[Role::Comprador] }
}

pub struct TransporterOnly;
impl RoleSet for TransporterOnly {
    fn allowed() -> &'static [Role] { &[Role::Transportador] }
}

pub struct SupplierOnly;
impl RoleSet for SupplierOnly {
    fn allowed() -> &'static [Role] { &[Role::Fornecedor] }
}

pub struct AdminOnly;
impl RoleSet for AdminOnly {
    fn allowed() -> &'static [Role] { &[Role::Admin] }
}

// Quem participa de pedidos (fornecedores vendem insumos fora deste fluxo)
pub struct OrderParticipant;
impl RoleSet for OrderParticipant {
    fn allowed() -> &'static [Role] {
        &[Role::Comprador, Role::Agricultor, Role::Transportador, Role::Admin]
    }
}

// ---
// PERFIS RESOLVIDOS (linha de extensão do usuário)
// ---

async fn resolve_profile<T, S>(parts: &mut Parts, state: &S, role: Role) -> Result<(AuthenticatedUser, Uuid), AppError>
where
    T: RoleSet,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    let RequireRole(user, _) = RequireRole::<T>::from_request_parts(parts, state).await?;
    let app_state = AppState::from_ref(state);

    let profile_id = app_state
        .user_repo
        .find_profile_id(role, user.id)
        .await?
        .ok_or(AppError::ProfileNotFound(role))?;

    Ok((user, profile_id))
}

/// Agricultor autenticado com o id da linha em `farmers`.
pub struct CurrentFarmer {
    pub user: AuthenticatedUser,
    pub farmer_id: Uuid,
}

impl<S> FromRequestParts<S> for CurrentFarmer
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (user, farmer_id) = resolve_profile::<FarmerOnly, S>(parts, state, Role::Agricultor).await?;
        Ok(Self { user, farmer_id })
    }
}

pub struct CurrentTransporter {
    pub user: AuthenticatedUser,
    pub transporter_id: Uuid,
}

impl<S> FromRequestParts<S> for CurrentTransporter
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (user, transporter_id) =
            resolve_profile::<TransporterOnly, S>(parts, state, Role::Transportador).await?;
        Ok(Self { user, transporter_id })
    }
}

pub struct CurrentSupplier {
    pub user: AuthenticatedUser,
    pub supplier_id: Uuid,
}

impl<S> FromRequestParts<S> for CurrentSupplier
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (user, supplier_id) =
            resolve_profile::<SupplierOnly, S>(parts, state, Role::Fornecedor).await?;
        Ok(Self { user, supplier_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "teste@exemplo.co.mz".into(),
            role,
        }
    }

    #[test]
    fn matching_role_passes() {
        let guard = RequireRole::<FarmerOnly>::check(user(Role::Agricultor)).unwrap();
        assert_eq!(guard.user().role, Role::Agricultor);
    }

    #[test]
    fn other_roles_are_denied() {
        let err = RequireRole::<AdminOnly>::check(user(Role::Comprador)).err().unwrap();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn suppliers_do_not_take_part_in_orders() {
        assert!(!OrderParticipant::permits(Role::Fornecedor));
        assert!(OrderParticipant::permits(Role::Transportador));
        assert!(OrderParticipant::permits(Role::Admin));
    }
}
