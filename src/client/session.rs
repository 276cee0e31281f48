// src/client/session.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::auth::{AuthResponse, Role, UserSummary};

/// Token e dados do usuário logado, guardados explicitamente pelo cliente.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserSummary,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.user_type
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn is_buyer(&self) -> bool {
        self.role() == Role::Comprador
    }
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            token: response.token,
            user: response.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_comes_from_the_auth_response() {
        let response = AuthResponse {
            message: "Login realizado com sucesso".into(),
            user: UserSummary {
                id: Uuid::new_v4(),
                email: "ana@exemplo.co.mz".into(),
                full_name: "Ana Sitoe".into(),
                user_type: Role::Comprador,
                language: "pt".into(),
            },
            token: "abc.def.ghi".into(),
        };
        let session = Session::from(response);
        assert_eq!(session.token, "abc.def.ghi");
        assert!(session.is_buyer());
    }
}
