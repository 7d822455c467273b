// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::{auth::SessionContext, rbac::Role},
};

/// 1. O Trait que define o que é uma Permissão
// A matriz é fechada: três papéis, duas classes de escrita. Leitura só
// exige sessão válida e não passa por aqui.
pub trait PermissionDef: Send + Sync + 'static {
    fn allowed(role: Role) -> bool;
}

// Criar/editar/apagar produto, recebimento, expedição
pub struct PermLedgerWrite;

impl PermissionDef for PermLedgerWrite {
    fn allowed(role: Role) -> bool {
        matches!(role, Role::Owner | Role::Manager)
    }
}

// Trocar o papel de outro membro
pub struct PermManageRoles;

impl PermissionDef for PermManageRoles {
    fn allowed(role: Role) -> bool {
        matches!(role, Role::Owner)
    }
}

/// 2. O Extractor (Guardião)
// `Forbidden`, não `Unauthenticated`: a sessão é válida, o papel é que
// não alcança. O cliente precisa distinguir "faça login" de "peça a um
// administrador".
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<SessionContext>()
            .ok_or(AppError::Unauthenticated)?;

        if !T::allowed(session.role) {
            return Err(AppError::Forbidden);
        }

        Ok(RequirePermission(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A tabela completa papel × operação
    #[test]
    fn matriz_de_permissoes() {
        // escrita no livro: dono e gerente
        assert!(PermLedgerWrite::allowed(Role::Owner));
        assert!(PermLedgerWrite::allowed(Role::Manager));
        assert!(!PermLedgerWrite::allowed(Role::Viewer));

        // gestão de papéis: só o dono
        assert!(PermManageRoles::allowed(Role::Owner));
        assert!(!PermManageRoles::allowed(Role::Manager));
        assert!(!PermManageRoles::allowed(Role::Viewer));
    }
}
