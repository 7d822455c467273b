// src/services/auth.rs

use bcrypt::verify;
use chrono::{Duration, Utc};

use crate::{
    common::error::AppError,
    common::ids::make_session_token,
    db::{MembershipRepository, SessionRepository, UserRepository},
    models::auth::{Me, SessionContext},
};

// Expiração absoluta das sessões
const SESSION_TTL_DAYS: i64 = 14;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    membership_repo: MembershipRepository,
    session_repo: SessionRepository,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        membership_repo: MembershipRepository,
        session_repo: SessionRepository,
    ) -> Self {
        Self {
            user_repo,
            membership_repo,
            session_repo,
        }
    }

    // Verifica credenciais e abre uma sessão presa à primeira organização
    // do usuário. Usuário desconhecido e senha errada produzem o MESMO
    // erro — nada de vazar quais logins existem.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, Me), AppError> {
        let user = self
            .user_repo
            .find_by_name(username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // bcrypt é caro de propósito; roda fora do executor async
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let membership = self
            .membership_repo
            .first_for_user(&user.id)
            .await?
            .ok_or(AppError::NoOrganization)?;

        let token = make_session_token();
        let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);
        self.session_repo
            .insert(&token, &user.id, &membership.org_id, expires_at)
            .await?;

        let me = Me {
            name: user.name,
            email: user.email,
            org_name: membership.org_name,
            org_join_code: membership.org_join_code.unwrap_or_default(),
            role: membership.role,
        };

        Ok((token, me))
    }

    // Resolve um token para (usuário, organização, papel). Expiração é
    // preguiçosa: a sessão vencida é apagada aqui mesmo, na consulta.
    pub async fn resolve(&self, token: &str) -> Result<SessionContext, AppError> {
        let ctx = self
            .session_repo
            .resolve(token)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        if Utc::now() >= ctx.expires_at {
            self.session_repo.delete(token).await?;
            return Err(AppError::Unauthenticated);
        }

        Ok(ctx)
    }

    // Revogação idempotente
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.session_repo.delete(token).await
    }
}
