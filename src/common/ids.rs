// src/common/ids.rs

use rand::Rng;
use uuid::Uuid;

/// Gera um id curto com prefixo de entidade, ex.: `p_1a2b3c4d5e`.
pub fn make_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..10])
}

/// Gera um código de convite legível (6 hex maiúsculos).
pub fn make_join_code() -> String {
    let mut bytes = [0u8; 3];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes).to_uppercase()
}

/// Gera um token de sessão opaco: 32 bytes aleatórios em hex.
pub fn make_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carregam_prefixo_e_tamanho_fixo() {
        let id = make_id("p");
        assert!(id.starts_with("p_"));
        assert_eq!(id.len(), 12);
    }

    #[test]
    fn token_de_sessao_tem_64_hex() {
        let token = make_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, make_session_token());
    }

    #[test]
    fn codigo_de_convite_e_maiusculo() {
        let code = make_join_code();
        assert_eq!(code.len(), 6);
        assert_eq!(code, code.to_uppercase());
    }
}
