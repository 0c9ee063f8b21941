// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    jwt_expiration_days: i64,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, jwt_expiration_days: i64) -> Self {
        Self { user_repo, jwt_secret, jwt_expiration_days }
    }

    pub async fn register_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AppError> {
        let email = normalize_email(email);
        let hashed_password = hash_password(password).await?;

        let new_user = self
            .user_repo
            .create_user(&email, &hashed_password, first_name.trim(), last_name.trim())
            .await?;

        tracing::info!("👤 Novo usuário registrado: {}", new_user.id);

        self.create_token(&new_user)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(&user)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_token(token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    // --- Conta do usuário ---

    pub async fn update_profile(&self, user_id: Uuid, first_name: &str, last_name: &str) -> Result<User, AppError> {
        self.user_repo
            .update_name(user_id, first_name.trim(), last_name.trim())
            .await
    }

    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !verify_password(current_password, &user.password_hash).await? {
            return Err(AppError::CurrentPasswordInvalid);
        }

        let hashed = hash_password(new_password).await?;
        self.user_repo.update_password(user.id, &hashed).await?;

        tracing::info!("🔑 Senha alterada para o usuário {}", user.id);
        Ok(())
    }

    /// Troca o e-mail (exige a senha) e devolve um token novo com o e-mail atualizado.
    pub async fn change_email(&self, user: &User, new_email: &str, password: &str) -> Result<String, AppError> {
        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::CurrentPasswordInvalid);
        }

        let updated = self
            .user_repo
            .update_email(user.id, &normalize_email(new_email))
            .await?;

        self.create_token(&updated)
    }

    // --- JWT ---

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(self.jwt_expiration_days);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// bcrypt é CPU-bound: roda fora do runtime async
async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service() -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .expect("lazy pool");
        AuthService::new(UserRepository::new(pool), "test-secret".into(), 7)
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ana@example.com".into(),
            password_hash: String::new(),
            first_name: "Ana".into(),
            last_name: "Lima".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn token_round_trip_keeps_subject_and_email() {
        let service = service();
        let user = user();

        let token = service.create_token(&user).unwrap();
        let claims = service.decode_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let other = AuthService::new(
            service().user_repo.clone(),
            "another-secret".into(),
            7,
        );
        let token = other.create_token(&user()).unwrap();

        assert!(matches!(service().decode_token(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hashed = hash_password("secret1").await.unwrap();

        assert!(verify_password("secret1", &hashed).await.unwrap());
        assert!(!verify_password("wrong", &hashed).await.unwrap());
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }
}
