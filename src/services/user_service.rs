use crate::dto::auth_dto::RegisterRequest;
use crate::error::{Error, Result};
use crate::models::user::{Admin, User};
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::validation::is_valid_email;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, payload: RegisterRequest) -> Result<User> {
        if !is_valid_email(&payload.email) {
            return Err(Error::BadRequest(
                "Please enter a valid email address".to_string(),
            ));
        }

        let taken: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = $1 OR email = $2")
                .bind(&payload.username)
                .bind(&payload.email)
                .fetch_optional(&self.pool)
                .await?;
        if taken.is_some() {
            return Err(Error::Conflict(
                "Username or email already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&payload.password)
            .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, full_name, qualification, dob)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(&password_hash)
        .bind(&payload.full_name)
        .bind(&payload.qualification)
        .bind(payload.dob)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Verifies user credentials. Returns the account on success, `None` for
    /// both unknown usernames and wrong passwords.
    pub async fn authenticate_user(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        match user {
            Some(u) => {
                let ok = verify_password(password, &u.password_hash)
                    .map_err(|e| Error::Internal(format!("Password verification failed: {}", e)))?;
                Ok(ok.then_some(u))
            }
            None => Ok(None),
        }
    }

    pub async fn authenticate_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        match admin {
            Some(a) => {
                let ok = verify_password(password, &a.password_hash)
                    .map_err(|e| Error::Internal(format!("Password verification failed: {}", e)))?;
                Ok(ok.then_some(a))
            }
            None => Ok(None),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    pub async fn search_users(&self, query: &str) -> Result<Vec<User>> {
        let pattern = format!("%{}%", query);
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE username ILIKE $1 OR email ILIKE $1 OR full_name ILIKE $1
            ORDER BY username
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Creates the bootstrap admin account if it does not exist yet.
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<()> {
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM admins WHERE username = $1 OR email = $2")
                .bind(username)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Ok(());
        }

        let password_hash = hash_password(password)
            .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;
        sqlx::query("INSERT INTO admins (username, email, password_hash) VALUES ($1, $2, $3)")
            .bind(username)
            .bind(email)
            .bind(&password_hash)
            .execute(&self.pool)
            .await?;
        tracing::info!(username, "Created default admin account");
        Ok(())
    }
}
