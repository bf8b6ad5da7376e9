//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use super::db_err;
use crate::domain::user::{User, UserRepository, UserRole};
use crate::infrastructure::database::entities::user;
use crate::shared::{DomainError, DomainResult};

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(u: user::Model) -> User {
    User {
        id: u.id,
        username: u.username,
        email: u.email,
        password_hash: u.password_hash,
        role: match u.role {
            user::UserRole::Admin => UserRole::Admin,
            user::UserRole::Staff => UserRole::Staff,
        },
        is_active: u.is_active,
        last_login_at: u.last_login_at,
        created_at: u.created_at,
        updated_at: u.updated_at,
    }
}

fn role_to_entity(r: UserRole) -> user::UserRole {
    match r {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::Staff => user::UserRole::Staff,
    }
}

// ── SeaOrmUserRepository ────────────────────────────────────────

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(
                user::Column::Username
                    .eq(login)
                    .or(user::Column::Email.eq(login)),
            )
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn exists_by_username(&self, username: &str) -> DomainResult<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn save(&self, u: User) -> DomainResult<User> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: ActiveValue::NotSet,
            username: Set(u.username),
            email: Set(u.email),
            password_hash: Set(u.password_hash),
            role: Set(role_to_entity(u.role)),
            is_active: Set(u.is_active),
            last_login_at: Set(u.last_login_at),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        info!("User saved: {} ({})", result.username, result.id);
        Ok(entity_to_domain(result))
    }

    async fn update(&self, u: &User) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(u.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("User", "id", u.id));
        };

        let model = user::ActiveModel {
            id: Set(u.id),
            username: Set(u.username.clone()),
            email: Set(u.email.clone()),
            password_hash: Set(u.password_hash.clone()),
            role: Set(role_to_entity(u.role)),
            is_active: Set(u.is_active),
            last_login_at: Set(u.last_login_at),
            created_at: Set(existing.created_at),
            updated_at: Set(Utc::now()),
        };
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
