//! Staff account repository interface

use async_trait::async_trait;

use super::model::User;
use crate::shared::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    /// Login lookup: matches on username or email.
    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>>;
    async fn exists_by_username(&self, username: &str) -> DomainResult<bool>;
    async fn exists_by_email(&self, email: &str) -> DomainResult<bool>;
    async fn count(&self) -> DomainResult<u64>;
    async fn save(&self, user: User) -> DomainResult<User>;
    async fn update(&self, user: &User) -> DomainResult<()>;
}
