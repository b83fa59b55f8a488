//! In-memory stores and a failing store for handler tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use time::OffsetDateTime;

use crate::db::{StoreError, StoreResult};
use crate::products::{
    repo::ProductStore,
    repo_types::{NewProduct, Product},
};
use crate::state::AppState;
use crate::users::{
    repo::UserStore,
    repo_types::{User, UserChanges},
};

#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
    next_id: Mutex<i64>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.rows.lock().iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut rows = self.rows.lock();
        if rows.iter().any(|u| u.username == username) {
            return Err(StoreError::Duplicate);
        }
        let mut next_id = self.next_id.lock();
        *next_id += 1;
        let user = User {
            id: *next_id,
            username: username.to_owned(),
            password: password_hash.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(self.rows.lock().clone())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut rows = self.rows.lock();
        if let Some(name) = &changes.username {
            if rows.iter().any(|u| &u.username == name && u.id != id) {
                return Err(StoreError::Duplicate);
            }
        }
        let Some(user) = rows.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.username {
            user.username = name;
        }
        user.password = changes.password_hash;
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct MemoryProductStore {
    rows: Mutex<Vec<Product>>,
    next_id: Mutex<i64>,
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.rows.lock().clone())
    }

    async fn create(&self, product: NewProduct) -> StoreResult<Product> {
        let mut next_id = self.next_id.lock();
        *next_id += 1;
        let row = product.with_id(*next_id);
        self.rows.lock().push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, product: NewProduct) -> StoreResult<Option<Product>> {
        let mut rows = self.rows.lock();
        let Some(row) = rows.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        *row = product.with_id(id);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() != before)
    }
}

/// Every call fails as if the database were unreachable.
pub struct FailingStore;

fn unreachable_db() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UserStore for FailingStore {
    async fn find_by_username(&self, _username: &str) -> StoreResult<Option<User>> {
        Err(unreachable_db())
    }
    async fn create(&self, _username: &str, _password_hash: &str) -> StoreResult<User> {
        Err(unreachable_db())
    }
    async fn list(&self) -> StoreResult<Vec<User>> {
        Err(unreachable_db())
    }
    async fn update(&self, _id: i64, _changes: UserChanges) -> StoreResult<Option<User>> {
        Err(unreachable_db())
    }
    async fn delete(&self, _id: i64) -> StoreResult<bool> {
        Err(unreachable_db())
    }
}

#[async_trait]
impl ProductStore for FailingStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        Err(unreachable_db())
    }
    async fn create(&self, _product: NewProduct) -> StoreResult<Product> {
        Err(unreachable_db())
    }
    async fn update(&self, _id: i64, _product: NewProduct) -> StoreResult<Option<Product>> {
        Err(unreachable_db())
    }
    async fn delete(&self, _id: i64) -> StoreResult<bool> {
        Err(unreachable_db())
    }
}

pub fn memory_state() -> AppState {
    AppState::from_parts(
        Arc::new(MemoryUserStore::default()),
        Arc::new(MemoryProductStore::default()),
    )
}

pub fn failing_state() -> AppState {
    AppState::from_parts(Arc::new(FailingStore), Arc::new(FailingStore))
}
