use std::sync::Arc;

use sqlx::PgPool;

use crate::products::repo::{PgProductStore, ProductStore};
use crate::users::repo::{PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
}

impl AppState {
    /// Postgres-backed stores sharing one pool.
    pub fn from_pool(db: PgPool) -> Self {
        Self::from_parts(
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgProductStore::new(db)),
        )
    }

    pub fn from_parts(users: Arc<dyn UserStore>, products: Arc<dyn ProductStore>) -> Self {
        Self { users, products }
    }
}
