use std::sync::Arc;

use crate::store::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}
