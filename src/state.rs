use std::sync::Arc;

use crate::config::Config;
use crate::rate_limit::LoginRateLimiter;
use crate::services::{CatService, UserService};
use crate::store::Store;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub cats: CatService,
    pub users: UserService,
    pub login_limiter: LoginRateLimiter,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            cats: CatService::new(store.clone()),
            users: UserService::new(store, config.password),
            config,
            login_limiter: LoginRateLimiter::new(),
        }
    }
}
