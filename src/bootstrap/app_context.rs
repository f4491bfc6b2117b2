use std::sync::Arc;

use crate::application::ports::folder_repository::FolderRepository;
use crate::application::ports::item_position_repository::ItemPositionRepository;
use crate::application::ports::link_repository::LinkRepository;
use crate::application::ports::session_store::SessionStore;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    link_repo: Arc<dyn LinkRepository>,
    folder_repo: Arc<dyn FolderRepository>,
    position_repo: Arc<dyn ItemPositionRepository>,
    user_repo: Arc<dyn UserRepository>,
    session_store: Arc<dyn SessionStore>,
}

impl AppServices {
    pub fn new(
        link_repo: Arc<dyn LinkRepository>,
        folder_repo: Arc<dyn FolderRepository>,
        position_repo: Arc<dyn ItemPositionRepository>,
        user_repo: Arc<dyn UserRepository>,
        session_store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            link_repo,
            folder_repo,
            position_repo,
            user_repo,
            session_store,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn link_repo(&self) -> Arc<dyn LinkRepository> {
        self.services.link_repo.clone()
    }

    pub fn folder_repo(&self) -> Arc<dyn FolderRepository> {
        self.services.folder_repo.clone()
    }

    pub fn position_repo(&self) -> Arc<dyn ItemPositionRepository> {
        self.services.position_repo.clone()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        self.services.session_store.clone()
    }
}
