use crate::{
    api::ApiClient,
    chapters::ChapterController,
    config::ClientConfig,
    error::Error,
    services::{AuthService, LibraryService, SettingsService},
    storage::SharedStorage,
    store::{AuthStore, NovelStore, SettingsStore},
};

/// Everything a front end needs, wired over one storage backend
#[derive(Clone)]
pub struct ClientContext {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub auth: AuthService,
    pub library: LibraryService,
    pub settings: SettingsService,
}

impl ClientContext {
    pub fn new(config: ClientConfig, storage: SharedStorage) -> Result<Self, Error> {
        let auth_store = AuthStore::new(storage.clone());
        let settings_store = SettingsStore::new(storage);
        let api = ApiClient::new(&config, auth_store.clone())?;

        Ok(Self {
            auth: AuthService::new(api.clone(), auth_store.clone()),
            library: LibraryService::new(api.clone(), NovelStore::new()),
            settings: SettingsService::new(api.clone(), settings_store, auth_store),
            api,
            config,
        })
    }

    /// A fresh controller for one chapter list view
    pub fn chapter_controller(&self) -> ChapterController<ApiClient> {
        ChapterController::from_config(self.api.clone(), &self.config)
    }
}
