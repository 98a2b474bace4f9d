use webnovel_lib::models::{
    AppSettings, ReaderPatch, ScrapingPatch, SettingsPatch, StoragePatch,
};

use crate::{
    api::ApiClient,
    error::Error,
    store::{AuthStore, SettingsStore},
};

/// Keeps the local settings and the server copy in step. Updates are
/// applied locally first and kept even when the push fails.
#[derive(Clone)]
pub struct SettingsService {
    api: ApiClient,
    store: SettingsStore,
    auth: AuthStore,
}

impl SettingsService {
    pub fn new(api: ApiClient, store: SettingsStore, auth: AuthStore) -> Self {
        Self { api, store, auth }
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Pulls the server copy into the store. Without a session the local
    /// settings are returned as they are.
    pub async fn sync(&self) -> Result<AppSettings, Error> {
        if !self.auth.is_authenticated() {
            debug!("not logged in, using local settings");
            return Ok(self.store.get());
        }

        let settings = self.api.get_settings().await?;
        self.store.replace(settings.clone());

        Ok(settings)
    }

    pub async fn update(&self, patch: &SettingsPatch) -> Result<(), Error> {
        self.store.update_settings(patch);
        self.push(patch).await
    }

    pub async fn update_scraping(&self, patch: &ScrapingPatch) -> Result<(), Error> {
        self.store.update_scraping(patch);
        self.push(&SettingsPatch {
            scraping: Some(patch.clone()),
            ..Default::default()
        })
        .await
    }

    pub async fn update_storage(&self, patch: &StoragePatch) -> Result<(), Error> {
        self.store.update_storage(patch);
        self.push(&SettingsPatch {
            storage: Some(patch.clone()),
            ..Default::default()
        })
        .await
    }

    pub async fn update_reader(&self, patch: &ReaderPatch) -> Result<(), Error> {
        self.store.update_reader(patch);
        self.push(&SettingsPatch {
            reader: Some(patch.clone()),
            ..Default::default()
        })
        .await
    }

    pub async fn reset(&self) -> Result<(), Error> {
        self.store.reset();
        self.push(&SettingsPatch::from(&self.store.get())).await
    }

    async fn push(&self, patch: &SettingsPatch) -> Result<(), Error> {
        if !self.auth.is_authenticated() {
            debug!("not logged in, settings kept locally");
            return Ok(());
        }

        if let Err(e) = self.api.update_settings(patch).await {
            warn!("settings saved locally but not on the server: {e}");
            return Err(e);
        }
        Ok(())
    }
}
