use futures_signals::signal::Mutable;
use webnovel_lib::models::{
    AppSettings, ReaderPatch, ScrapingPatch, SettingsPatch, StoragePatch,
};

use crate::storage::{self, SETTINGS_KEY, SharedStorage};

#[derive(Clone)]
pub struct SettingsStore {
    storage: SharedStorage,
    settings: Mutable<AppSettings>,
}

impl SettingsStore {
    pub fn new(storage: SharedStorage) -> Self {
        let settings = storage::load(storage.as_ref(), SETTINGS_KEY).unwrap_or_default();

        Self {
            storage,
            settings: Mutable::new(settings),
        }
    }

    pub fn get(&self) -> AppSettings {
        self.settings.get_cloned()
    }

    pub fn update_settings(&self, patch: &SettingsPatch) {
        patch.apply(&mut self.settings.lock_mut());
        self.persist();
    }

    pub fn update_scraping(&self, patch: &ScrapingPatch) {
        patch.apply(&mut self.settings.lock_mut().scraping);
        self.persist();
    }

    pub fn update_storage(&self, patch: &StoragePatch) {
        patch.apply(&mut self.settings.lock_mut().storage);
        self.persist();
    }

    pub fn update_reader(&self, patch: &ReaderPatch) {
        patch.apply(&mut self.settings.lock_mut().reader);
        self.persist();
    }

    /// Replaces everything, used when the server copy is pulled
    pub fn replace(&self, settings: AppSettings) {
        self.settings.set(settings);
        self.persist();
    }

    pub fn reset(&self) {
        self.replace(AppSettings::default());
    }

    fn persist(&self) {
        let settings = self.settings.lock_ref();
        if let Err(e) = storage::save(self.storage.as_ref(), SETTINGS_KEY, &*settings) {
            warn!("failed to persist settings: {e}");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::storage::MemoryStorage;
    use webnovel_lib::models::{ReaderTheme, Theme, UpdateFrequency};

    #[test]
    fn test_defaults_when_empty() {
        let store = SettingsStore::new(MemoryStorage::shared());
        let settings = store.get();
        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.scraping.default_update_frequency, UpdateFrequency::Daily);
        assert_eq!(settings.reader.font_size, 16);
    }

    #[test]
    fn test_partial_updates_persist() {
        let storage = MemoryStorage::shared();
        let store = SettingsStore::new(storage.clone());

        store.update_scraping(&ScrapingPatch {
            concurrent_scrapes: Some(4),
            ..Default::default()
        });
        store.update_reader(&ReaderPatch {
            theme: Some(ReaderTheme::Sepia),
            ..Default::default()
        });

        let restored = SettingsStore::new(storage).get();
        assert_eq!(restored.scraping.concurrent_scrapes, 4);
        assert_eq!(restored.scraping.request_delay, 1000);
        assert_eq!(restored.reader.theme, ReaderTheme::Sepia);
    }

    #[test]
    fn test_reset() {
        let storage = MemoryStorage::shared();
        let store = SettingsStore::new(storage.clone());
        store.update_settings(&SettingsPatch {
            theme: Some(Theme::Dark),
            ..Default::default()
        });

        store.reset();
        assert_eq!(store.get(), AppSettings::default());
        assert_eq!(SettingsStore::new(storage).get(), AppSettings::default());
    }
}
