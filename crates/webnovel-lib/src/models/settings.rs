use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateFrequency {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    #[default]
    Epub,
    Pdf,
    Txt,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Low,
    #[default]
    Medium,
    High,
    Original,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderTheme {
    #[default]
    Light,
    Dark,
    Sepia,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrapingSettings {
    pub default_update_frequency: UpdateFrequency,
    pub concurrent_scrapes: u32,
    /// milliseconds between requests to the same source
    pub request_delay: u64,
    pub use_proxy: bool,
    pub proxy_url: String,
    pub user_agent_rotation: bool,
}

impl Default for ScrapingSettings {
    fn default() -> Self {
        Self {
            default_update_frequency: UpdateFrequency::Daily,
            concurrent_scrapes: 2,
            request_delay: 1000,
            use_proxy: false,
            proxy_url: String::new(),
            user_agent_rotation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageSettings {
    pub location: String,
    pub download_format: DownloadFormat,
    pub image_quality: ImageQuality,
    pub auto_download: bool,
    pub compress_images: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            location: String::new(),
            download_format: DownloadFormat::Epub,
            image_quality: ImageQuality::Medium,
            auto_download: true,
            compress_images: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReaderSettings {
    pub font_size: u32,
    pub font_family: String,
    pub line_height: f32,
    pub theme: ReaderTheme,
    pub page_turn_animation: bool,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            font_size: 16,
            font_family: "Merriweather".to_string(),
            line_height: 1.5,
            theme: ReaderTheme::Light,
            page_turn_animation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub theme: Theme,
    pub language: String,
    pub notifications: bool,
    pub auto_update: bool,
    pub analytics: bool,
    pub scraping: ScrapingSettings,
    pub storage: StorageSettings,
    pub reader: ReaderSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            language: "en".to_string(),
            notifications: true,
            auto_update: true,
            analytics: false,
            scraping: ScrapingSettings::default(),
            storage: StorageSettings::default(),
            reader: ReaderSettings::default(),
        }
    }
}

/// `GET /settings` answers either with the settings object or with it wrapped
/// in `{"settings": ...}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SettingsResponse {
    Wrapped { settings: AppSettings },
    Bare(AppSettings),
}

impl From<SettingsResponse> for AppSettings {
    fn from(res: SettingsResponse) -> Self {
        match res {
            SettingsResponse::Wrapped { settings } => settings,
            SettingsResponse::Bare(settings) => settings,
        }
    }
}

macro_rules! patch_fields {
    ($target:expr, $patch:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )*
    };
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_update_frequency: Option<UpdateFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrent_scrapes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_delay: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_proxy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent_rotation: Option<bool>,
}

impl ScrapingPatch {
    pub fn apply(&self, settings: &mut ScrapingSettings) {
        patch_fields!(
            settings,
            self,
            [
                default_update_frequency,
                concurrent_scrapes,
                request_delay,
                use_proxy,
                proxy_url,
                user_agent_rotation,
            ]
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoragePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_format: Option<DownloadFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_quality: Option<ImageQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_download: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compress_images: Option<bool>,
}

impl StoragePatch {
    pub fn apply(&self, settings: &mut StorageSettings) {
        patch_fields!(
            settings,
            self,
            [
                location,
                download_format,
                image_quality,
                auto_download,
                compress_images,
            ]
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ReaderTheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_turn_animation: Option<bool>,
}

impl ReaderPatch {
    pub fn apply(&self, settings: &mut ReaderSettings) {
        patch_fields!(
            settings,
            self,
            [font_size, font_family, line_height, theme, page_turn_animation]
        );
    }
}

/// Partial update of [`AppSettings`]; serialized as-is for `PUT /settings`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_update: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraping: Option<ScrapingPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StoragePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reader: Option<ReaderPatch>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(&self, settings: &mut AppSettings) {
        patch_fields!(
            settings,
            self,
            [theme, language, notifications, auto_update, analytics]
        );
        if let Some(scraping) = &self.scraping {
            scraping.apply(&mut settings.scraping);
        }
        if let Some(storage) = &self.storage {
            storage.apply(&mut settings.storage);
        }
        if let Some(reader) = &self.reader {
            reader.apply(&mut settings.reader);
        }
    }
}

impl From<&AppSettings> for SettingsPatch {
    /// Patch that overwrites every field, used to push a full reset
    fn from(settings: &AppSettings) -> Self {
        let scraping = &settings.scraping;
        let storage = &settings.storage;
        let reader = &settings.reader;

        Self {
            theme: Some(settings.theme),
            language: Some(settings.language.clone()),
            notifications: Some(settings.notifications),
            auto_update: Some(settings.auto_update),
            analytics: Some(settings.analytics),
            scraping: Some(ScrapingPatch {
                default_update_frequency: Some(scraping.default_update_frequency),
                concurrent_scrapes: Some(scraping.concurrent_scrapes),
                request_delay: Some(scraping.request_delay),
                use_proxy: Some(scraping.use_proxy),
                proxy_url: Some(scraping.proxy_url.clone()),
                user_agent_rotation: Some(scraping.user_agent_rotation),
            }),
            storage: Some(StoragePatch {
                location: Some(storage.location.clone()),
                download_format: Some(storage.download_format),
                image_quality: Some(storage.image_quality),
                auto_download: Some(storage.auto_download),
                compress_images: Some(storage.compress_images),
            }),
            reader: Some(ReaderPatch {
                font_size: Some(reader.font_size),
                font_family: Some(reader.font_family.clone()),
                line_height: Some(reader.line_height),
                theme: Some(reader.theme),
                page_turn_animation: Some(reader.page_turn_animation),
            }),
        }
    }
}
