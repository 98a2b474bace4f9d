use reqwest::Method;
use webnovel_lib::models::{AppSettings, SettingsPatch, SettingsResponse};

use super::{ApiClient, NO_QUERY};
use crate::error::Error;

impl ApiClient {
    pub async fn get_settings(&self) -> Result<AppSettings, Error> {
        let res: SettingsResponse = self.get("/settings", NO_QUERY).await?;
        Ok(res.into())
    }

    /// Sends only the fields set in `patch`. The response body is not
    /// relied on, the caller already applied the patch locally.
    pub async fn update_settings(&self, patch: &SettingsPatch) -> Result<(), Error> {
        if patch.is_empty() {
            return Err(webnovel_lib::error::Error::EmptyUpdate.into());
        }
        self.send(Method::PUT, "/settings", |req| req.json(patch))
            .await?;
        Ok(())
    }
}
