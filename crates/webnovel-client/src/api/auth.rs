use reqwest::Method;
use webnovel_lib::models::{AuthResponse, LoginRequest, RegisterRequest, User};

use super::{ApiClient, NO_QUERY, decode};
use crate::error::Error;

impl ApiClient {
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, Error> {
        credentials.validate()?;
        let res = self
            .send(Method::POST, "/auth/login", |req| req.json(credentials))
            .await?;
        decode(res).await
    }

    pub async fn register(&self, account: &RegisterRequest) -> Result<AuthResponse, Error> {
        account.validate()?;
        let res = self
            .send(Method::POST, "/auth/register", |req| req.json(account))
            .await?;
        decode(res).await
    }

    /// Tells the content service to drop the session. The local session is
    /// left alone, see `AuthService::logout`.
    pub async fn logout(&self) -> Result<(), Error> {
        self.send(Method::POST, "/auth/logout", |req| req).await?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<User, Error> {
        self.get("/auth/user", NO_QUERY).await
    }
}
