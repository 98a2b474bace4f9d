use webnovel_lib::models::{LoginRequest, RegisterRequest, User};

use crate::{api::ApiClient, error::Error, store::AuthStore};

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    store: AuthStore,
}

impl AuthService {
    pub fn new(api: ApiClient, store: AuthStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &AuthStore {
        &self.store
    }

    fn begin(&self) {
        self.store.set_loading(true);
        self.store.set_error(None);
    }

    fn finish<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(e) = &result {
            self.store.set_error(Some(e.to_string()));
        }
        self.store.set_loading(false);
        result
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let credentials = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        self.begin();
        let res = self.finish(self.api.login(&credentials).await)?;
        info!("logged in as {}", res.user.username);
        self.store.login(res.user.clone(), res.token);

        Ok(res.user)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User, Error> {
        let account = RegisterRequest {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        self.begin();
        let res = self.finish(self.api.register(&account).await)?;
        info!("registered {}", res.user.username);
        self.store.login(res.user.clone(), res.token);

        Ok(res.user)
    }

    /// Ends the session on the content service and locally. The local
    /// session is cleared even when the content service cannot be reached.
    pub async fn logout(&self) -> Result<(), Error> {
        self.begin();
        let result = if self.store.is_authenticated() {
            self.api.logout().await
        } else {
            Ok(())
        };
        self.store.logout();

        match result {
            Err(Error::Unauthorized) => self.finish(Ok(())),
            result => self.finish(result),
        }
    }

    pub async fn current_user(&self) -> Result<User, Error> {
        let user = self.api.current_user().await?;
        self.store.set_user(user.clone());

        Ok(user)
    }
}
