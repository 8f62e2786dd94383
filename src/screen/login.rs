use thiserror::Error;

use crate::api::ApiClient;
use crate::api::models::{LoginRequest, LoginResponse};
use crate::error::ApiError;
use crate::screen::{Route, ScreenController, ScreenState};
use crate::utils::is_valid_email;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Please enter your email")]
    MissingEmail,
    #[error("Please enter your password")]
    MissingPassword,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct LoginScreen {
    client: ApiClient,
    state: ScreenController<LoginResponse, LoginError>,
}

impl LoginScreen {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: ScreenController::new(),
        }
    }

    pub fn state(&self) -> ScreenState<LoginResponse, LoginError> {
        self.state.state()
    }

    pub fn controller(&self) -> &ScreenController<LoginResponse, LoginError> {
        &self.state
    }

    /// Validates the form, signs in and routes to the map.
    ///
    /// Input problems are reported without contacting the backend. `None`
    /// means a later submit superseded this one.
    pub async fn submit(&self, email: &str, password: &str) -> Option<Result<Route, LoginError>> {
        if let Err(err) = validate(email, password) {
            self.state.fail(err.clone());
            return Some(Err(err));
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let outcome = self
            .state
            .load(async {
                self.client
                    .login(&request)
                    .await
                    .into_result()
                    .map_err(LoginError::from)
            })
            .await?;

        Some(outcome.map(|_| Route::Map { focus: None }))
    }
}

fn validate(email: &str, password: &str) -> Result<(), LoginError> {
    if email.trim().is_empty() {
        return Err(LoginError::MissingEmail);
    }
    if password.trim().is_empty() {
        return Err(LoginError::MissingPassword);
    }
    if !is_valid_email(email) {
        return Err(LoginError::InvalidEmail);
    }
    Ok(())
}
