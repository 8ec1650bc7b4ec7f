use reqwest::Method;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::models::{EmailRequest, MessageResponse, TokenResponse, UserResponse, VerifyOtp};

impl ApiClient {
    pub async fn request_otp(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let req = EmailRequest {
            email: email.trim().to_string(),
        };
        req.validate()?;
        let resp = self
            .send_json(Method::POST, "/auth/request-otp", &req)
            .await?;
        info!("Requested one-time passcode");
        Ok(resp)
    }

    /// Exchanges the passcode for an access token and stores it, so the
    /// next request already carries it.
    pub async fn verify_otp(&self, email: &str, otp_code: &str) -> Result<TokenResponse, ClientError> {
        let req = VerifyOtp {
            email: email.trim().to_string(),
            otp_code: otp_code.trim().to_string(),
        };
        req.validate()?;
        let token: TokenResponse = self.send_json(Method::POST, "/auth/verify-otp", &req).await?;
        self.token_store().set_token(&token.access_token)?;
        info!("User logged in");
        Ok(token)
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.token_store().clear()?;
        info!("User logged out");
        Ok(())
    }

    pub async fn current_user(&self) -> Result<UserResponse, ClientError> {
        self.get_json(self.url("/user/me")?).await
    }

    /// Deletes the account server-side and forgets the token.
    pub async fn delete_account(&self) -> Result<(), ClientError> {
        self.send_empty(Method::DELETE, "/user/me").await?;
        self.token_store().clear()?;
        info!("Deleted account");
        Ok(())
    }
}
