use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;

use crate::error::ClientError;

pub const TITLE_MAX_LEN: usize = 255;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const CATEGORY_NAME_MAX_LEN: usize = 100;
pub const OTP_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub is_predefined: bool,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreateOrUpdate {
    pub name: String,
}

/// A reminder as the server returns it.
///
/// `category` is only present when the server embeds the expanded category;
/// `category_id` is always set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingItem {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub category_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub reminder_date: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_done: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingItemCreate {
    pub title: String,
    pub category_id: i64,
    pub reminder_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update. Absent fields are left untouched by the server, so an
/// empty value serializes to `{}` and changes nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingItemRecreate {
    pub reminder_date: String,
}

/// One page of a list resource. `pages` is taken as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub pages: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub category_id: Option<i64>,
    pub is_done: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtp {
    pub email: String,
    pub otp_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub created_at: String,
}

/// Generic server acknowledgement, e.g. `{"message": "OTP sent"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timezone: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl TrackingItem {
    pub fn reminder_date(&self) -> Result<Date, ClientError> {
        parse_date(&self.reminder_date)
    }
}

impl TrackingItemCreate {
    pub fn validate(&self) -> Result<(), ClientError> {
        validate_title(&self.title)?;
        validate_category_id(self.category_id)?;
        parse_date(&self.reminder_date)?;
        if let Some(ref description) = self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

impl TrackingItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category_id.is_none()
            && self.reminder_date.is_none()
            && self.description.is_none()
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if let Some(ref title) = self.title {
            validate_title(title)?;
        }
        if let Some(category_id) = self.category_id {
            validate_category_id(category_id)?;
        }
        if let Some(ref date) = self.reminder_date {
            parse_date(date)?;
        }
        if let Some(ref description) = self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

impl TrackingItemRecreate {
    pub fn validate(&self) -> Result<(), ClientError> {
        parse_date(&self.reminder_date).map(|_| ())
    }
}

impl CategoryCreateOrUpdate {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.chars().count() > CATEGORY_NAME_MAX_LEN {
            return Err(ClientError::Validation("Category name is too long"));
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation("Category name cannot be empty"));
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || c == ' ' || c == '-' || c == '_';
        if !name.chars().all(allowed) {
            return Err(ClientError::Validation(
                "Category can contain alphanumeric characters only",
            ));
        }
        Ok(())
    }
}

impl EmailRequest {
    pub fn validate(&self) -> Result<(), ClientError> {
        validate_email(&self.email)
    }
}

impl VerifyOtp {
    pub fn validate(&self) -> Result<(), ClientError> {
        validate_email(&self.email)?;
        if self.otp_code.len() != OTP_LENGTH || !self.otp_code.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ClientError::Validation("Invalid OTP"));
        }
        Ok(())
    }
}

impl<T> PaginatedResponse<T> {
    /// Page count implied by `total` and `page_size`. Only used to flag
    /// disagreement with the server; `pages` stays authoritative.
    pub fn computed_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        u32::try_from(self.total.div_ceil(u64::from(self.page_size))).unwrap_or(u32::MAX)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn check_page_size(&self) -> Result<(), ClientError> {
        if self.items.len() > self.page_size as usize {
            return Err(ClientError::InvalidResponse(format!(
                "page holds {} items but page_size is {}",
                self.items.len(),
                self.page_size
            )));
        }
        Ok(())
    }
}

impl ItemQuery {
    pub fn page(page: u32) -> Self {
        ItemQuery {
            page: Some(page),
            ..Default::default()
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size", page_size.to_string()));
        }
        if let Some(category_id) = self.category_id {
            pairs.push(("category_id", category_id.to_string()));
        }
        if let Some(is_done) = self.is_done {
            pairs.push(("is_done", is_done.to_string()));
        }
        pairs
    }
}

pub fn parse_date(value: &str) -> Result<Date, ClientError> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|_| ClientError::Validation("Reminder date must be YYYY-MM-DD"))
}

// Lengths count the raw value, as the server checks them before stripping.
fn validate_title(title: &str) -> Result<(), ClientError> {
    if title.trim().is_empty() {
        return Err(ClientError::Validation("Title cannot be empty"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ClientError::Validation("Title is too long"));
    }
    check_markup(title)
}

fn validate_description(description: &str) -> Result<(), ClientError> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(ClientError::Validation("Description is too long"));
    }
    check_markup(description)
}

fn validate_category_id(category_id: i64) -> Result<(), ClientError> {
    if category_id <= 0 {
        return Err(ClientError::Validation("Category id must be positive"));
    }
    Ok(())
}

// Same rule the server applies; rejecting early saves a round trip.
fn check_markup(value: &str) -> Result<(), ClientError> {
    if value.contains('<') || value.contains('>') || value.to_lowercase().contains("script") {
        return Err(ClientError::Validation("Invalid characters detected"));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ClientError> {
    let mut parts = email.trim().splitn(2, '@');
    match (parts.next(), parts.next()) {
        (Some(local), Some(domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(ClientError::Validation("Invalid email address")),
    }
}
