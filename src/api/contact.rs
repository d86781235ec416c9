//! Contact endpoints
//!
//! Handles HTTP requests for the public contact form:
//! - GET /contact - form view model plus the one-shot flash banner
//! - POST /contact - submission
//!
//! The flash banner is carried in a short-lived cookie holding only a
//! level token; the message text lives server-side. Reading the page
//! clears the cookie, so each banner is shown exactly once.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::models::ContactInput;
use crate::services::ContactServiceError;

const FLASH_COOKIE: &str = "flash";

/// Flash banner levels carried through the one-shot cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    /// Message stored and notification delivered
    Success,
    /// Message stored but the notification email did not go out
    Warning,
    /// This email address already submitted a message
    Duplicate,
}

impl FlashLevel {
    fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Warning => "warning",
            FlashLevel::Duplicate => "duplicate",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        match s {
            "success" => Some(FlashLevel::Success),
            "warning" => Some(FlashLevel::Warning),
            "duplicate" => Some(FlashLevel::Duplicate),
            _ => None,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            FlashLevel::Success => {
                "Thanks for submitting your details. We will get back to you soon."
            }
            FlashLevel::Warning => {
                "Your message was received, but the notification email could not be sent."
            }
            FlashLevel::Duplicate => "A message from this email address was already submitted.",
        }
    }
}

/// One-shot banner shown on the next contact-page render
#[derive(Debug, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// View model for the contact page
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactPage {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

/// Form body for a contact submission
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

/// GET /contact - contact page with the pending flash banner, if any
pub async fn contact_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let flash = read_flash(&headers).map(|level| Flash {
        level,
        message: level.message().to_string(),
    });

    let mut response_headers = HeaderMap::new();
    if flash.is_some() {
        // Showing the banner consumes it
        response_headers.insert(
            header::SET_COOKIE,
            HeaderValue::from_str(&clear_flash_cookie())
                .map_err(|e| ApiError::internal_error(format!("Invalid cookie: {}", e)))?,
        );
    }

    Ok((
        response_headers,
        Json(ContactPage {
            title: state.site.title.clone(),
            flash,
        }),
    ))
}

/// POST /contact - persist the submission and notify the site owner
///
/// The stored message always survives a failed notification; the flash
/// level distinguishes the two outcomes. A repeated email address gets
/// its own user-visible banner instead of a fault.
pub async fn contact_submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .contact_service
        .submit(ContactInput {
            name: form.name,
            email: form.email,
            phone: form.phone,
            message: form.message,
        })
        .await;

    let level = match result {
        Ok(receipt) if receipt.mail_delivered => FlashLevel::Success,
        Ok(_) => FlashLevel::Warning,
        Err(ContactServiceError::DuplicateEmail(_)) => FlashLevel::Duplicate,
        Err(ContactServiceError::ValidationError(msg)) => {
            return Err(ApiError::validation_error(msg));
        }
        Err(e) => return Err(ApiError::internal_error(e.to_string())),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&flash_cookie(level))
            .map_err(|e| ApiError::internal_error(format!("Invalid cookie: {}", e)))?,
    );

    Ok((headers, Redirect::to("/contact")))
}

fn read_flash(headers: &HeaderMap) -> Option<FlashLevel> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix("flash=") {
            return FlashLevel::from_str(value);
        }
    }
    None
}

fn flash_cookie(level: FlashLevel) -> String {
    format!(
        "{}={}; Path=/contact; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        level.as_str()
    )
}

fn clear_flash_cookie() -> String {
    format!("{}=; Path=/contact; HttpOnly; SameSite=Lax; Max-Age=0", FLASH_COOKIE)
}
