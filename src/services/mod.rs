//! Services layer - Business logic
//!
//! This module contains all business logic services for the Tinta blog engine.
//! Services are responsible for:
//! - Implementing business rules
//! - Coordinating between repositories and external capabilities
//! - Handling validation and error cases

pub mod auth;
pub mod contact;
pub mod notify;
pub mod post;

pub use auth::{AdminAuthService, AuthError};
pub use contact::{ContactReceipt, ContactService, ContactServiceError};
pub use notify::{
    ContactNotification, DisabledSender, NotificationSender, NotifyError, SmtpNotificationSender,
};
pub use post::{PostService, PostServiceError};
