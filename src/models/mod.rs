//! Data models
//!
//! This module contains all data structures used throughout the Tinta blog engine.
//! Models represent:
//! - Database entities (Post, ContactMessage, AdminSession)
//! - Input types and pagination view models

mod contact;
mod post;
mod session;

pub use contact::{ContactInput, ContactMessage};
pub use post::{CreatePostInput, PageNav, Post, PostPage, UpdatePostInput};
pub use session::AdminSession;
