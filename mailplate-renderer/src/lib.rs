//! # mailplate-renderer
//!
//! Validates render requests and substitutes fragments into stored templates.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mailplate_core::{MemoryStore, Placeholder, Template};
//! use mailplate_renderer::{EmailRequest, RenderEngine};
//!
//! let store = MemoryStore::with_templates([Template::new("Default", "%%EMAIL_BODY%%")]);
//! let request = EmailRequest::new("someone@example.com", "Hi")
//!     .fragment(Placeholder::Body, "Hello");
//! if let Ok(email) = RenderEngine::default().render_request(&store, &request) {
//!     println!("{}", email.html);
//! }
//! ```

pub mod engine;
pub mod validate;

pub use engine::{EmailRequest, RenderEngine, RenderedEmail};
