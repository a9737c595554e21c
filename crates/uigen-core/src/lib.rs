pub mod config;
pub mod error;
pub mod session;
pub mod tool_badge;

pub use config::{AppConfig, Environment};
pub use error::UigenError;
pub use session::{CookieJar, SessionIssuer, SessionPayload};
pub use tool_badge::{badge_for, resolve, ToolBadge, ToolInvocation};
