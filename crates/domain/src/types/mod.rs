//! Domain types and models

pub mod page;
pub mod scope;
pub mod session;

pub use page::{Collected, Page, PageQuery, Params};
pub use scope::{Permission, Scope};
pub use session::{Expiry, Session, TokenResponse};
