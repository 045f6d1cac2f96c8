//! Session collaborator: remembered login and store credentials.

pub mod manager;
pub mod store;

pub use manager::{
    stored_credentials, Session, SessionManager, API_KEY_KEY, SHEET_ID_KEY, USER_KEY,
    USER_TOKEN_KEY,
};
pub use store::{JsonFileSessionStore, MemorySessionStore, SessionStore};
