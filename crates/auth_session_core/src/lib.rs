pub mod domain;
pub mod ports;
pub mod store;

pub use domain::{AuthPayload, RegisterRequest, Session, TokenPair, User};
pub use ports::{
    AuthApiService, Clock, PortError, PortResult, SessionPersistence, TokenExpiryChecker,
    TokenParseError,
};
pub use store::{SessionStore, REFRESH_CHECK_INTERVAL_MS, REFRESH_THRESHOLD_DAYS};
