pub mod client;
pub mod exchange;
pub mod refresh;
pub mod request;

pub use client::HttpClient;
pub use exchange::{HttpRefreshExchange, RefreshExchange};
pub use refresh::{RefreshCoordinator, RefreshLease, RefreshOutcome, RefreshTicket};
pub use request::{ApiRequest, ApiResponse, AUTH_HEADER, X_REQUEST_ID};
