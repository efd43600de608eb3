pub mod claims;
pub mod dto;
pub mod error;
pub mod state;

pub use claims::{Claims, ClaimsDecoder, Role};
pub use dto::{LoginRequest, RefreshTokenRequest, RefreshTokenResponse, RegisterRequest, TokenPair};
pub use error::{DecodeError, RefreshError};
pub use state::{AuthState, AuthStateProvider};
