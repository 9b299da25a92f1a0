// Service exports
pub mod auth;
pub mod cache;
pub mod catalog;
pub mod matching;
pub mod postgres;
pub mod profiles;

pub use auth::{AuthError, AuthenticatedUser, Claims, JwtValidator};
pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use matching::{MatchError, MatchOutcome, MatchRepository, MatchService};
pub use postgres::{PostgresClient, PostgresError};
