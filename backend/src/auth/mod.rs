//! Authentication module
//!
//! Bearer tokens are issued by the external auth provider. This module only
//! verifies them and extracts the user.

mod jwt;
mod middleware;

pub use jwt::{Claims, JwtService};
pub use middleware::AuthUser;
