pub mod cookie;
pub mod session;

pub use cookie::{build_clear_cookie, build_session_cookie, session_token, CookieOptions, SESSION_COOKIE};
pub use session::{issue, session_ttl, verify, AuthError, Claims, SESSION_TTL_HOURS};
