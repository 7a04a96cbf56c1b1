mod session;

pub use session::{AuthSession, TokenType};
