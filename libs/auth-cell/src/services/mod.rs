pub mod session;
pub mod role;

pub use session::{AuthService, SessionSubscription};
pub use role::RoleService;
