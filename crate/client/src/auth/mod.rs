mod service_account;
mod token;

pub use service_account::ServiceAccount;
pub(crate) use token::resolve_access_token;
pub use token::{CLOUD_PLATFORM_SCOPE, create_jwt, retrieve_token};
