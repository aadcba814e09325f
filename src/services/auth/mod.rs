pub mod context;
pub mod credential;
pub mod keyring;
pub mod signer;
pub mod user;

pub use credential::{Credential, CredentialError, decode_authorization};
pub use keyring::Keyring;
pub use signer::SignerResolver;
pub use user::{Identity, User, UserError};
