// Adapters layer: in-memory implementations of the identity and user-store ports.

pub mod memory_users;
pub mod password;
pub mod token_auth;
