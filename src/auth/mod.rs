pub mod middleware;
pub mod password;
pub mod roles;
pub mod session;
pub mod validate;
