//! Request authentication
//!
//! The tracker sits behind an identity proxy; it only maps the forwarded
//! user id onto a known `User`.

mod acting_user;

pub use acting_user::acting_user_middleware;
