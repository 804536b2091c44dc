pub mod attachment;
pub mod auth;
pub mod count;
pub mod exists;
pub mod list;
pub mod purge;
pub mod send;
pub mod text;
