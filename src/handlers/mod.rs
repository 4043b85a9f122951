pub mod access;
pub mod auth;
pub mod books;
