pub mod handlers;
pub mod router;
pub mod static_files;
