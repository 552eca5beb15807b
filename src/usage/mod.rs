pub mod pricing;
pub mod project_path;
pub mod scanner;
pub mod sessions;
pub mod types;
