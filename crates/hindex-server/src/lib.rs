// Static file server for the web assets
// Serves files under one root, refuses anything that looks like .git

pub mod files;
pub mod server;

pub use files::{content_type_for, has_git_segment, is_hidden_git_path, Resolution, StaticFiles};
pub use server::{router, serve};
