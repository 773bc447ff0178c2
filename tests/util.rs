#[path = "util/file_status.rs"]
mod file_status;
