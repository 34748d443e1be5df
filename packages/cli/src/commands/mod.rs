pub mod export;
pub mod history;
pub mod summary;
pub mod upload;
