pub mod book_service;
pub mod lending_repository;
pub mod reader_service;

pub use book_service::*;
pub use lending_repository::*;
pub use reader_service::*;
