pub mod book_service;
pub mod lending_repository;
pub mod reader_service;

pub use book_service::BookService;
pub use lending_repository::LendingRepository;
pub use reader_service::ReaderService;
