pub use super::author::Entity as Author;
pub use super::author_books::Entity as AuthorBooks;
pub use super::book::Entity as Book;
pub use super::publisher::Entity as Publisher;
