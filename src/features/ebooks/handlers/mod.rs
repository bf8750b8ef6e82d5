pub mod ebook_handler;
