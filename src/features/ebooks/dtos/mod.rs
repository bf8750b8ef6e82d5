pub mod ebook_dto;

pub use ebook_dto::{GenerateEbookDto, GenerateEbookResponseDto, GeneratedEbookDto};
