mod ebook;

pub use ebook::{ContentLocation, Ebook};
