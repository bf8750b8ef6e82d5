pub mod course_dto;

pub use course_dto::{CourseDto, CourseListResponseDto, CourseQueryDto};
