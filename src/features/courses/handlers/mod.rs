pub mod course_handler;
