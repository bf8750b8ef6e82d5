use utoipa::{Modify, OpenApi};

use crate::features::chat::dtos as chat_dtos;
use crate::features::chat::handlers as chat_handlers;
use crate::features::courses::{dtos as courses_dtos, handlers as courses_handlers};
use crate::features::ebooks::{dtos as ebooks_dtos, handlers as ebooks_handlers};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // AI chat relay
        chat_handlers::chat_handler::relay_chat,
        // Course recommendations
        courses_handlers::course_handler::recommend_courses,
        // E-book generation
        ebooks_handlers::ebook_handler::generate_ebook,
    ),
    components(
        schemas(
            // Chat
            chat_dtos::ChatMessageDto,
            chat_dtos::ChatRequestDto,
            // Courses
            courses_dtos::CourseQueryDto,
            courses_dtos::CourseDto,
            courses_dtos::CourseListResponseDto,
            // E-books
            ebooks_dtos::GenerateEbookDto,
            ebooks_dtos::GeneratedEbookDto,
            ebooks_dtos::GenerateEbookResponseDto,
            ApiResponse<String>,
        )
    ),
    tags(
        (name = "chat", description = "AI chat relay for newcomer assistants"),
        (name = "courses", description = "Course recommendations for newcomers (public)"),
        (name = "ebooks", description = "AI-generated e-book pipeline"),
    ),
    info(
        title = "NorthStart API",
        version = "0.1.0",
        description = "API documentation for NorthStart",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
