//! Course recommendations for newcomer profiles.
//!
//! Proxies the external course catalog and maps results onto storefront
//! cards. The endpoint is deliberately infallible: when the catalog is down
//! or returns nothing usable, a static recommendation set is served instead.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/courses/recommendations` | No | Recommend up to six courses |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::CourseRecommendationService;
