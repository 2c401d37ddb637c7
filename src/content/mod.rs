//! Content module - post models and pure content logic

mod post;
pub mod reading_time;

pub use post::{BodyText, ContentSection, PostBanner, PostDetail, PostPagination, PostSummary};
