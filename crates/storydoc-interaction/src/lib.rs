//! HTTP gateways for the StoryDoc generation service.

pub mod http_gateway;

pub use http_gateway::{HttpGateway, UPLOAD_FIELD_NAME};
