pub mod attachments;
pub mod encoding;
pub mod mime;
