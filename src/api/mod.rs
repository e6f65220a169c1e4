// Serializable views of the model for JSON consumers.

pub mod dto;

pub use dto::GraphDto;
