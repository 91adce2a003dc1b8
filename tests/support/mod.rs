pub mod body;
pub mod pipeline;
