//! Data models
//!
//! The article input record and the chat completion wire types.

pub mod article;
pub mod openai;
