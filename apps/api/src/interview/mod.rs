pub mod conversation;
pub mod delivery;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod variants;
