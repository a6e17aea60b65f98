pub mod word_ctx;
pub mod word_flow;

pub use word_ctx::WordCtx;
pub use word_flow::{assemble_card, ProcessResult, WordFlow};
