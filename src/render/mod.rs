//! Output rendering (text, JSONL)

pub mod jsonl;
pub mod text;

pub use jsonl::render_jsonl;
pub use text::render_text;
