pub mod id;
mod text_enum;

pub use id::*;
pub(crate) use text_enum::pg_text_enum;
