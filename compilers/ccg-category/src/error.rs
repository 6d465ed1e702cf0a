use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("malformed category '{input}'")]
    Syntax { input: String },

    #[error("unexpected '{rest}' after category in '{input}'")]
    Trailing { input: String, rest: String },
}
