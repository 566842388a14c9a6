/// A fatal template parse error.
///
/// Only malformed syntax the parser knows about ends up here. Unknown tags and
/// orphaned end tags are kept as literal text instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A `{%` without a closing `%}`. `offset` is the byte position of the opener.
    #[error("unclosed block tag at byte {offset}")]
    UnclosedBlockTag { offset: usize },

    /// A `{{` without a closing `}}`.
    #[error("unclosed expression tag at byte {offset}")]
    UnclosedExpressionTag { offset: usize },

    #[error("sw_extends literal missing 'template' key")]
    MissingTemplateKey,

    #[error("invalid scopes array: missing ']'")]
    MissingScopesBracket,

    #[error("invalid sw_extends syntax: missing or mismatched braces")]
    MismatchedExtendsBraces,

    #[error("invalid sw_extends tag: missing template path")]
    MissingExtendsTemplate,

    #[error("invalid types format: {token:?}")]
    InvalidTypesFormat { token: String },

    #[error("no types provided")]
    NoTypesProvided,
}
