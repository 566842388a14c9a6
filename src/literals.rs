//! Small grammars for tag bodies that carry literals: `types` declarations and
//! the two `sw_extends` forms.

use crate::ast::{Extends, Types};
use crate::error::ParseError;

const TEMPLATE_KEY: &str = "template:";
const SCOPES_KEY: &str = "scopes:";

/// Trim any surrounding single or double quotes.
pub(crate) fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '\'' || c == '"')
}

/// Remove exactly one matching pair of surrounding quotes, if present.
fn unquote_pair(s: &str) -> &str {
    for quote in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Split on `sep`, trim each piece and drop empty ones.
pub(crate) fn split_and_trim(s: &str, sep: char) -> Vec<String> {
    s.split(sep)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the body of `{% types ... %}`, e.g. `score:'number' label:"string"`.
pub(crate) fn parse_types(body: &str) -> Result<Types, ParseError> {
    if body.trim().is_empty() {
        return Err(ParseError::NoTypesProvided);
    }

    let mut types = Types::default();
    for token in body.split_whitespace() {
        let invalid = || ParseError::InvalidTypesFormat {
            token: token.to_string(),
        };

        if token.matches(':').count() != 1 {
            return Err(invalid());
        }
        let (key, value) = token.split_once(':').ok_or_else(invalid)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(invalid());
        }

        let value = unquote_pair(value.trim());
        types.types.insert(key.to_string(), format!("'{value}'"));
    }

    Ok(types)
}

/// Parse everything after the `sw_extends` keyword.
pub(crate) fn parse_extends(args: &str) -> Result<Extends, ParseError> {
    let args = args.trim();

    if args.starts_with('{') {
        let end = args.rfind('}').ok_or(ParseError::MismatchedExtendsBraces)?;
        return parse_extends_literal(args[1..end].trim());
    }

    let path = args
        .split_whitespace()
        .next()
        .ok_or(ParseError::MissingExtendsTemplate)?;

    Ok(Extends {
        template: strip_quotes(path).to_string(),
        scopes: Vec::new(),
    })
}

/// Parse the object literal of `sw_extends { template: '...', scopes: [...] }`.
fn parse_extends_literal(object: &str) -> Result<Extends, ParseError> {
    let template_at = object
        .find(TEMPLATE_KEY)
        .ok_or(ParseError::MissingTemplateKey)?;
    let rest = &object[template_at + TEMPLATE_KEY.len()..];
    let value = match rest.find(',') {
        Some(comma) => &rest[..comma],
        None => rest,
    };
    let template = strip_quotes(value.trim()).to_string();

    let mut scopes = Vec::new();
    if let Some(scopes_at) = object.find(SCOPES_KEY) {
        let rest = object[scopes_at + SCOPES_KEY.len()..].trim_start();
        if let Some(array) = rest.strip_prefix('[') {
            let close = array.find(']').ok_or(ParseError::MissingScopesBracket)?;
            scopes = array[..close]
                .split(',')
                .map(|scope| strip_quotes(scope.trim()))
                .filter(|scope| !scope.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    Ok(Extends { template, scopes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_normalize_quotes() {
        let types = parse_types(r#"score:'number' label:"string" flag:bool"#).unwrap();
        assert_eq!(types.types.get("score").map(String::as_str), Some("'number'"));
        assert_eq!(types.types.get("label").map(String::as_str), Some("'string'"));
        assert_eq!(types.types.get("flag").map(String::as_str), Some("'bool'"));
    }

    #[test]
    fn types_reject_blank_and_malformed() {
        assert_eq!(parse_types("   "), Err(ParseError::NoTypesProvided));
        assert_eq!(
            parse_types("score"),
            Err(ParseError::InvalidTypesFormat {
                token: "score".into()
            })
        );
        assert!(matches!(
            parse_types("a:b:c"),
            Err(ParseError::InvalidTypesFormat { .. })
        ));
        assert!(matches!(
            parse_types(":'number'"),
            Err(ParseError::InvalidTypesFormat { .. })
        ));
    }

    #[test]
    fn extends_simple_form() {
        let extends = parse_extends(" '@Storefront/storefront/base.html.twig' ").unwrap();
        assert_eq!(extends.template, "@Storefront/storefront/base.html.twig");
        assert!(extends.scopes.is_empty());

        let double = parse_extends(r#""foo.twig""#).unwrap();
        assert_eq!(double.template, "foo.twig");
    }

    #[test]
    fn extends_simple_form_requires_path() {
        assert_eq!(parse_extends("  "), Err(ParseError::MissingExtendsTemplate));
    }

    #[test]
    fn extends_literal_form() {
        let extends =
            parse_extends("{ template: 'a/b.html.twig', scopes: ['default', \"subscription\"] }")
                .unwrap();
        assert_eq!(extends.template, "a/b.html.twig");
        assert_eq!(extends.scopes, vec!["default", "subscription"]);
    }

    #[test]
    fn extends_literal_without_scopes() {
        let extends = parse_extends("{ template: 'a.twig' }").unwrap();
        assert_eq!(extends.template, "a.twig");
        assert!(extends.scopes.is_empty());
    }

    #[test]
    fn extends_literal_errors() {
        assert_eq!(
            parse_extends("{ scopes: ['default'] }"),
            Err(ParseError::MissingTemplateKey)
        );
        assert_eq!(
            parse_extends("{ template: 'a.twig', scopes: ['default' }"),
            Err(ParseError::MissingScopesBracket)
        );
        assert_eq!(
            parse_extends("{ template: 'a.twig'"),
            Err(ParseError::MismatchedExtendsBraces)
        );
    }

    #[test]
    fn split_and_trim_drops_empty_pieces() {
        assert_eq!(split_and_trim(" a , b ,, ", ','), vec!["a", "b"]);
        assert!(split_and_trim("", ',').is_empty());
    }
}
