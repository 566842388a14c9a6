use crate::ast::Node;

pub(crate) const BLOCK_START: &str = "{%";
pub(crate) const BLOCK_END: &str = "%}";
pub(crate) const EXPR_START: &str = "{{";
pub(crate) const EXPR_END: &str = "}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagKind {
    Block, // {% ... %}
    Expr,  // {{ ... }}
}

impl TagKind {
    pub(crate) fn closer(self) -> &'static str {
        match self {
            TagKind::Block => BLOCK_END,
            TagKind::Expr => EXPR_END,
        }
    }
}

/// Find the next tag opener in `rest`, returning its relative offset.
///
/// A block opener wins over an expression opener at the same offset.
pub(crate) fn next_tag(rest: &str) -> Option<(usize, TagKind)> {
    let block = rest.find(BLOCK_START).map(|idx| (idx, TagKind::Block));
    let expr = rest.find(EXPR_START).map(|idx| (idx, TagKind::Expr));

    match (block, expr) {
        (Some(b), Some(e)) if e.0 < b.0 => Some(e),
        (Some(b), _) => Some(b),
        (None, e) => e,
    }
}

/// Split plain text into alternating [`Node::Whitespace`] and [`Node::Text`] runs.
///
/// Concatenating the returned runs yields `text` again. Empty input yields no nodes.
pub fn tokenize_text(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut chars = text.char_indices();

    let Some((_, first)) = chars.next() else {
        return nodes;
    };

    let mut in_whitespace = first.is_whitespace();
    let mut start = 0;

    for (idx, ch) in chars {
        if ch.is_whitespace() != in_whitespace {
            nodes.push(run(&text[start..idx], in_whitespace));
            start = idx;
            in_whitespace = !in_whitespace;
        }
    }
    nodes.push(run(&text[start..], in_whitespace));

    nodes
}

fn run(slice: &str, whitespace: bool) -> Node {
    if whitespace {
        Node::Whitespace(slice.to_string())
    } else {
        Node::Text(slice.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_nothing() {
        assert!(tokenize_text("").is_empty());
    }

    #[test]
    fn alternates_whitespace_and_text() {
        let nodes = tokenize_text("  <div>\n\tHello world ");
        assert_eq!(
            nodes,
            vec![
                Node::Whitespace("  ".into()),
                Node::Text("<div>".into()),
                Node::Whitespace("\n\t".into()),
                Node::Text("Hello".into()),
                Node::Whitespace(" ".into()),
                Node::Text("world".into()),
                Node::Whitespace(" ".into()),
            ]
        );
    }

    #[test]
    fn whitespace_classification_is_unicode_aware() {
        // U+3000 IDEOGRAPHIC SPACE and U+00A0 NO-BREAK SPACE
        let nodes = tokenize_text("こんにちは\u{3000}\u{a0}世界");
        assert_eq!(
            nodes,
            vec![
                Node::Text("こんにちは".into()),
                Node::Whitespace("\u{3000}\u{a0}".into()),
                Node::Text("世界".into()),
            ]
        );
    }

    #[test]
    fn single_class_input_is_one_node() {
        assert_eq!(tokenize_text("abc"), vec![Node::Text("abc".into())]);
        assert_eq!(tokenize_text("\n\n"), vec![Node::Whitespace("\n\n".into())]);
    }

    #[test]
    fn next_tag_picks_earliest_opener() {
        assert_eq!(next_tag("a {{ x }} {% y %}"), Some((2, TagKind::Expr)));
        assert_eq!(next_tag("a {% y %} {{ x }}"), Some((2, TagKind::Block)));
        assert_eq!(next_tag("plain text"), None);
        assert_eq!(next_tag("only {% block"), Some((5, TagKind::Block)));
    }
}
