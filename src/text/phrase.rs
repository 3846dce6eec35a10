//! Splits a query into quoted phrases and bare terms, the way
//! `preprocess_query` in the teacher's `search/query.rs` splits on whitespace
//! before the ranking stage — except this also recognizes `"..."` spans.

/// Result of splitting a raw query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Quoted phrases, in the order they appeared, with quotes stripped.
    pub phrases: Vec<String>,
    /// Bare (unquoted) terms, in the order they appeared.
    pub terms: Vec<String>,
}

impl ParsedQuery {
    pub fn has_phrases(&self) -> bool {
        !self.phrases.is_empty()
    }
}

/// Parses `query` into quoted phrases and bare terms. An unterminated quote
/// consumes the rest of the string as a phrase.
pub fn parse_phrases(query: &str) -> ParsedQuery {
    let mut phrases = Vec::new();
    let mut terms = Vec::new();
    let mut buf = String::new();
    let mut chars = query.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c == '"' {
            chars.next();
            let mut phrase = String::new();
            for c2 in chars.by_ref() {
                if c2 == '"' {
                    break;
                }
                phrase.push(c2);
            }
            let trimmed = phrase.trim();
            if !trimmed.is_empty() {
                phrases.push(trimmed.to_string());
            }
        } else if c.is_whitespace() {
            chars.next();
            if !buf.is_empty() {
                terms.push(std::mem::take(&mut buf));
            }
        } else {
            buf.push(c);
            chars.next();
        }
    }
    if !buf.is_empty() {
        terms.push(buf);
    }

    ParsedQuery { phrases, terms }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_one_phrase_and_one_term() {
        let parsed = parse_phrases("\"new york\" pizza");
        assert_eq!(parsed.phrases, vec!["new york"]);
        assert_eq!(parsed.terms, vec!["pizza"]);
    }

    #[test]
    fn plain_query_has_no_phrases() {
        let parsed = parse_phrases("apple banana");
        assert!(parsed.phrases.is_empty());
        assert_eq!(parsed.terms, vec!["apple", "banana"]);
    }

    #[test]
    fn multiple_phrases_and_terms_interleave() {
        let parsed = parse_phrases("a \"b c\" d \"e f\"");
        assert_eq!(parsed.terms, vec!["a", "d"]);
        assert_eq!(parsed.phrases, vec!["b c", "e f"]);
    }

    #[test]
    fn unterminated_quote_consumes_rest_of_string() {
        let parsed = parse_phrases("\"unterminated phrase");
        assert_eq!(parsed.phrases, vec!["unterminated phrase"]);
    }

    #[test]
    fn empty_query_parses_to_nothing() {
        assert_eq!(parse_phrases(""), ParsedQuery::default());
    }
}
