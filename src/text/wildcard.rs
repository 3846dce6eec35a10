//! Translates a `*`-wildcard exact-search query into a whole-string,
//! case-insensitive regex anchored at both ends.

use regex::Regex;

/// True when `query` contains the wildcard character.
pub fn is_wildcard_query(query: &str) -> bool {
    query.contains('*')
}

/// Compiles `query` (containing `*` runs matching any run of characters)
/// into an anchored, case-insensitive regex.
pub fn compile_wildcard(query: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::with_capacity(query.len() + 8);
    pattern.push_str("(?i)^");
    for part in query.split('*') {
        pattern.push_str(&regex::escape(part));
        pattern.push_str(".*");
    }
    // Drop the trailing ".*" added by the final split segment, then re-anchor.
    pattern.truncate(pattern.len() - 2);
    pattern.push('$');
    Regex::new(&pattern)
}
