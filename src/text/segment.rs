//! Alphanumeric segmenter: classifies runs of a string as alpha/numeric/other
//! and exposes the `alphaOnly`/`numericOnly` projections the scorer uses for
//! mixed identifiers like `servicehandler14568`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Alpha,
    Numeric,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: RunKind,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

fn classify(c: char) -> RunKind {
    if c.is_alphabetic() {
        RunKind::Alpha
    } else if c.is_numeric() {
        RunKind::Numeric
    } else {
        RunKind::Other
    }
}

/// Splits `s` into contiguous runs of one character class.
pub fn segment(s: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current_kind: Option<RunKind> = None;
    let mut current = String::new();
    let mut start = 0;

    for (idx, c) in s.char_indices() {
        let kind = classify(c);
        match current_kind {
            Some(k) if k == kind => current.push(c),
            Some(k) => {
                segments.push(Segment {
                    kind: k,
                    value: std::mem::take(&mut current),
                    start,
                    end: idx,
                });
                current.push(c);
                current_kind = Some(kind);
                start = idx;
            }
            None => {
                current_kind = Some(kind);
                current.push(c);
                start = idx;
            }
        }
    }
    if let Some(k) = current_kind {
        segments.push(Segment {
            kind: k,
            value: current,
            start,
            end: s.len(),
        });
    }
    segments
}

/// Concatenation of every alpha run.
pub fn alpha_only(s: &str) -> String {
    segment(s)
        .into_iter()
        .filter(|seg| seg.kind == RunKind::Alpha)
        .map(|seg| seg.value)
        .collect()
}

/// Concatenation of every numeric run.
pub fn numeric_only(s: &str) -> String {
    segment(s)
        .into_iter()
        .filter(|seg| seg.kind == RunKind::Numeric)
        .map(|seg| seg.value)
        .collect()
}

/// True when `s` contains at least one alpha run and at least one numeric
/// run — the shape the alphanumeric scoring override applies to.
pub fn is_mixed_alphanumeric(s: &str) -> bool {
    let segs = segment(s);
    segs.iter().any(|seg| seg.kind == RunKind::Alpha) && segs.iter().any(|seg| seg.kind == RunKind::Numeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_identifier_into_runs() {
        let segs = segment("servicehandler14568");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].kind, RunKind::Alpha);
        assert_eq!(segs[0].value, "servicehandler");
        assert_eq!(segs[1].kind, RunKind::Numeric);
        assert_eq!(segs[1].value, "14568");
    }

    #[test]
    fn projections_match_runs() {
        assert_eq!(alpha_only("servicehandler14568"), "servicehandler");
        assert_eq!(numeric_only("servicehandler14568"), "14568");
    }

    #[test]
    fn handles_other_class_and_interleaving() {
        let segs = segment("a1-b2");
        let kinds: Vec<RunKind> = segs.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RunKind::Alpha,
                RunKind::Numeric,
                RunKind::Other,
                RunKind::Alpha,
                RunKind::Numeric
            ]
        );
    }

    #[test]
    fn detects_mixed_alphanumeric() {
        assert!(is_mixed_alphanumeric("datamanager3561"));
        assert!(!is_mixed_alphanumeric("datamanager"));
        assert!(!is_mixed_alphanumeric("3561"));
    }

    #[test]
    fn empty_string_has_no_segments() {
        assert!(segment("").is_empty());
    }
}
