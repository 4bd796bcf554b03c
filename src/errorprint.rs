use globber::{MatchError, PatternError, Span};

fn extract_error_range(e: &anyhow::Error) -> Option<Span> {
    if let Some(pattern_err) = e.downcast_ref::<PatternError>() {
        pattern_err.span()
    } else if let Some(MatchError::Pattern(pattern_err)) = e.downcast_ref::<MatchError>() {
        pattern_err.span()
    } else {
        None
    }
}

/// Builds the line that underlines `span` when printed beneath `pattern`.
/// Spans are byte offsets, so columns are counted in chars.
pub fn indicator(pattern: &str, span: Span) -> String {
    let start = span.start.min(pattern.len());
    let end = span.end.clamp(start, pattern.len());
    let (leading, marked) = match (pattern.get(..start), pattern.get(start..end)) {
        (Some(leading), Some(marked)) => (leading, marked),
        _ => return String::new(),
    };

    let mut indicator = " ".repeat(leading.chars().count());
    indicator.push_str(&"^".repeat(marked.chars().count().max(1)));
    indicator
}

pub fn print_error(e: &anyhow::Error, pattern: &str) {
    for item in e.chain() {
        eprintln!("fileglob: {}", item);
    }
    if let Some(span) = extract_error_range(e) {
        eprintln!("{}", pattern);
        eprintln!("\x1b[1m{}\x1b[0m", indicator(pattern, span));
    }
}
