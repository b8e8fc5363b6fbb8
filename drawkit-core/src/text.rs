//! Greedy word wrapping.

/// Split `text` into lines no wider than `max_width`.
///
/// Words are separated by single spaces. A line is broken when appending the
/// next word would exceed `max_width`; a single word wider than `max_width`
/// gets a line of its own. `measure` returns the rendered width of a string and
/// may fail, in which case the error is returned unchanged.
///
/// # Errors
///
/// Returns the first error produced by `measure`.
pub fn wrap_words<E, F>(text: &str, max_width: f64, mut measure: F) -> Result<Vec<String>, E>
where
    F: FnMut(&str) -> Result<f64, E>,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split(' ') {
        let candidate = format!("{line}{word} ");
        if !line.is_empty() && measure(&candidate)? > max_width {
            lines.push(line.trim_end().to_string());
            line = format!("{word} ");
        } else {
            line = candidate;
        }
    }

    lines.push(line.trim_end().to_string());
    Ok(lines)
}
