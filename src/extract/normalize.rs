//! Text normalization for raw model output.
//!
//! Models wrap JSON in markdown fences, prefix it with chatter ("Sure! Here
//! is the analysis:") or trail it with sign-offs. This stage peels those
//! layers so the balancer sees text that starts at the first JSON opener.

const FENCE: &str = "```";

/// Normalize a raw model response into text more likely to be bare JSON.
///
/// Never fails; worst case returns the trimmed input.
pub fn normalize(raw: &str) -> String {
    let text = raw.trim();
    let text = strip_code_fence(text).trim();
    isolate_json_span(text).to_string()
}

/// Strip a markdown code fence, keeping only its body.
///
/// A fence is honoured only when it opens before the first JSON opener, so
/// backticks quoted inside a JSON string are left alone. A fence with no
/// closing marker (truncated output) yields everything after the opener.
fn strip_code_fence(text: &str) -> &str {
    let Some(fence) = text.find(FENCE) else {
        return text;
    };
    if let Some(opener) = text.find(|c| c == '{' || c == '[') {
        if opener < fence {
            return text;
        }
    }

    let after = &text[fence + FENCE.len()..];
    let body_start = match after.find('\n') {
        Some(nl) if is_language_tag(&after[..nl]) => nl + 1,
        // "```json{...}" on one line: skip the bare tag
        _ => after.len() - after.trim_start_matches(|c: char| c.is_ascii_alphabetic()).len(),
    };

    let body = &after[body_start..];
    match closing_fence(body) {
        Some(end) => &body[..end],
        None => body,
    }
}

/// Start of the fence that closes `body`: the first marker opening a line,
/// or a marker ending the text. Backticks quoted mid-line inside the JSON
/// don't count.
fn closing_fence(body: &str) -> Option<usize> {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_start().starts_with(FENCE) {
            return Some(offset + line.len() - line.trim_start().len());
        }
        offset += line.len();
    }
    let trimmed = body.trim_end();
    trimmed
        .ends_with(FENCE)
        .then(|| trimmed.len() - FENCE.len())
}

fn is_language_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Cut leading prose before the first JSON opener and trailing prose after
/// the value it opens.
///
/// Text that already starts with `[` keeps its array root; otherwise the
/// first `{` wins. When the opened value never closes (truncated output) the
/// tail is kept so the balancer can repair it.
fn isolate_json_span(text: &str) -> &str {
    let start = if text.starts_with('[') {
        Some(0)
    } else {
        text.find('{').or_else(|| text.find('['))
    };
    let Some(start) = start else {
        return text;
    };

    let span = &text[start..];
    match complete_value_end(span) {
        Some(end) => &span[..=end],
        None => span,
    }
}

/// Byte index of the delimiter that closes the value opened at index 0,
/// tracking string literals so braces inside strings don't count.
fn complete_value_end(span: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in span.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
