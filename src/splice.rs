use std::ops::Range;
use std::sync::OnceLock;

use anyhow::Context as _;
use regex::Regex;

pub const ASSIGNMENT_PREFIX: &str = "const sessionizeData = ";

// Non-greedy: the object ends at the first `};` after the prefix.
const OBJECT_LITERAL_PATTERN: &str = r"(const sessionizeData = )\{[\s\S]*?\};";

static OBJECT_LITERAL: OnceLock<Regex> = OnceLock::new();

fn object_literal_pattern() -> anyhow::Result<&'static Regex> {
    if let Some(pattern) = OBJECT_LITERAL.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(OBJECT_LITERAL_PATTERN).context("compile object literal pattern")?;
    Ok(OBJECT_LITERAL.get_or_init(|| pattern))
}

/// Byte range of `const sessionizeData = {...};`, including the prefix and
/// the closing `};`.
pub fn find_object_literal(text: &str) -> anyhow::Result<Option<Range<usize>>> {
    Ok(object_literal_pattern()?.find(text).map(|found| found.range()))
}

/// Swaps the existing object literal for `literal`. Everything outside the
/// matched span is kept byte for byte.
pub fn replace_object_literal(text: &str, literal: &str) -> anyhow::Result<String> {
    let Some(span) = find_object_literal(text)? else {
        anyhow::bail!("could not find `{ASSIGNMENT_PREFIX}{{...}};` in target");
    };

    let mut out = String::with_capacity(text.len() - span.len() + literal.len() + 32);
    out.push_str(&text[..span.start]);
    out.push_str(ASSIGNMENT_PREFIX);
    out.push_str(literal);
    out.push(';');
    out.push_str(&text[span.end..]);
    Ok(out)
}
