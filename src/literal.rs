use std::fmt::Write as _;

use crate::formats::Profile;

pub const POLISH_BIO_QUESTION: &str = "Bio (Polski)";

// A literal `};` inside a value would end the object for the splice pattern.
// `\;` evaluates to `;` in both string forms.
const BRACE_SEMICOLON_ESCAPE: &str = "\\;";

/// Renders the profile as the `sessionizeData` object literal (without the
/// `const ... =` prefix and the trailing `;`).
pub fn render_object_literal(profile: &Profile) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_object_literal(&mut out, profile);
    out
}

fn write_object_literal(out: &mut String, profile: &Profile) -> std::fmt::Result {
    let text = |value: &Option<String>| quoted(value.as_deref().unwrap_or_default());

    writeln!(out, "{{")?;
    writeln!(out, "        fullName: {},", text(&profile.full_name))?;
    writeln!(out, "        tagLine: {},", text(&profile.tag_line))?;
    writeln!(out, "        profilePicture: {},", text(&profile.profile_picture))?;
    writeln!(out, "        city: {},", text(&profile.city))?;
    writeln!(out, "        country: {},", text(&profile.country))?;
    writeln!(
        out,
        "        bio: {},",
        template(profile.bio.as_deref().unwrap_or_default())
    )?;

    writeln!(out, "        links: [")?;
    for link in &profile.links {
        writeln!(
            out,
            "            {{ title: {}, url: {}, linkType: {} }},",
            quoted(&link.title),
            quoted(&link.url),
            quoted(link.link_type.as_str())
        )?;
    }
    writeln!(out, "        ],")?;

    writeln!(out, "        categories: [")?;
    for category in &profile.categories {
        writeln!(out, "            {{")?;
        writeln!(out, "                categoryItems: [")?;
        for item in &category.category_items {
            writeln!(out, "                    {{ name: {} }},", quoted(&item.name))?;
        }
        writeln!(out, "                ]")?;
        writeln!(out, "            }}")?;
    }
    writeln!(out, "        ],")?;

    writeln!(out, "        sessions: [")?;
    for session in &profile.sessions {
        writeln!(out, "            {{ name: {} }},", quoted(&session.name))?;
    }
    writeln!(out, "        ],")?;

    writeln!(out, "        questionAnswers: [")?;
    writeln!(out, "            {{")?;
    writeln!(out, "                question: {},", quoted(POLISH_BIO_QUESTION))?;
    writeln!(
        out,
        "                answer: {}",
        template(profile.bio_pl.as_deref().unwrap_or_default())
    )?;
    writeln!(out, "            }}")?;
    writeln!(out, "        ]")?;
    write!(out, "    }}")
}

/// Double-quoted JS string.
pub fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut prev = None;
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ';' if prev == Some('}') => out.push_str(BRACE_SEMICOLON_ESCAPE),
            _ => out.push(ch),
        }
        prev = Some(ch);
    }
    out.push('"');
    out
}

/// Backtick template literal that evaluates back to `value`.
pub fn template(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('`');
    let mut chars = value.chars().peekable();
    let mut prev = None;
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            ';' if prev == Some('}') => out.push_str(BRACE_SEMICOLON_ESCAPE),
            _ => out.push(ch),
        }
        prev = Some(ch);
    }
    out.push('`');
    out
}
