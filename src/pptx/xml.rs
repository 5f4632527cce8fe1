//! Small XML helpers for scanning OOXML parts.
//!
//! OOXML parts are machine-written and regular, so the reader scans them
//! with anchored patterns and records byte offsets instead of building a DOM.
//! Offsets are what allow the writer to splice text back without touching
//! any surrounding markup.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Declare a lazily compiled, process-wide pattern.
macro_rules! pattern {
    ($name:ident, $re:expr) => {
        pub(crate) fn $name() -> &'static ::regex::Regex {
            static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            RE.get_or_init(|| ::regex::Regex::new($re).unwrap())
        }
    };
}
pub(crate) use pattern;

fn attribute_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    })
}

fn attributes(attrs: &str) -> impl Iterator<Item = (&str, &str)> {
    attribute_pattern().captures_iter(attrs).filter_map(|c| {
        let name = c.get(1)?.as_str();
        let value = c.get(2).or_else(|| c.get(3))?.as_str();
        Some((name, value))
    })
}

/// Look up an attribute value in the attribute section of a start tag.
///
/// The returned value is unescaped.
pub(crate) fn attr(attrs: &str, name: &str) -> Option<String> {
    attributes(attrs)
        .find(|(n, _)| *n == name)
        .map(|(_, v)| unescape(v).into_owned())
}

/// Look up a namespace-qualified attribute by local name, whatever its prefix.
///
/// `attr_local(attrs, "id")` finds `r:id` but not an unqualified `id`.
pub(crate) fn attr_local(attrs: &str, local: &str) -> Option<String> {
    attributes(attrs)
        .find(|(n, _)| n.split_once(':').is_some_and(|(_, l)| l == local))
        .map(|(_, v)| unescape(v).into_owned())
}

/// Escape text for use in element content or attribute values.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Resolve predefined and numeric character references.
///
/// Unknown or malformed references are kept literally.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = rest
            .find(';')
            .filter(|&end| end <= 12)
            .and_then(|end| decode_reference(&rest[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Resolve a relationship target against the directory of its source part.
///
/// `base_dir` is e.g. `ppt` for `ppt/_rels/presentation.xml.rels`.
pub(crate) fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}
