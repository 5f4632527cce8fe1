//! Placeholder substitution for a single recipient.
//!
//! A run whose text contains `[NAME]` or `[DATE]` is replaced by a new run
//! with the tokens substituted and the original run's style carried over.
//! Runs without tokens are copied verbatim. The template is never touched:
//! every call produces an independent copy of the page structure.

use std::borrow::Cow;

use crate::model::{Page, Paragraph, PersonalizedDocument, Recipient, Template, TextRegion, TextRun};

/// Token replaced by the recipient's name.
pub const NAME_TOKEN: &str = "[NAME]";

/// Token replaced by the event date.
pub const DATE_TOKEN: &str = "[DATE]";

/// All recognised placeholder tokens.
pub const TOKENS: [&str; 2] = [NAME_TOKEN, DATE_TOKEN];

/// Check whether text contains any placeholder token.
pub fn contains_placeholder(text: &str) -> bool {
    TOKENS.iter().any(|t| text.contains(t))
}

/// Replace every `[NAME]` with `name` and every `[DATE]` with `date`.
///
/// Replacement values are inserted literally; a name containing `[DATE]`
/// is not substituted again.
pub fn substitute<'a>(text: &'a str, name: &str, date: &str) -> Cow<'a, str> {
    if !contains_placeholder(text) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + name.len() + date.len());
    let mut rest = text;
    loop {
        let next = TOKENS
            .iter()
            .filter_map(|t| rest.find(t).map(|pos| (pos, *t)))
            .min_by_key(|(pos, _)| *pos);
        match next {
            Some((pos, token)) => {
                out.push_str(&rest[..pos]);
                out.push_str(if token == NAME_TOKEN { name } else { date });
                rest = &rest[pos + token.len()..];
            }
            None => {
                out.push_str(rest);
                break;
            }
        }
    }
    Cow::Owned(out)
}

/// Personalize a template for one recipient.
pub fn personalize(template: &Template, recipient: &Recipient, event_date: &str) -> PersonalizedDocument {
    let pages = template
        .pages
        .iter()
        .map(|page| personalize_page(page, &recipient.name, event_date))
        .collect();

    PersonalizedDocument {
        recipient: recipient.clone(),
        page_size: template.page_size,
        pages,
        package: template.package.clone(),
    }
}

fn personalize_page(page: &Page, name: &str, date: &str) -> Page {
    Page {
        number: page.number,
        part_name: page.part_name.clone(),
        regions: page
            .regions
            .iter()
            .map(|region| TextRegion {
                paragraphs: region
                    .paragraphs
                    .iter()
                    .map(|p| Paragraph {
                        runs: p.runs.iter().map(|r| personalize_run(r, name, date)).collect(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Substitute tokens in one run.
///
/// The replacement keeps the original font name, size, bold/italic flags
/// and color, and stays bound to the original text body.
pub fn personalize_run(run: &TextRun, name: &str, date: &str) -> TextRun {
    match substitute(&run.text, name, date) {
        Cow::Borrowed(_) => run.clone(),
        Cow::Owned(text) => TextRun {
            text,
            style: run.style.clone(),
            span: run.span.clone(),
        },
    }
}
