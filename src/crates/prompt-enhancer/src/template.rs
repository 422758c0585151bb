//! Named-placeholder substitution for pattern templates.
//!
//! Placeholders are written `{name}` where `name` is `[A-Za-z_][A-Za-z0-9_]*`.
//! `{{` and `}}` produce literal braces.

use std::collections::BTreeMap;

/// Placeholder always filled with the user's prompt.
pub const ORIGINAL_PROMPT: &str = "original_prompt";

/// Why a template could not be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// `{name}` appears in the template but no value was supplied
    Missing(String),
    /// Unbalanced or otherwise unparseable brace at the given byte offset
    Malformed(usize),
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                if literal_start < i {
                    segments.push(Segment::Literal(&template[literal_start..i]));
                }
                segments.push(Segment::Brace(bytes[i] as char));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                let close = template[i + 1..]
                    .find('}')
                    .map(|offset| i + 1 + offset)
                    .ok_or(TemplateError::Malformed(i))?;
                let name = &template[i + 1..close];
                if !is_ident(name) {
                    return Err(TemplateError::Malformed(i));
                }
                if literal_start < i {
                    segments.push(Segment::Literal(&template[literal_start..i]));
                }
                segments.push(Segment::Placeholder(name));
                i = close + 1;
                literal_start = i;
            }
            b'}' => return Err(TemplateError::Malformed(i)),
            _ => i += 1,
        }
    }

    if literal_start < template.len() {
        segments.push(Segment::Literal(&template[literal_start..]));
    }
    Ok(segments)
}

/// Placeholder names in first-appearance order, without duplicates.
///
/// A malformed template has no placeholders.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for segment in parse(template).unwrap_or_default() {
        if let Segment::Placeholder(name) = segment {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Substitute every placeholder with its value from `params`.
///
/// Values are inserted verbatim; braces inside values are not interpreted.
/// Extra entries in `params` are ignored.
pub fn render(template: &str, params: &BTreeMap<String, String>) -> Result<String, TemplateError> {
    let segments = parse(template)?;
    let mut out = String::with_capacity(template.len());

    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Brace(c) => out.push(c),
            Segment::Placeholder(name) => {
                let value = params
                    .get(name)
                    .ok_or_else(|| TemplateError::Missing(name.to_string()))?;
                out.push_str(value);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_all_occurrences() {
        let out = render("{a} and {b} and {a}", &params(&[("a", "1"), ("b", "2")])).unwrap();
        assert_eq!(out, "1 and 2 and 1");
    }

    #[test]
    fn test_render_missing_placeholder() {
        let err = render("Hello {name}", &BTreeMap::new()).unwrap_err();
        assert_eq!(err, TemplateError::Missing("name".to_string()));
    }

    #[test]
    fn test_render_ignores_extra_params() {
        let out = render("x={x}", &params(&[("x", "1"), ("model", "llama3")])).unwrap();
        assert_eq!(out, "x=1");
    }

    #[test]
    fn test_escaped_braces() {
        let out = render("{{literal}} {v}", &params(&[("v", "ok")])).unwrap();
        assert_eq!(out, "{literal} ok");
        assert!(placeholders("{{literal}}").is_empty());
    }

    #[test]
    fn test_malformed_templates() {
        assert_eq!(render("oops {", &BTreeMap::new()), Err(TemplateError::Malformed(5)));
        assert_eq!(render("oops }", &BTreeMap::new()), Err(TemplateError::Malformed(5)));
        assert_eq!(
            render("{not an ident}", &BTreeMap::new()),
            Err(TemplateError::Malformed(0))
        );
    }

    #[test]
    fn test_placeholders_in_order_without_duplicates() {
        assert_eq!(placeholders("{b} {a} {b} {c}"), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_non_ascii_literals_survive() {
        let out = render("héllo — {x} ✓", &params(&[("x", "wörld")])).unwrap();
        assert_eq!(out, "héllo — wörld ✓");
    }

    proptest! {
        #[test]
        fn prop_value_inserted_verbatim(value in ".*") {
            let out = render("<task>\n{original_prompt}\n</task>", &params(&[(ORIGINAL_PROMPT, value.as_str())])).unwrap();
            prop_assert!(out.contains(&value));
            prop_assert!(out.starts_with("<task>\n"));
            prop_assert!(out.ends_with("\n</task>"));
        }
    }
}
