//! Lightweight inline-style handling.
//!
//! Parses `style=""` attributes for the two properties search cares
//! about (`display` for visibility, `background-color` for highlight
//! painting) and patches declarations back without disturbing the rest
//! of the attribute value.

/// Extracted inline-style properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleProps {
    pub display: Option<String>,
    pub background_color: Option<String>,
}

impl StyleProps {
    pub fn display_none(&self) -> bool {
        self.display.as_deref() == Some("none")
    }
}

/// Parse an inline `style="..."` attribute value.
pub fn parse_inline_style(style: &str) -> StyleProps {
    let mut props = StyleProps::default();
    for decl in style.split(';') {
        let Some((prop, val)) = decl.split_once(':') else {
            continue;
        };
        let val = val.trim();
        match prop.trim() {
            "display" => props.display = Some(val.to_lowercase()),
            "background-color" => props.background_color = Some(val.to_string()),
            _ => {}
        }
    }
    props
}

/// Return `style` with its `background-color` declaration replaced by
/// `color` (appended if absent). Other declarations are preserved.
pub fn with_background_color(style: &str, color: &str) -> String {
    let mut decls: Vec<String> = style
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter(|d| {
            d.split_once(':')
                .map_or(true, |(prop, _)| prop.trim() != "background-color")
        })
        .map(str::to_string)
        .collect();
    decls.push(format!("background-color: {}", color));
    let mut out = decls.join("; ");
    out.push(';');
    out
}
