//! Markup tag vocabulary and the renderers bound to it.

use std::fmt;
use std::sync::Arc;

use console::Style;
use regex::{Captures, Regex};

/// Maps the inner text of a tag to its display form.
pub type Renderer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A 256-color foreground style that always emits escapes. Whether color
/// reaches the terminal is decided later by the writer.
fn color(c: u8) -> Style {
    Style::new().color256(c).force_styling(true)
}

/// Style `text` with 256-color foregrounds.
///
/// Colors are applied in order, each one wrapping the previous result, so
/// the first color is the innermost escape.
pub fn render_colors(colors: &[u8]) -> Renderer {
    let styles: Vec<Style> = colors.iter().copied().map(color).collect();
    Arc::new(move |text: &str| {
        styles
            .iter()
            .fold(text.to_string(), |out, style| style.apply_to(out).to_string())
    })
}

/// Underline `text`.
pub fn render_underline() -> Renderer {
    let style = Style::new().underlined().force_styling(true);
    Arc::new(move |text: &str| style.apply_to(text).to_string())
}

/// Red `ERROR:` prefix followed by the message in a lighter red.
pub fn render_error() -> Renderer {
    let (prefix, message) = (color(124), color(203));
    Arc::new(move |text: &str| {
        format!("{}{}", prefix.apply_to("ERROR: "), message.apply_to(text))
    })
}

struct Tag {
    name: String,
    pattern: Regex,
    render: Renderer,
}

/// An ordered tag vocabulary.
///
/// Rendering substitutes one tag name at a time over the whole string, in
/// the order tags were added. Matching is non-greedy within a name, so a tag
/// cannot contain another tag of the same name. Names outside the
/// vocabulary are left as literal text.
///
/// # Example
///
/// ```
/// use stdcli::render::{render_underline, strip_color, TagTable};
///
/// let tags = TagTable::new().with("u", render_underline());
/// let out = tags.render("<u>hi</u> <x>there</x>");
/// assert_eq!(strip_color(&out), "hi <x>there</x>");
/// ```
#[derive(Clone, Default)]
pub struct TagTable {
    tags: Vec<Arc<Tag>>,
}

impl TagTable {
    /// An empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock vocabulary: `error`, `header`, `h1`, `h2`, `id`, `info`,
    /// `ok`, `start`, `u`, `value`.
    pub fn standard() -> Self {
        Self::new()
            .with("error", render_error())
            .with("header", render_colors(&[242]))
            .with("h1", render_colors(&[244]))
            .with("h2", render_colors(&[241]))
            .with("id", render_colors(&[247]))
            .with("info", render_colors(&[247]))
            .with("ok", render_colors(&[46]))
            .with("start", render_colors(&[247]))
            .with("u", render_underline())
            .with("value", render_colors(&[251]))
    }

    /// Add (or replace) the renderer for `name`.
    pub fn with(mut self, name: &str, render: Renderer) -> Self {
        let escaped = regex::escape(name);
        let pattern = Regex::new(&format!("<{}>(.*?)</{}>", escaped, escaped))
            .expect("escaped tag pattern must compile");
        let tag = Arc::new(Tag {
            name: name.to_string(),
            pattern,
            render,
        });

        match self.tags.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }

    /// Substitute every known tag pair with its rendered inner text.
    pub fn render(&self, s: &str) -> String {
        let mut out = s.to_string();
        for tag in &self.tags {
            out = tag
                .pattern
                .replace_all(&out, |caps: &Captures<'_>| {
                    (tag.render)(caps.get(1).map_or("", |m| m.as_str()))
                })
                .into_owned();
        }
        out
    }

    /// Apply one tag's renderer to literal text, without looking for markup
    /// inside it. Unknown names return the text unchanged.
    pub fn render_as(&self, name: &str, text: &str) -> String {
        match self.tags.iter().find(|t| t.name == name) {
            Some(tag) => (tag.render)(text),
            None => text.to_string(),
        }
    }
}

impl fmt::Debug for TagTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
