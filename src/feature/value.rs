use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

const DEFAULT_RAW: &str = "NO_VALUE";
const TAG_PREFIX: char = '/';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("a line width of {0} columns cannot fit the qualifier tag")]
    WidthTooSmall(usize),
}

lazy_static! {
    static ref SPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// A qualifier value: free text, or a bare boolean flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub raw: String,
    /// Boolean qualifiers render as `/tag` with no value part.
    pub boolean: bool,
    /// Whether the value is wrapped in double quotes when rendered.
    pub quoted: bool,
}

impl Default for Value {
    fn default() -> Value {
        Value {
            raw: DEFAULT_RAW.to_string(),
            boolean: false,
            quoted: true,
        }
    }
}

/// Cut the rendered text into wrap units: split at runs of whitespace when
/// there are any (runs collapse to a single regular space), at commas
/// otherwise. Each unit keeps its trailing separator.
fn split_units(text: &str) -> Vec<String> {
    let (words, sep): (Vec<&str>, char) = if SPACE_RE.is_match(text) {
        (SPACE_RE.split(text).collect(), ' ')
    } else if text.contains(',') {
        (text.split(',').collect(), ',')
    } else {
        return vec![text.to_string()];
    };

    let last = words.len() - 1;
    words
        .iter()
        .enumerate()
        .map(|(i, w)| {
            if i < last {
                format!("{w}{sep}")
            } else {
                (*w).to_string()
            }
        })
        .collect()
}

impl Value {
    pub fn new(raw: &str) -> Value {
        Value {
            raw: raw.to_string(),
            ..Value::default()
        }
    }

    /// A bare flag qualifier, rendered without a value part.
    pub fn flag() -> Value {
        Value {
            boolean: true,
            ..Value::default()
        }
    }

    /// Render the qualifier as feature-table text: `{prefix}/{tag}={value}`,
    /// wrapped over `{prefix}`-indented lines of at most `width` columns.
    /// Units longer than a whole line are split across the boundary.
    pub fn format(&self, tag: &str, prefix: &str, width: usize) -> Result<String, ValueError> {
        if width <= tag.len() + prefix.len() + 4 {
            return Err(ValueError::WidthTooSmall(width));
        }

        if self.boolean {
            return Ok(format!("{prefix}{TAG_PREFIX}{tag}"));
        }

        let mut text = if self.quoted {
            format!("\"{}\"", self.raw)
        } else {
            self.raw.clone()
        };
        if !tag.is_empty() {
            text = format!("{TAG_PREFIX}{tag}={text}");
        }

        let avail = width - prefix.len();
        if text.len() <= avail {
            return Ok(format!("{prefix}{text}"));
        }

        let mut out = String::from(prefix);
        let mut room = avail;
        for mut unit in split_units(&text) {
            loop {
                if unit.len() <= room {
                    break;
                }
                if unit.len() > avail {
                    // longer than a whole line: hard-split at the boundary
                    let (head, tail) = unit.split_at(room);
                    out.push_str(head);
                    unit = tail.to_string();
                }
                out.push('\n');
                out.push_str(prefix);
                room = avail;
            }
            out.push_str(&unit);
            room -= unit.len();
        }

        Ok(out)
    }
}
