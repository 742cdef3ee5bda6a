//! Rendering of matched text into replacement output.

/// A single match as presented to a replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a> {
    /// The full text of the match.
    pub text: &'a str,
    /// The text of each capturing group, in order of its opening
    /// parenthesis. Groups that did not participate are empty.
    pub groups: Vec<&'a str>,
    /// The offset of the match in characters from the start of the stream.
    pub start: usize,
}

impl<'a> Match<'a> {
    /// Returns group `idx`, where `0` is the whole match. Unknown groups
    /// render as an empty string.
    pub fn group(&self, idx: usize) -> &'a str {
        match idx {
            0 => self.text,
            n => self.groups.get(n - 1).copied().unwrap_or(""),
        }
    }
}

/// Pairs up resolved capture slots into group text. `slots` holds byte
/// offsets into `source`.
pub(crate) fn capture_groups<'a>(slots: &[Option<usize>], source: &'a str) -> Vec<&'a str> {
    slots
        .chunks(2)
        .map(|pair| match pair {
            [Some(start), Some(end)] => source.get(*start..*end).unwrap_or(""),
            _ => "",
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePart {
    Literal(String),
    Group(usize),
}

/// A parsed replacement template.
///
/// `$0` expands to the whole match and `$N` to the Nth capturing group,
/// where `N` may span several digits. `$$` produces a literal `$`, as does a
/// `$` that isn't followed by a digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    parts: Vec<TemplatePart>,
}

impl Template {
    pub fn parse(src: &str) -> Self {
        let mut parts = vec![];
        let mut literal = String::new();
        let mut chars = src.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, chars.peek().copied()) {
                ('$', Some('$')) => {
                    chars.next();
                    literal.push('$');
                }
                ('$', Some(next)) if next.is_ascii_digit() => {
                    let mut idx = 0usize;
                    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
                        idx = idx.saturating_mul(10).saturating_add(digit as usize);
                        chars.next();
                    }

                    if !literal.is_empty() {
                        parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(TemplatePart::Group(idx));
                }
                (c, _) => literal.push(c),
            }
        }

        if !literal.is_empty() {
            parts.push(TemplatePart::Literal(literal));
        }

        Self { parts }
    }

    pub fn render(&self, m: &Match<'_>) -> String {
        self.parts.iter().fold(String::new(), |mut acc, part| {
            match part {
                TemplatePart::Literal(literal) => acc.push_str(literal),
                TemplatePart::Group(idx) => acc.push_str(m.group(*idx)),
            }
            acc
        })
    }
}

impl From<&str> for Template {
    fn from(src: &str) -> Self {
        Self::parse(src)
    }
}

type Callback = Box<dyn FnMut(&Match<'_>) -> String>;

/// Describes what each match is replaced with.
pub enum Replacement {
    Template(Template),
    Callback(Callback),
}

impl Replacement {
    pub fn template(src: &str) -> Self {
        Self::Template(Template::parse(src))
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: FnMut(&Match<'_>) -> String + 'static,
    {
        Self::Callback(Box::new(f))
    }

    pub fn render(&mut self, m: &Match<'_>) -> String {
        match self {
            Replacement::Template(template) => template.render(m),
            Replacement::Callback(f) => f(m),
        }
    }
}

impl From<&str> for Replacement {
    fn from(src: &str) -> Self {
        Self::template(src)
    }
}

impl From<String> for Replacement {
    fn from(src: String) -> Self {
        Self::template(&src)
    }
}

impl From<Template> for Replacement {
    fn from(src: Template) -> Self {
        Self::Template(src)
    }
}

impl std::fmt::Debug for Replacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Replacement::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Replacement::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}
