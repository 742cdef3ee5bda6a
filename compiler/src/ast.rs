#[derive(Debug, PartialEq)]
pub struct Regex(pub Expression);

// Expression

#[derive(Debug, Default, PartialEq)]
pub struct Expression(pub Vec<Factor>);

#[derive(Debug, PartialEq)]
pub enum Factor {
    WithQuantifier { atom: Atom, quantifier: Quantifier },
    WithoutQuantifier { atom: Atom },
}

impl Factor {
    pub fn new(atom: Atom, quantifier: Option<Quantifier>) -> Self {
        match quantifier {
            Some(quantifier) => Self::WithQuantifier { atom, quantifier },
            None => Self::WithoutQuantifier { atom },
        }
    }
}

impl From<Atom> for Factor {
    fn from(atom: Atom) -> Self {
        Self::WithoutQuantifier { atom }
    }
}

// Atoms

#[derive(Debug, PartialEq)]
pub enum Atom {
    Group(Group),
    AnyCharacter,
    /// A character preceded by `\`, taken literally.
    EscapedCharacter(Char),
    Character(Char),
}

impl From<Group> for Atom {
    fn from(src: Group) -> Self {
        Self::Group(src)
    }
}

impl From<AnyCharacter> for Atom {
    fn from(_: AnyCharacter) -> Self {
        Self::AnyCharacter
    }
}

/// A capturing group, numbered by the position of its opening parenthesis.
#[derive(Debug, PartialEq)]
pub struct Group(pub Expression);

pub struct AnyCharacter;

// Quantifiers

/// All quantifiers are greedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    ZeroOrMore,
    OneOrMore,
    ZeroOrOne,
}

// Terminals

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Char(pub char);

impl Char {
    pub fn as_char(&self) -> char {
        self.0
    }
}
