use crate::Term;

/// Token text, as it appears in tree strings and log messages.
pub trait Rendered {
    fn rendered(&self) -> String;
}

impl Rendered for Term {
    fn rendered(&self) -> String {
        match self {
            Term::C(c) => c.to_string(),
            Term::S(s) => s.to_string(),
            Term::Class(class) => class.name().to_string(),
        }
    }
}

impl Rendered for [Term] {
    fn rendered(&self) -> String {
        self.iter().map(|t| t.rendered()).collect()
    }
}
