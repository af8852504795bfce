//! Rules every grammar starts with.

/// A primitive character-level matcher backing one built-in rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Any,
    End,
    Digit,
    Letter,
    Alnum,
    Space,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Any,
        Builtin::End,
        Builtin::Digit,
        Builtin::Letter,
        Builtin::Alnum,
        Builtin::Space,
    ];

    /// The rule name grammars refer to this builtin by.
    pub fn rule_name(&self) -> &'static str {
        match self {
            Builtin::Any => "any",
            Builtin::End => "end",
            Builtin::Digit => "digit",
            Builtin::Letter => "letter",
            Builtin::Alnum => "alnum",
            Builtin::Space => "space",
        }
    }

    /// What a failure to match this rule reports as expected.
    pub fn description(&self) -> &'static str {
        match self {
            Builtin::Any => "any character",
            Builtin::End => "end of input",
            Builtin::Digit => "a digit",
            Builtin::Letter => "a letter",
            Builtin::Alnum => "an alpha-numeric character",
            Builtin::Space => "a space",
        }
    }

    /// Matches at byte offset `pos` and returns the end offset.
    pub fn match_at(&self, input: &str, pos: usize) -> Option<usize> {
        let rest = input.get(pos..)?;
        if let Builtin::End = self {
            return rest.is_empty().then_some(pos);
        }
        let c = rest.chars().next()?;
        let accepted = match self {
            Builtin::Any => true,
            Builtin::Digit => c.is_ascii_digit(),
            Builtin::Letter => c.is_alphabetic(),
            Builtin::Alnum => c.is_alphabetic() || c.is_ascii_digit(),
            // Every control character counts as space, as does ' ' itself.
            Builtin::Space => c <= ' ',
            Builtin::End => false,
        };
        accepted.then(|| pos + c.len_utf8())
    }
}
