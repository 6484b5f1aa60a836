//! Verb bitmask values and the method lookup table.
//!
//! Every verb the dispatch engine understands occupies a distinct bit so that
//! handler capabilities and accepted-method policies can be expressed as a
//! single mask. The table mapping verbs to their text tokens is a process-wide
//! constant with no reinitialization entry point, so concurrent reads need no
//! synchronization.

use smallvec::SmallVec;
use std::fmt;
use std::ops::BitOr;

/// A request verb.
///
/// `Unknown` is a sentinel outside the lookup table: it carries no bit and is
/// never admitted by any accepted-method mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Put,
    Post,
    Patch,
    Delete,
    Options,
    Unknown,
}

impl Verb {
    /// The bitmask value for this verb. `Unknown` has no bit.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Verb::Get => 0b0000_0001,
            Verb::Post => 0b0000_0010,
            Verb::Delete => 0b0000_0100,
            Verb::Put => 0b0000_1000,
            Verb::Patch => 0b0001_0000,
            Verb::Options => 0b0100_0000,
            Verb::Unknown => 0,
        }
    }

    /// The text token for this verb, if it is in the table.
    #[must_use]
    pub fn token(self) -> Option<&'static str> {
        token_for_verb(self)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token().unwrap_or("UNKNOWN"))
    }
}

/// Map a native `http` method onto a verb, for adapters whose transport
/// resolves the verb before the message is parsed. Methods outside the
/// table (HEAD, TRACE, extensions) map to `Unknown`.
impl From<&http::Method> for Verb {
    fn from(method: &http::Method) -> Self {
        verb_from_token(method.as_str())
    }
}

/// A set of verbs packed into one bitmask.
///
/// Used both for a handler's declared capabilities and for the caller-supplied
/// accepted-method policy checked during admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MethodSet(u8);

impl MethodSet {
    /// The empty set.
    pub const NONE: MethodSet = MethodSet(0);

    /// Every verb in the table, OPTIONS included.
    pub const ANY: MethodSet = MethodSet(
        Verb::Get.bit()
            | Verb::Post.bit()
            | Verb::Delete.bit()
            | Verb::Put.bit()
            | Verb::Patch.bit()
            | Verb::Options.bit(),
    );

    /// The set containing exactly one verb.
    #[must_use]
    pub const fn of(verb: Verb) -> Self {
        MethodSet(verb.bit())
    }

    /// This set with `verb` added.
    #[must_use]
    pub const fn with(self, verb: Verb) -> Self {
        MethodSet(self.0 | verb.bit())
    }

    /// Whether `verb` is a member. `Unknown` is never a member.
    #[must_use]
    pub const fn contains(self, verb: Verb) -> bool {
        verb.bit() != 0 && self.0 & verb.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of verbs in the set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// The raw bitmask value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl From<Verb> for MethodSet {
    fn from(verb: Verb) -> Self {
        MethodSet::of(verb)
    }
}

impl BitOr for MethodSet {
    type Output = MethodSet;
    fn bitor(self, rhs: MethodSet) -> MethodSet {
        MethodSet(self.0 | rhs.0)
    }
}

impl BitOr<Verb> for MethodSet {
    type Output = MethodSet;
    fn bitor(self, rhs: Verb) -> MethodSet {
        self.with(rhs)
    }
}

impl BitOr for Verb {
    type Output = MethodSet;
    fn bitor(self, rhs: Verb) -> MethodSet {
        MethodSet::of(self).with(rhs)
    }
}

impl BitOr<MethodSet> for Verb {
    type Output = MethodSet;
    fn bitor(self, rhs: MethodSet) -> MethodSet {
        rhs.with(self)
    }
}

/// The method table, in its fixed scan order.
///
/// The order is load-bearing: capability introspection lists tokens in table
/// order, so it is part of the response wire shape.
pub const METHOD_TABLE: [(Verb, &str); 6] = [
    (Verb::Get, "GET"),
    (Verb::Put, "PUT"),
    (Verb::Post, "POST"),
    (Verb::Patch, "PATCH"),
    (Verb::Delete, "DELETE"),
    (Verb::Options, "OPTIONS"),
];

/// Resolve a text token to its verb. Unmatched tokens map to `Verb::Unknown`.
#[must_use]
pub fn verb_from_token(token: &str) -> Verb {
    METHOD_TABLE
        .iter()
        .find(|(_, text)| *text == token)
        .map_or(Verb::Unknown, |(verb, _)| *verb)
}

/// The table token for `verb`, absent for the `Unknown` sentinel.
#[must_use]
pub fn token_for_verb(verb: Verb) -> Option<&'static str> {
    METHOD_TABLE
        .iter()
        .find(|(v, _)| *v == verb)
        .map(|(_, text)| *text)
}

/// The token of the first table entry whose bit is set in `set`.
#[must_use]
pub fn first_token_in(set: MethodSet) -> Option<&'static str> {
    METHOD_TABLE
        .iter()
        .find(|(verb, _)| set.contains(*verb))
        .map(|(_, text)| *text)
}

/// Token list built during capability introspection.
///
/// Stack-allocated: the table has six entries, plus the appended "OPTIONS"
/// token, so the inline capacity is never exceeded.
pub type TokenList = SmallVec<[&'static str; 8]>;

/// Collect the tokens of every table verb present in `set`, in table order.
///
/// With `include_options` set (a handler answering its own OPTIONS request),
/// the literal "OPTIONS" token is appended when at least one verb was found.
/// The router-level describer passes `false` and reports the declared set
/// verbatim. An empty result means "no declared methods".
#[must_use]
pub fn method_tokens(set: MethodSet, include_options: bool) -> TokenList {
    let mut tokens = TokenList::new();
    for (verb, text) in &METHOD_TABLE {
        if set.contains(*verb) {
            tokens.push(*text);
        }
    }
    if include_options && !tokens.is_empty() {
        tokens.push("OPTIONS");
    }
    tokens
}
