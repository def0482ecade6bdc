//! Identifier types for override bookkeeping.
//!
//! Function names are matched case-insensitively. `Ident` keeps the original
//! spelling for diagnostics; `FunctionKey` is the case-folded form actually
//! used as a table key.

use serde::{Deserialize, Serialize};

/// A simple identifier in its original spelling, like `currentTime`.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Ident {
    pub name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }

    /// The case-folded lookup key for this identifier.
    pub fn key(&self) -> FunctionKey {
        FunctionKey::fold(self.as_str())
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<Ident> for String {
    fn from(ident: Ident) -> Self {
        ident.name
    }
}

impl From<&Ident> for String {
    fn from(ident: &Ident) -> Self {
        ident.name.clone()
    }
}

impl From<String> for Ident {
    fn from(name: String) -> Self {
        Ident::new(name)
    }
}

impl From<&str> for Ident {
    fn from(name: &str) -> Self {
        Ident::new(name)
    }
}

/// A function name normalized to its canonical case-insensitive form.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct FunctionKey(String);

impl FunctionKey {
    pub fn fold(name: &str) -> Self {
        Self(name.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for FunctionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Ident> for FunctionKey {
    fn from(ident: &Ident) -> Self {
        ident.key()
    }
}

#[cfg(test)]
mod tests {
    use super::{FunctionKey, Ident};

    #[test]
    fn keys_fold_case() {
        assert_eq!(FunctionKey::fold("currentTime"), FunctionKey::fold("CURRENTTIME"));
        assert_eq!(FunctionKey::fold("Render").as_str(), "render");
    }

    #[test]
    fn keys_fold_beyond_ascii() {
        assert_eq!(FunctionKey::fold("Grüße"), FunctionKey::fold("grüße"));
    }

    #[test]
    fn ident_retains_original_spelling() {
        let ident = Ident::new("currentTime");
        assert_eq!(ident.as_str(), "currentTime");
        assert_eq!(ident.key().as_str(), "currenttime");
    }
}
