//! Namespaced identifiers such as `minecraft:stone` or `gpislands:overworld`.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A namespaced identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    /// The namespace, e.g. `minecraft`.
    pub namespace: Cow<'static, str>,
    /// The path inside the namespace, e.g. `stone`.
    pub path: Cow<'static, str>,
}

impl Identifier {
    /// The namespace used when none is given.
    pub const VANILLA_NAMESPACE: &'static str = "minecraft";

    /// Creates a new identifier.
    pub fn new(namespace: impl Into<Cow<'static, str>>, path: impl Into<Cow<'static, str>>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Creates an identifier from static strings.
    #[must_use]
    pub const fn new_static(namespace: &'static str, path: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            path: Cow::Borrowed(path),
        }
    }

    /// Creates an identifier in the `minecraft` namespace.
    pub fn vanilla(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Self::VANILLA_NAMESPACE, path)
    }

    /// Creates an identifier in the `minecraft` namespace from a static path.
    #[must_use]
    pub const fn vanilla_static(path: &'static str) -> Self {
        Self::new_static(Self::VANILLA_NAMESPACE, path)
    }

    /// Returns true if the identifier lives in the given namespace.
    #[must_use]
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }

    fn valid_namespace_char(c: char) -> bool {
        matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
    }

    fn valid_path_char(c: char) -> bool {
        Self::valid_namespace_char(c) || c == '/'
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// Error returned when a string is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierParseError(pub String);

impl fmt::Display for IdentifierParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid identifier `{}`", self.0)
    }
}

impl std::error::Error for IdentifierParseError {}

impl FromStr for Identifier {
    type Err = IdentifierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, path) = s
            .split_once(':')
            .unwrap_or((Self::VANILLA_NAMESPACE, s));

        if namespace.is_empty()
            || path.is_empty()
            || !namespace.chars().all(Self::valid_namespace_char)
            || !path.chars().all(Self::valid_path_char)
        {
            return Err(IdentifierParseError(s.to_owned()));
        }

        Ok(Self::new(namespace.to_owned(), path.to_owned()))
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
