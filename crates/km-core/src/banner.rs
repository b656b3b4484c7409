use std::fmt;

use serde::{Deserialize, Serialize};

/// A house banner: a coloured symbol, sometimes with an adjective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    /// Optional adjective ("flaming", "crowned").
    pub adjective: Option<String>,
    /// Field colour.
    pub colour: String,
    /// The charge on the banner.
    pub symbol: String,
}

impl Banner {
    /// A banner without an adjective.
    pub fn new(colour: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            adjective: None,
            colour: colour.into(),
            symbol: symbol.into(),
        }
    }

    /// Add an adjective.
    pub fn with_adjective(mut self, adjective: impl Into<String>) -> Self {
        self.adjective = Some(adjective.into());
        self
    }

    /// Description with the correct indefinite article, e.g. "an amber wolf".
    pub fn description(&self) -> String {
        let body = match &self.adjective {
            Some(adjective) => format!("{adjective} {} {}", self.colour, self.symbol),
            None => format!("{} {}", self.colour, self.symbol),
        };
        let article = if body.starts_with(['a', 'e', 'i', 'o', 'u']) {
            "an"
        } else {
            "a"
        };
        format!("{article} {body}")
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_follows_first_letter() {
        assert_eq!(Banner::new("amber", "wolf").description(), "an amber wolf");
        assert_eq!(Banner::new("black", "stag").description(), "a black stag");
    }

    #[test]
    fn adjective_leads() {
        let banner = Banner::new("red", "crab").with_adjective("upside down");
        assert_eq!(banner.description(), "an upside down red crab");
    }
}
