use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw media-server account name -> name shown on Discord.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserAliases(HashMap<String, String>);

impl UserAliases {
    pub fn new(aliases: HashMap<String, String>) -> Self {
        Self(aliases)
    }

    /// The alias for `user`, or `user` itself when none is mapped.
    pub fn display_name<'a>(&'a self, user: &'a str) -> &'a str {
        self.0.get(user).map(String::as_str).unwrap_or(user)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_users_pass_through() {
        let aliases: UserAliases = serde_json::from_str(r#"{ "plexfan42": "Alex" }"#).unwrap();
        assert_eq!(aliases.display_name("plexfan42"), "Alex");
        assert_eq!(aliases.display_name("someone"), "someone");
        assert_eq!(aliases.len(), 1);
    }
}
