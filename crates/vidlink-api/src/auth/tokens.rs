use subtle::ConstantTimeEq;
use vidlink_core::{Actor, ActorRole, Config};

/// Static bearer tokens and the actor each one authenticates as.
#[derive(Clone, Default)]
pub struct TokenRegistry {
    entries: Vec<(String, Actor)>,
}

impl std::fmt::Debug for TokenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRegistry")
            .field("actors", &self.entries.iter().map(|(_, a)| &a.name).collect::<Vec<_>>())
            .finish()
    }
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

impl TokenRegistry {
    pub fn from_config(config: &Config) -> Self {
        let mut registry = TokenRegistry::default();
        registry.register(
            config.organizer_api_token.clone(),
            Actor::new("organizer", ActorRole::Organizer),
        );
        if let Some(token) = &config.reviewer_api_token {
            registry.register(token.clone(), Actor::new("reviewer", ActorRole::Reviewer));
        }
        if let Some(token) = &config.viewer_api_token {
            registry.register(token.clone(), Actor::new("viewer", ActorRole::Viewer));
        }
        registry
    }

    pub fn register(&mut self, token: String, actor: Actor) {
        self.entries.push((token, actor));
    }

    /// Actor for `token`. Every entry is compared so timing does not reveal which matched.
    pub fn resolve(&self, token: &str) -> Option<Actor> {
        let mut found = None;
        for (candidate, actor) in &self.entries {
            if secure_compare(candidate, token) && found.is_none() {
                found = Some(actor.clone());
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let mut registry = TokenRegistry::default();
        registry.register("a".repeat(32), Actor::new("organizer", ActorRole::Organizer));
        registry.register("b".repeat(32), Actor::new("viewer", ActorRole::Viewer));

        assert_eq!(
            registry.resolve(&"b".repeat(32)).map(|a| a.role),
            Some(ActorRole::Viewer)
        );
        assert!(registry.resolve(&"c".repeat(32)).is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn test_debug_hides_tokens() {
        let mut registry = TokenRegistry::default();
        registry.register("secret-token".to_string(), Actor::new("organizer", ActorRole::Organizer));
        let debug = format!("{:?}", registry);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("organizer"));
    }
}
