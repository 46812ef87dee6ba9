//! Participant records as supplied by callers.
//!
//! The engine only reads these. A draw result lives in a separate
//! [`Assignment`](crate::draw::Assignment) table indexed by position, so a
//! participant slice can be shared between concurrent draws.

/// One person taking part in the exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Participant {
    /// Unique key within a draw.
    pub name: String,
    /// Delivery channel hint (e.g. "email"); opaque to the engine.
    pub notification_type: Option<String>,
    /// Addresses used by the notification layer. Empty only warns.
    pub contact_info: Vec<String>,
    /// Names this participant must not be assigned. Asymmetric.
    pub exclusions: Vec<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_exclusions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact_info.push(contact.into());
        self
    }

    pub fn with_notification_type(mut self, kind: impl Into<String>) -> Self {
        self.notification_type = Some(kind.into());
        self
    }

    #[inline]
    pub fn excludes(&self, name: &str) -> bool {
        self.exclusions.iter().any(|e| e == name)
    }

    /// Record-level check: `other` is neither `self` nor excluded.
    pub fn can_give_to(&self, other: &Participant) -> bool {
        self.name != other.name && !self.excludes(&other.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_give_to_rejects_self_and_exclusions() {
        let alice = Participant::new("Alice").with_exclusions(["Bob"]);
        let bob = Participant::new("Bob");
        let carol = Participant::new("Carol");
        assert!(!alice.can_give_to(&alice));
        assert!(!alice.can_give_to(&bob));
        assert!(alice.can_give_to(&carol));
        // Exclusions are one-way.
        assert!(bob.can_give_to(&alice));
    }

    #[test]
    fn builder_collects_fields() {
        let p = Participant::new("Eli")
            .with_contact("eli@example.com")
            .with_notification_type("email")
            .with_exclusions(vec!["Emily".to_string()]);
        assert_eq!(p.contact_info, vec!["eli@example.com"]);
        assert_eq!(p.notification_type.as_deref(), Some("email"));
        assert!(p.excludes("Emily"));
        assert!(!p.excludes("Ivan"));
    }
}
