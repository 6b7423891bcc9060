use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Process-wide table of authored entity names.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// An authored entity name, interned so it can be copied and hashed freely.
///
/// Entity names come from the authored model (e.g. `Monster`, `Chair`).
/// They are not guaranteed unique across the whole graph, only within the
/// configured interactive set, so anything that has to point at one node
/// holds a `NodeIndex` instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(Spur);

impl EntityId {
    /// Intern a name as an EntityId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        EntityId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a unique id for an entity exported without a name.
    pub fn anonymous() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("_unnamed_{n}"))
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(EntityId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = EntityId::intern("Monster");
        let b = EntityId::intern("Monster");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "Monster");
        assert_eq!(a.to_string(), "Monster");
    }

    #[test]
    fn anonymous_ids_are_unique() {
        let a = EntityId::anonymous();
        let b = EntityId::anonymous();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("_unnamed_"));
    }

    #[test]
    fn serde_as_plain_string() {
        let id = EntityId::intern("Chair");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""Chair""#);
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
