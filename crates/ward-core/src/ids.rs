use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! str_newtype {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

str_newtype!(WorkerId);
str_newtype!(IssueKind);
str_newtype!(EvidenceRef);

impl EvidenceRef {
    /// Mint a fresh opaque reference for an image handed to the external
    /// image store, named `{kind}_{uuid}` so operators can eyeball it.
    pub fn mint(kind: &IssueKind) -> Self {
        Self(format!("{}_{}", kind.as_str(), Uuid::new_v4().simple()))
    }
}

/// Store-assigned, monotonically increasing, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IncidentId(pub i64);

impl IncidentId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for IncidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
