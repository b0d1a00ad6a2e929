//! Classification exports written to their own collection

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::documents::{Fields, field};

/// Kind of classification exported as one `TagCollection`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    Countries,
    Industries,
    Indices,
}

impl TagType {
    pub const ALL: [TagType; 3] = [TagType::Countries, TagType::Industries, TagType::Indices];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::Countries => "countries",
            TagType::Industries => "industries",
            TagType::Indices => "indices",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for TagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All known labels of one classification kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCollection {
    #[serde(rename = "type")]
    pub tag_type: TagType,
    pub tags: BTreeSet<String>,
}

impl TagCollection {
    pub fn new<I, S>(tag_type: TagType, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tag_type,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Document shape: `{type, tags}`
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(field::TYPE.to_string(), self.tag_type.as_str().into());
        fields.insert(
            field::TAGS.to_string(),
            self.tags.iter().cloned().collect::<Vec<_>>().into(),
        );
        fields
    }
}
