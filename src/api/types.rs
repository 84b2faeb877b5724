use serde::{Deserialize, Deserializer};

/// A category as returned by the platform's `/categories/tree` endpoint.
///
/// Every field is optional on the wire. The server is trusted not to send
/// cycles, but nothing else about the shape is guaranteed, so missing fields
/// are tolerated here and defaulted later by the tree builder.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CategoryRecord {
    /// Server identifier. Numeric ids are normalised to their decimal string.
    #[serde(deserialize_with = "deserialize_id", alias = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[serde(alias = "imageUrl", alias = "image_url")]
    pub image: Option<String>,
    #[serde(rename = "isActive", alias = "is_active")]
    pub is_active: Option<bool>,
    /// RFC 3339 timestamp. Kept as text so one bad value cannot reject the payload.
    #[serde(rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "deserialize_children")]
    pub children: Vec<CategoryRecord>,
}

impl CategoryRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<CategoryRecord>) -> Self {
        self.children = children;
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }
}

/// Response body of the tree endpoint: either a bare array or the platform's
/// `{"data": [...]}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CategoryPayload {
    Bare(Vec<CategoryRecord>),
    Envelope { data: Vec<CategoryRecord> },
}

impl CategoryPayload {
    pub(crate) fn into_records(self) -> Vec<CategoryRecord> {
        match self {
            CategoryPayload::Bare(records) | CategoryPayload::Envelope { data: records } => {
                records
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

/// `"children": null` is treated the same as an absent key.
fn deserialize_children<'de, D>(deserializer: D) -> Result<Vec<CategoryRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<CategoryRecord>>::deserialize(deserializer)?.unwrap_or_default())
}
