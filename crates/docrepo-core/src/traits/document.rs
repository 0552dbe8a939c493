//! Entity trait for stored documents.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record type that can be kept in a document collection.
///
/// The repository treats implementors as opaque keyed documents: it only
/// needs them to round-trip through JSON and to expose their identity,
/// which is stored under `_id`.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
///     id: Option<String>,
///     name: String,
/// }
///
/// impl Document for User {
///     const COLLECTION: &'static str = "users";
///     fn id(&self) -> Option<&str> { self.id.as_deref() }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Default collection name for this entity.
    const COLLECTION: &'static str;

    /// The identity, if the document has been stored.
    ///
    /// `BaseRepository::create` reads it back from the stored entity and
    /// rejects entities that return `None` there.
    fn id(&self) -> Option<&str>;
}
