//! The persisted aggregate: every collection the system stores.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chirpy_chirps::Chirp;
use chirpy_core::{ChirpId, DomainError, DomainResult, Entity, UserId, next_id};
use chirpy_users::User;

/// A persisted refresh token.
///
/// Records are never deleted; a revoked record stays as an audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// The signed token string (also the collection key).
    pub id: String,
    pub revoked: bool,
    /// Subject the token was minted for. Absent in records written before
    /// sessions were tracked per user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    pub fn new(token: impl Into<String>, user_id: UserId, issued_at: DateTime<Utc>) -> Self {
        Self {
            id: token.into(),
            revoked: false,
            user_id: Some(user_id),
            issued_at: Some(issued_at),
        }
    }
}

/// Aggregate root and unit of load/replace for the store.
///
/// Collections are ordered maps, so iteration (and therefore id allocation)
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: BTreeMap<UserId, User>,
    #[serde(default)]
    pub chirps: BTreeMap<ChirpId, Chirp>,
    #[serde(default)]
    pub refresh_tokens: BTreeMap<String, RefreshTokenRecord>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.chirps.is_empty() && self.refresh_tokens.is_empty()
    }

    pub fn next_user_id(&self) -> DomainResult<UserId> {
        next_id(self.users.keys())
    }

    pub fn next_chirp_id(&self) -> DomainResult<ChirpId> {
        next_id(self.chirps.keys())
    }

    pub fn insert_user(&mut self, user: User) -> UserId {
        insert_entity(&mut self.users, user)
    }

    pub fn insert_chirp(&mut self, chirp: Chirp) -> ChirpId {
        insert_entity(&mut self.chirps, chirp)
    }

    pub fn user_mut(&mut self, id: UserId) -> DomainResult<&mut User> {
        self.users.get_mut(&id).ok_or(DomainError::NotFound)
    }

    /// Record a freshly issued refresh token for `user_id`.
    ///
    /// Earlier unrevoked tokens of the same user are superseded (revoked).
    /// Returns how many were superseded.
    pub fn record_refresh_token(
        &mut self,
        token: &str,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> usize {
        let mut superseded = 0;
        for record in self.refresh_tokens.values_mut() {
            if record.user_id == Some(user_id) && !record.revoked {
                record.revoked = true;
                superseded += 1;
            }
        }
        self.refresh_tokens
            .insert(token.to_string(), RefreshTokenRecord::new(token, user_id, issued_at));
        superseded
    }
}

fn insert_entity<E: Entity>(collection: &mut BTreeMap<E::Id, E>, entity: E) -> E::Id {
    let id = entity.id();
    collection.insert(id, entity);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_serializes_three_collections() {
        let json = serde_json::to_value(Document::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "users": {}, "chirps": {}, "refresh_tokens": {} })
        );
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let doc: Document = serde_json::from_str(r#"{ "users": {} }"#).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn legacy_token_records_deserialize() {
        let doc: Document = serde_json::from_str(
            r#"{ "refresh_tokens": { "abc": { "id": "abc", "revoked": true } } }"#,
        )
        .unwrap();
        let record = &doc.refresh_tokens["abc"];
        assert!(record.revoked);
        assert_eq!(record.user_id, None);
    }

    #[test]
    fn ids_are_allocated_after_the_maximum() {
        let mut doc = Document::default();
        assert_eq!(doc.next_user_id().unwrap(), UserId::new(1));

        doc.users.insert(UserId::new(4), User::new(UserId::new(4), "a@b.c", "h"));
        assert_eq!(doc.next_user_id().unwrap(), UserId::new(5));
        assert_eq!(doc.next_chirp_id().unwrap(), ChirpId::new(1));
    }

    #[test]
    fn recording_a_token_supersedes_only_that_users_tokens() {
        let mut doc = Document::default();
        let now = Utc::now();
        doc.record_refresh_token("a1", UserId::new(1), now);
        doc.record_refresh_token("b1", UserId::new(2), now);

        let superseded = doc.record_refresh_token("a2", UserId::new(1), now);

        assert_eq!(superseded, 1);
        assert!(doc.refresh_tokens["a1"].revoked);
        assert!(!doc.refresh_tokens["a2"].revoked);
        assert!(!doc.refresh_tokens["b1"].revoked);
    }
}
