// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{
    CredentialStore, RefreshTokenStore, StoreError, StoreResult, StoredToken, TokenKind,
    UserRecord,
};

#[derive(Default)]
struct Inner {
    users: HashMap<u64, UserRecord>,
    next_user_id: u64,
    tokens: HashMap<String, StoredToken>,
}

/// Users and token rows kept in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of outstanding token rows, expired or not.
    pub async fn token_count(&self) -> usize {
        self.inner.read().await.tokens.len()
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_user_by_id(&self, id: u64) -> StoreResult<Option<UserRecord>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_login_id(&self, login_id: &str) -> StoreResult<Option<UserRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|user| user.login_id == login_id)
            .cloned())
    }

    async fn insert_user(&self, mut user: UserRecord) -> StoreResult<UserRecord> {
        let mut inner = self.inner.write().await;

        if user.id != 0 && inner.users.contains_key(&user.id) {
            return Err(StoreError::AlreadyExists(format!("user {}", user.id)));
        }
        let clash = inner.users.values().any(|existing| {
            existing.email.eq_ignore_ascii_case(&user.email)
                || (!user.login_id.is_empty() && existing.login_id == user.login_id)
        });
        if clash {
            return Err(StoreError::AlreadyExists(format!("user {}", user.email)));
        }

        if user.id == 0 {
            let highest = inner.users.keys().copied().max().unwrap_or(0);
            let next = inner.next_user_id.max(highest) + 1;
            inner.next_user_id = next;
            user.id = next;
        }
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryStore {
    async fn create(&self, token: StoredToken) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.tokens.contains_key(&token.value) {
            return Err(StoreError::AlreadyExists("token".to_string()));
        }
        inner.tokens.insert(token.value.clone(), token);
        Ok(())
    }

    async fn take(&self, value: &str, kind: TokenKind) -> StoreResult<StoredToken> {
        let mut inner = self.inner.write().await;
        match inner.tokens.get(value) {
            Some(row) if row.kind == kind => {}
            _ => return Err(StoreError::NotFound("token".to_string())),
        }

        let row = inner
            .tokens
            .remove(value)
            .ok_or_else(|| StoreError::NotFound("token".to_string()))?;
        if row.is_expired_at(Utc::now()) {
            return Err(StoreError::Expired("token".to_string()));
        }
        Ok(row)
    }

    async fn delete_all_for_user(&self, user_id: u64) -> StoreResult<usize> {
        let mut inner = self.inner.write().await;
        let before = inner.tokens.len();
        inner.tokens.retain(|_, row| row.user_id != user_id);
        Ok(before - inner.tokens.len())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        let mut inner = self.inner.write().await;
        let before = inner.tokens.len();
        inner.tokens.retain(|_, row| !row.is_expired_at(now));
        Ok(before - inner.tokens.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use chrono::TimeDelta;

    fn user(id: u64, login_id: &str, email: &str) -> UserRecord {
        UserRecord {
            id,
            login_id: login_id.to_string(),
            first_name: "Test".to_string(),
            middle_name: String::new(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            role: Role::Student,
            active: true,
        }
    }

    fn refresh_row(user_id: u64, value: &str, ttl: TimeDelta) -> StoredToken {
        StoredToken::new(user_id, value, TokenKind::Refresh, Utc::now() + ttl)
    }

    #[tokio::test]
    async fn user_lookups() {
        let store = InMemoryStore::new();
        store.insert_user(user(42, "11S20001", "a@example.ac.id")).await.unwrap();

        assert_eq!(store.find_user_by_id(42).await.unwrap().unwrap().login_id, "11S20001");
        assert!(store.find_user_by_id(7).await.unwrap().is_none());
        assert_eq!(
            store.find_user_by_email("A@EXAMPLE.ac.id").await.unwrap().unwrap().id,
            42
        );
        assert_eq!(store.find_user_by_login_id("11S20001").await.unwrap().unwrap().id, 42);
    }

    #[tokio::test]
    async fn insert_allocates_ids_after_existing() {
        let store = InMemoryStore::new();
        store.insert_user(user(42, "A", "a@example.ac.id")).await.unwrap();
        let allocated = store.insert_user(user(0, "B", "b@example.ac.id")).await.unwrap();
        assert_eq!(allocated.id, 43);
    }

    #[tokio::test]
    async fn insert_rejects_duplicates() {
        let store = InMemoryStore::new();
        store.insert_user(user(1, "A", "a@example.ac.id")).await.unwrap();

        let same_id = store.insert_user(user(1, "B", "b@example.ac.id")).await;
        assert!(matches!(same_id, Err(StoreError::AlreadyExists(_))));

        let same_email = store.insert_user(user(0, "C", "a@example.ac.id")).await;
        assert!(matches!(same_email, Err(StoreError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn take_is_single_use() {
        let store = InMemoryStore::new();
        store.create(refresh_row(42, "abc", TimeDelta::hours(1))).await.unwrap();

        let row = store.take("abc", TokenKind::Refresh).await.unwrap();
        assert_eq!(row.user_id, 42);

        let replay = store.take("abc", TokenKind::Refresh).await;
        assert!(matches!(replay, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn take_of_expired_row_deletes_it() {
        let store = InMemoryStore::new();
        store.create(refresh_row(42, "old", -TimeDelta::minutes(1))).await.unwrap();

        let result = store.take("old", TokenKind::Refresh).await;
        assert!(matches!(result, Err(StoreError::Expired(_))));
        assert_eq!(store.token_count().await, 0);
    }

    #[tokio::test]
    async fn take_with_wrong_kind_leaves_row() {
        let store = InMemoryStore::new();
        store
            .create(StoredToken::new(
                42,
                "verify-me",
                TokenKind::Verification,
                Utc::now() + TimeDelta::hours(1),
            ))
            .await
            .unwrap();

        let result = store.take("verify-me", TokenKind::Refresh).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.token_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_value_is_rejected() {
        let store = InMemoryStore::new();
        store.create(refresh_row(1, "dup", TimeDelta::hours(1))).await.unwrap();
        let result = store.create(refresh_row(2, "dup", TimeDelta::hours(1))).await;
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn bulk_deletes() {
        let store = InMemoryStore::new();
        store.create(refresh_row(1, "a", TimeDelta::hours(1))).await.unwrap();
        store.create(refresh_row(1, "b", TimeDelta::hours(1))).await.unwrap();
        store.create(refresh_row(2, "c", -TimeDelta::hours(1))).await.unwrap();
        store.create(refresh_row(3, "d", TimeDelta::hours(1))).await.unwrap();

        assert_eq!(store.delete_expired(Utc::now()).await.unwrap(), 1);
        assert_eq!(store.delete_all_for_user(1).await.unwrap(), 2);
        assert_eq!(store.delete_all_for_user(1).await.unwrap(), 0);
        assert_eq!(store.token_count().await, 1);
    }
}
