//! In-process repository backend.
//!
//! Keeps every record behind one `RwLock`, so multi-record operations
//! (create with owner check, donate) run in a single write critical section.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{
    Cauza, CauzaChanges, CauzaFilter, Donation, NewCauza, NewDonation, NewUser, User,
};
use crate::repositories::{
    CauzaRepository, StoreHealth, UserRepository, collected_sum_overflow,
};

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    cauze: BTreeMap<i64, Cauza>,
    donations: Vec<Donation>,
    next_user_id: i64,
    next_cauza_id: i64,
    next_donation_id: i64,
}

impl MemoryState {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn cauza_mut(&mut self, cauza_id: i64) -> Result<&mut Cauza, AppError> {
        self.cauze
            .get_mut(&cauza_id)
            .ok_or_else(|| AppError::not_found("Cauza", cauza_id))
    }
}

/// Shared in-memory store implementing every repository trait.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::Duplicate {
                entity: "users".to_string(),
                field: "email".to_string(),
                value: new_user.email,
            });
        }

        let id = MemoryState::next_id(&mut state.next_user_id);
        let user = User {
            id,
            username: new_user.username,
            email: new_user.email,
            created_at: Timestamp::now(),
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, AppError> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, AppError> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn list_donations(&self, user_id: i64) -> Result<Vec<Donation>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .donations
            .iter()
            .rev()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CauzaRepository for MemoryStore {
    async fn insert_for_owner(&self, new_cauza: NewCauza) -> Result<Cauza, AppError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&new_cauza.user_id) {
            return Err(AppError::not_found("User", new_cauza.user_id));
        }

        let id = MemoryState::next_id(&mut state.next_cauza_id);
        let now = Timestamp::now();
        let cauza = Cauza {
            id,
            user_id: new_cauza.user_id,
            titlu: new_cauza.titlu,
            descriere: new_cauza.descriere,
            locatie: new_cauza.locatie,
            suma_necesara: new_cauza.suma_necesara,
            suma_stransa: new_cauza.suma_stransa,
            rezolvata: new_cauza.rezolvata,
            adapost: new_cauza.adapost,
            poze: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        state.cauze.insert(id, cauza.clone());
        Ok(cauza)
    }

    async fn find_by_id(&self, cauza_id: i64) -> Result<Option<Cauza>, AppError> {
        Ok(self.state.read().await.cauze.get(&cauza_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Cauza>, AppError> {
        Ok(self.state.read().await.cauze.values().cloned().collect())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Cauza>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .cauze
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        cauza_id: i64,
        changes: CauzaChanges,
    ) -> Result<Option<Cauza>, AppError> {
        let mut state = self.state.write().await;
        Ok(state.cauze.get_mut(&cauza_id).map(|cauza| {
            changes.apply_to(cauza);
            cauza.updated_at = Timestamp::now();
            cauza.clone()
        }))
    }

    async fn delete(&self, cauza_id: i64) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        if state.cauze.remove(&cauza_id).is_none() {
            return Ok(false);
        }
        for donation in state
            .donations
            .iter_mut()
            .filter(|d| d.cauza_id == Some(cauza_id))
        {
            donation.cauza_id = None;
        }
        Ok(true)
    }

    async fn filter(&self, filter: &CauzaFilter) -> Result<Vec<Cauza>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .cauze
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn clear_images(&self, cauza_id: i64) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let cauza = state.cauza_mut(cauza_id)?;
        cauza.poze.clear();
        cauza.updated_at = Timestamp::now();
        Ok(())
    }

    async fn add_image(&self, cauza_id: i64, reference: String) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let cauza = state.cauza_mut(cauza_id)?;
        cauza.poze.push(reference);
        cauza.updated_at = Timestamp::now();
        Ok(())
    }

    async fn donate(&self, donation: NewDonation) -> Result<(Cauza, Donation), AppError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&donation.user_id) {
            return Err(AppError::not_found("User", donation.user_id));
        }

        let cauza = state.cauza_mut(donation.cauza_id)?;
        let collected = cauza
            .suma_stransa
            .checked_add(donation.suma)
            .ok_or_else(collected_sum_overflow)?;
        cauza.suma_stransa = collected;
        cauza.updated_at = Timestamp::now();
        let updated = cauza.clone();

        let id = MemoryState::next_id(&mut state.next_donation_id);
        let recorded = Donation {
            id,
            user_id: donation.user_id,
            cauza_id: Some(donation.cauza_id),
            suma: donation.suma,
            moneda: donation.moneda,
            created_at: Timestamp::now(),
        };
        state.donations.push(recorded.clone());

        Ok((updated, recorded))
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        let _ = self.state.read().await;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_owner() -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let owner = UserRepository::create(
            &store,
            NewUser {
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
            },
        )
        .await
        .unwrap();
        (store, owner)
    }

    fn new_cauza(user_id: i64) -> NewCauza {
        NewCauza {
            user_id,
            titlu: "Adapost pentru caini".to_string(),
            descriere: "Renovare".to_string(),
            locatie: "Cluj".to_string(),
            suma_necesara: 1000,
            suma_stransa: 0,
            rezolvata: false,
            adapost: true,
        }
    }

    #[tokio::test]
    async fn test_insert_requires_owner() {
        let store = MemoryStore::new();
        let err = store.insert_for_owner(new_cauza(42)).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found!");
        assert!(CauzaRepository::list_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (store, _) = store_with_owner().await;
        let err = UserRepository::create(
            &store,
            NewUser {
                username: "alta".to_string(),
                email: "ana@example.com".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_donate_for_missing_user_leaves_sum_unchanged() {
        let (store, owner) = store_with_owner().await;
        let cauza = store.insert_for_owner(new_cauza(owner.id)).await.unwrap();

        let err = store
            .donate(NewDonation {
                user_id: 999,
                cauza_id: cauza.id,
                suma: 50,
                moneda: "RON".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { ref entity, .. } if entity == "User"));

        let stored = CauzaRepository::find_by_id(&store, cauza.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.suma_stransa, 0);
    }

    #[tokio::test]
    async fn test_delete_detaches_donations() {
        let (store, owner) = store_with_owner().await;
        let cauza = store.insert_for_owner(new_cauza(owner.id)).await.unwrap();
        store
            .donate(NewDonation {
                user_id: owner.id,
                cauza_id: cauza.id,
                suma: 10,
                moneda: "EUR".to_string(),
            })
            .await
            .unwrap();

        assert!(store.delete(cauza.id).await.unwrap());
        assert!(!store.delete(cauza.id).await.unwrap());

        let history = store.list_donations(owner.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].cauza_id, None);
    }

    #[tokio::test]
    async fn test_images_are_appended_in_order() {
        let (store, owner) = store_with_owner().await;
        let cauza = store.insert_for_owner(new_cauza(owner.id)).await.unwrap();

        store.add_image(cauza.id, "/cauza/image/1a.jpg".to_string()).await.unwrap();
        store.add_image(cauza.id, "/cauza/image/1b.jpg".to_string()).await.unwrap();
        let stored = CauzaRepository::find_by_id(&store, cauza.id).await.unwrap().unwrap();
        assert_eq!(stored.poze, vec!["/cauza/image/1a.jpg", "/cauza/image/1b.jpg"]);

        store.clear_images(cauza.id).await.unwrap();
        let stored = CauzaRepository::find_by_id(&store, cauza.id).await.unwrap().unwrap();
        assert!(stored.poze.is_empty());

        assert!(store.add_image(777, "x".to_string()).await.is_err());
    }
}
