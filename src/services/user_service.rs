//! User service for business logic operations.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Donation, NewUser, User};
use crate::repositories::{CauzaRepository, UserRepository};

/// User service for handling user-related business logic.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    cauze: Arc<dyn CauzaRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, cauze: Arc<dyn CauzaRepository>) -> Self {
        Self { users, cauze }
    }

    /// Creates a new user.
    ///
    /// # Returns
    /// The created user, or `Duplicate` when the email is taken
    pub async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let user = self.users.create(new_user).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Gets a user by their ID.
    ///
    /// # Returns
    /// The user if found, or `NotFound` error
    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))
    }

    /// Gets a user together with the ids of the cases they own.
    pub async fn get_user_with_cases(&self, id: i64) -> AppResult<(User, Vec<i64>)> {
        let user = self.get_user(id).await?;
        let cauze = self.cauze.list_by_user(id).await?;
        Ok((user, cauze.into_iter().map(|c| c.id).collect()))
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list_all().await
    }

    /// A user's donations, newest first.
    pub async fn donation_history(&self, id: i64) -> AppResult<Vec<Donation>> {
        self.get_user(id).await?;
        self.users.list_donations(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewCauza, NewDonation};
    use crate::repositories::Repositories;

    fn service(repos: &Repositories) -> UserService {
        UserService::new(repos.users.clone(), repos.cauze.clone())
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let repos = Repositories::memory();
        let err = service(&repos).get_user(3).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found!");
    }

    #[tokio::test]
    async fn test_user_with_cases_and_history() {
        let repos = Repositories::memory();
        let users = service(&repos);
        let user = users
            .create_user(NewUser {
                username: "maria".to_string(),
                email: "maria@example.com".to_string(),
            })
            .await
            .unwrap();

        let cauza = repos
            .cauze
            .insert_for_owner(NewCauza {
                user_id: user.id,
                titlu: "Hrana".to_string(),
                descriere: String::new(),
                locatie: "Brasov".to_string(),
                suma_necesara: 200,
                suma_stransa: 0,
                rezolvata: false,
                adapost: false,
            })
            .await
            .unwrap();

        for suma in [5, 7] {
            repos
                .cauze
                .donate(NewDonation {
                    user_id: user.id,
                    cauza_id: cauza.id,
                    suma,
                    moneda: "RON".to_string(),
                })
                .await
                .unwrap();
        }

        let (_, owned) = users.get_user_with_cases(user.id).await.unwrap();
        assert_eq!(owned, vec![cauza.id]);

        let history = users.donation_history(user.id).await.unwrap();
        let sums: Vec<i32> = history.iter().map(|d| d.suma).collect();
        assert_eq!(sums, vec![7, 5]);
    }
}
