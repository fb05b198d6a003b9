//! Case service: the business rules behind the `/cauza` endpoints.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::{AppError, AppResult};
use crate::models::{
    Cauza, CauzaChanges, CauzaFilter, Donation, NewCauza, NewDonation, image_reference,
    stored_image_name,
};
use crate::repositories::{CauzaRepository, UserRepository};
use crate::services::ImageStore;

static CURRENCY_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{3}$").expect("currency pattern is valid")
});

pub const MISSING_PICTURES: &str = "Required part 'pictures' is missing";

/// One file received in an image upload.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct CauzaService {
    cauze: Arc<dyn CauzaRepository>,
    users: Arc<dyn UserRepository>,
    images: ImageStore,
}

impl CauzaService {
    pub fn new(
        cauze: Arc<dyn CauzaRepository>,
        users: Arc<dyn UserRepository>,
        images: ImageStore,
    ) -> Self {
        Self {
            cauze,
            users,
            images,
        }
    }

    /// Gets a case by id.
    ///
    /// # Returns
    /// The case, or `NotFound` ("Cauza not found!")
    pub async fn get(&self, id: i64) -> AppResult<Cauza> {
        self.cauze
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Cauza", id))
    }

    pub async fn list_all(&self) -> AppResult<Vec<Cauza>> {
        self.cauze.list_all().await
    }

    /// All cases in display order (see [`Cauza::display_order`]).
    pub async fn list_sorted(&self) -> AppResult<Vec<Cauza>> {
        let mut cauze = self.cauze.list_all().await?;
        cauze.sort_by(Cauza::display_order);
        Ok(cauze)
    }

    /// Cases owned by a user.
    ///
    /// # Returns
    /// The user's cases, or `NotFound` ("User not found!") for an unknown user
    pub async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<Cauza>> {
        self.ensure_user(user_id).await?;
        self.cauze.list_by_user(user_id).await
    }

    /// Creates a case for the owner named in `new_cauza.user_id`.
    pub async fn create(&self, new_cauza: NewCauza) -> AppResult<Cauza> {
        let cauza = self.cauze.insert_for_owner(new_cauza).await?;
        tracing::info!(cauza_id = cauza.id, user_id = cauza.user_id, "Cauza created");
        Ok(cauza)
    }

    pub async fn update(&self, id: i64, changes: CauzaChanges) -> AppResult<Cauza> {
        self.cauze
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("Cauza", id))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.cauze.delete(id).await? {
            return Err(AppError::not_found("Cauza", id));
        }
        tracing::info!(cauza_id = id, "Cauza deleted");
        Ok(())
    }

    /// Cases matching every predicate of `filter`.
    ///
    /// # Errors
    /// `Validation` when `sum_min` exceeds `sum_max`
    pub async fn filter(&self, filter: CauzaFilter) -> AppResult<Vec<Cauza>> {
        if filter.sum_min > filter.sum_max {
            return Err(AppError::validation(
                "sumMin",
                format!(
                    "sumMin ({}) must not exceed sumMax ({})",
                    filter.sum_min, filter.sum_max
                ),
            ));
        }
        self.cauze.filter(&filter).await
    }

    /// Adds `sum` to the case and records the donation for the user.
    ///
    /// # Arguments
    /// * `cauza_id` - The case receiving the money
    /// * `user_id` - The donor
    /// * `sum` - Positive amount
    /// * `currency` - Three-letter code, case-insensitive
    ///
    /// # Returns
    /// The case after the donation and the recorded donation
    pub async fn donate(
        &self,
        cauza_id: i64,
        user_id: i64,
        sum: i32,
        currency: &str,
    ) -> AppResult<(Cauza, Donation)> {
        if sum <= 0 {
            return Err(AppError::validation("sum", "Donation sum must be positive"));
        }

        let moneda = currency.trim().to_uppercase();
        if !CURRENCY_CODE.is_match(&moneda) {
            return Err(AppError::validation(
                "currency",
                format!("'{}' is not a three-letter currency code", currency),
            ));
        }

        let (cauza, donation) = self
            .cauze
            .donate(NewDonation {
                user_id,
                cauza_id,
                suma: sum,
                moneda,
            })
            .await?;

        tracing::info!(
            cauza_id,
            user_id,
            sum,
            currency = %donation.moneda,
            collected = cauza.suma_stransa,
            "Donation recorded"
        );
        Ok((cauza, donation))
    }

    /// Replaces the case's pictures with `files`, in order.
    ///
    /// The reference list is cleared first. Each file is written as
    /// `{id}{file name}` and then registered. Processing stops at the first
    /// failure; files handled before it stay written and registered.
    ///
    /// # Returns
    /// The number of pictures saved. An empty upload is rejected before the
    /// existing references are touched.
    pub async fn save_images(&self, id: i64, files: Vec<UploadedImage>) -> AppResult<usize> {
        self.get(id).await?;
        if files.is_empty() {
            return Err(AppError::bad_request(MISSING_PICTURES));
        }
        self.cauze.clear_images(id).await?;

        let mut saved = 0;
        for file in files {
            let file_name = ImageStore::upload_file_name(&file.file_name)?;
            let stored = stored_image_name(id, &file_name);
            self.images.write(&stored, &file.bytes).await?;
            self.cauze.add_image(id, image_reference(&stored)).await?;
            saved += 1;
        }

        tracing::info!(cauza_id = id, saved, "Pictures saved");
        Ok(saved)
    }

    /// Reads a stored picture.
    ///
    /// # Returns
    /// The file contents and a content type guessed from the extension
    pub async fn read_image(&self, name: &str) -> AppResult<(Vec<u8>, &'static str)> {
        let bytes = self.images.read(name).await?;
        Ok((bytes, ImageStore::content_type(name)))
    }

    async fn ensure_user(&self, user_id: i64) -> AppResult<()> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("User", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::repositories::Repositories;
    use tempfile::TempDir;

    struct Fixture {
        service: CauzaService,
        repos: Repositories,
        images: TempDir,
    }

    async fn fixture() -> Fixture {
        let images = TempDir::new().unwrap();
        let repos = Repositories::memory();
        let service = CauzaService::new(
            repos.cauze.clone(),
            repos.users.clone(),
            ImageStore::new(images.path()),
        );
        Fixture {
            service,
            repos,
            images,
        }
    }

    async fn owner(fx: &Fixture) -> i64 {
        fx.repos
            .users
            .create(NewUser {
                username: "ion".to_string(),
                email: "ion@example.com".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn draft(user_id: i64, locatie: &str, necesara: i32, stransa: i32, rezolvata: bool) -> NewCauza {
        NewCauza {
            user_id,
            titlu: format!("Cauza din {}", locatie),
            descriere: String::new(),
            locatie: locatie.to_string(),
            suma_necesara: necesara,
            suma_stransa: stransa,
            rezolvata,
            adapost: false,
        }
    }

    #[tokio::test]
    async fn test_list_sorted_order() {
        let fx = fixture().await;
        let user = owner(&fx).await;
        let a = fx.service.create(draft(user, "Cluj", 500, 500, true)).await.unwrap();
        let b = fx.service.create(draft(user, "Iasi", 900, 100, false)).await.unwrap();
        let c = fx.service.create(draft(user, "Arad", 300, 0, false)).await.unwrap();

        let ids: Vec<i64> = fx.service.list_sorted().await.unwrap().iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn test_list_by_unknown_user() {
        let fx = fixture().await;
        let err = fx.service.list_by_user(5).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found!");
    }

    #[tokio::test]
    async fn test_filter_rejects_inverted_range() {
        let fx = fixture().await;
        let filter = CauzaFilter {
            locatie: "Cluj".to_string(),
            sum_min: 10,
            sum_max: 1,
            rezolvata: false,
            adapost: false,
        };
        assert!(matches!(
            fx.service.filter(filter).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_donate_validates_input() {
        let fx = fixture().await;
        let user = owner(&fx).await;
        let cauza = fx.service.create(draft(user, "Cluj", 100, 0, false)).await.unwrap();

        assert!(fx.service.donate(cauza.id, user, 0, "RON").await.is_err());
        assert!(fx.service.donate(cauza.id, user, 10, "LEU1").await.is_err());

        let (updated, donation) = fx.service.donate(cauza.id, user, 25, "eur").await.unwrap();
        assert_eq!(updated.suma_stransa, 25);
        assert_eq!(donation.moneda, "EUR");
        assert_eq!(donation.cauza_id, Some(cauza.id));
    }

    #[tokio::test]
    async fn test_save_images_stops_at_first_failure() {
        let fx = fixture().await;
        let user = owner(&fx).await;
        let cauza = fx.service.create(draft(user, "Cluj", 100, 0, false)).await.unwrap();
        fx.repos
            .cauze
            .add_image(cauza.id, "/cauza/image/old.jpg".to_string())
            .await
            .unwrap();

        let files = vec![
            UploadedImage {
                file_name: "a.jpg".to_string(),
                bytes: b"a".to_vec(),
            },
            UploadedImage {
                file_name: ".hidden".to_string(),
                bytes: b"b".to_vec(),
            },
            UploadedImage {
                file_name: "c.jpg".to_string(),
                bytes: b"c".to_vec(),
            },
        ];
        assert!(fx.service.save_images(cauza.id, files).await.is_err());

        let stored = fx.service.get(cauza.id).await.unwrap();
        assert_eq!(stored.poze, vec![format!("/cauza/image/{}a.jpg", cauza.id)]);
        assert!(fx.images.path().join(format!("{}a.jpg", cauza.id)).exists());
        assert!(!fx.images.path().join(format!("{}c.jpg", cauza.id)).exists());
    }

    #[tokio::test]
    async fn test_save_images_keeps_earlier_files_when_a_write_fails() {
        let fx = fixture().await;
        let user = owner(&fx).await;
        let cauza = fx.service.create(draft(user, "Iasi", 100, 0, false)).await.unwrap();
        std::fs::create_dir(fx.images.path().join(format!("{}b.png", cauza.id))).unwrap();

        let files = vec![
            UploadedImage {
                file_name: "a.png".to_string(),
                bytes: b"a".to_vec(),
            },
            UploadedImage {
                file_name: "b.png".to_string(),
                bytes: b"b".to_vec(),
            },
            UploadedImage {
                file_name: "c.png".to_string(),
                bytes: b"c".to_vec(),
            },
        ];
        let err = fx.service.save_images(cauza.id, files).await.unwrap_err();
        assert!(matches!(err, AppError::Storage { .. }));

        let stored = fx.service.get(cauza.id).await.unwrap();
        assert_eq!(stored.poze, vec![format!("/cauza/image/{}a.png", cauza.id)]);
        assert!(fx.images.path().join(format!("{}a.png", cauza.id)).is_file());
        assert!(!fx.images.path().join(format!("{}c.png", cauza.id)).exists());
    }

    #[tokio::test]
    async fn test_save_images_rejects_empty_upload() {
        let fx = fixture().await;
        let user = owner(&fx).await;
        let cauza = fx.service.create(draft(user, "Cluj", 100, 0, false)).await.unwrap();
        fx.repos
            .cauze
            .add_image(cauza.id, "/cauza/image/old.jpg".to_string())
            .await
            .unwrap();

        let err = fx.service.save_images(cauza.id, Vec::new()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));

        let stored = fx.service.get(cauza.id).await.unwrap();
        assert_eq!(stored.poze, vec!["/cauza/image/old.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_donate_rejects_collected_sum_overflow() {
        let fx = fixture().await;
        let user = owner(&fx).await;
        let cauza = fx
            .service
            .create(draft(user, "Cluj", 100, i32::MAX - 5, false))
            .await
            .unwrap();

        let err = fx.service.donate(cauza.id, user, 10, "RON").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "sum"));

        let stored = fx.service.get(cauza.id).await.unwrap();
        assert_eq!(stored.suma_stransa, i32::MAX - 5);
        assert!(fx.repos.users.list_donations(user).await.unwrap().is_empty());

        let (updated, _) = fx.service.donate(cauza.id, user, 5, "RON").await.unwrap();
        assert_eq!(updated.suma_stransa, i32::MAX);
    }

    #[tokio::test]
    async fn test_save_images_for_missing_case() {
        let fx = fixture().await;
        let err = fx.service.save_images(9, Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Cauza not found!");
    }
}
