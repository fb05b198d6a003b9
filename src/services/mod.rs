//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the image store and handlers.

mod cauza_service;
mod image_store;
mod user_service;

pub use cauza_service::{CauzaService, MISSING_PICTURES, UploadedImage};
pub use image_store::ImageStore;
pub use user_service::UserService;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap: every field is reference counted.
#[derive(Clone)]
pub struct Services {
    pub cauze: CauzaService,
    pub users: UserService,
}

impl Services {
    pub fn new(repos: Repositories, images: ImageStore) -> Self {
        Self {
            cauze: CauzaService::new(repos.cauze.clone(), repos.users.clone(), images),
            users: UserService::new(repos.users, repos.cauze),
        }
    }
}
