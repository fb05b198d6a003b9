//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `cauza` - Case request/response DTOs and filter parameters
//! - `user` - User request/response DTOs
//! - `donation` - Donation records
//! - `health` - Health check responses
//! - `error` - Common error response DTOs

mod cauza;
mod donation;
mod error;
mod health;
mod user;

pub use cauza::{CauzaResponse, CreateCauzaRequest, FilterParams, UpdateCauzaRequest, UploadPictures};
pub use donation::DonationResponse;
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use user::{CreateUserRequest, UserDetailResponse, UserResponse};
