mod cauza;
mod donation;
mod user;

pub use cauza::{
    Cauza, CauzaChanges, CauzaFilter, IMAGE_ROUTE_PREFIX, NewCauza, image_reference,
    stored_image_name,
};
pub use donation::{Donation, NewDonation};
pub use user::{NewUser, User};
