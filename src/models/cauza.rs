//! Fundraising case ("cauza") domain types.

use std::cmp::Ordering;

use jiff::Timestamp;

/// Public path prefix under which stored case images are served.
pub const IMAGE_ROUTE_PREFIX: &str = "/cauza/image/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cauza {
    pub id: i64,
    pub user_id: i64,
    pub titlu: String,
    pub descriere: String,
    pub locatie: String,
    pub suma_necesara: i32,
    pub suma_stransa: i32,
    pub rezolvata: bool,
    pub adapost: bool,
    /// Image references in upload order, e.g. `/cauza/image/3poza.jpg`.
    pub poze: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Cauza {
    /// Amount still missing from the target, never negative.
    pub fn remaining(&self) -> i32 {
        self.suma_necesara.saturating_sub(self.suma_stransa).max(0)
    }

    /// Listing order: unresolved cases first, then the ones closest to
    /// their target, then by id.
    pub fn display_order(&self, other: &Self) -> Ordering {
        (self.rezolvata, self.remaining(), self.id).cmp(&(
            other.rezolvata,
            other.remaining(),
            other.id,
        ))
    }
}

/// File name under which an uploaded picture of case `id` is stored.
pub fn stored_image_name(id: i64, file_name: &str) -> String {
    format!("{}{}", id, file_name)
}

/// Reference appended to `poze` for a stored picture.
pub fn image_reference(stored_name: &str) -> String {
    format!("{}{}", IMAGE_ROUTE_PREFIX, stored_name)
}

/// Fields of a case about to be created. Owner and images are set by the
/// repository: images always start empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCauza {
    pub user_id: i64,
    pub titlu: String,
    pub descriere: String,
    pub locatie: String,
    pub suma_necesara: i32,
    pub suma_stransa: i32,
    pub rezolvata: bool,
    pub adapost: bool,
}

/// Partial update of a case. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CauzaChanges {
    pub titlu: Option<String>,
    pub descriere: Option<String>,
    pub locatie: Option<String>,
    pub suma_necesara: Option<i32>,
    pub rezolvata: Option<bool>,
    pub adapost: Option<bool>,
}

impl CauzaChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, cauza: &mut Cauza) {
        if let Some(titlu) = &self.titlu {
            cauza.titlu = titlu.clone();
        }
        if let Some(descriere) = &self.descriere {
            cauza.descriere = descriere.clone();
        }
        if let Some(locatie) = &self.locatie {
            cauza.locatie = locatie.clone();
        }
        if let Some(suma) = self.suma_necesara {
            cauza.suma_necesara = suma;
        }
        if let Some(rezolvata) = self.rezolvata {
            cauza.rezolvata = rezolvata;
        }
        if let Some(adapost) = self.adapost {
            cauza.adapost = adapost;
        }
    }
}

/// Conjunction of the five filter predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CauzaFilter {
    pub locatie: String,
    pub sum_min: i32,
    pub sum_max: i32,
    pub rezolvata: bool,
    pub adapost: bool,
}

impl CauzaFilter {
    /// Location compared case-insensitively, surrounding whitespace ignored.
    pub fn normalized_locatie(&self) -> String {
        self.locatie.trim().to_lowercase()
    }

    pub fn matches(&self, cauza: &Cauza) -> bool {
        cauza.locatie.trim().to_lowercase() == self.normalized_locatie()
            && (self.sum_min..=self.sum_max).contains(&cauza.suma_necesara)
            && cauza.rezolvata == self.rezolvata
            && cauza.adapost == self.adapost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cauza(id: i64, necesara: i32, stransa: i32, rezolvata: bool) -> Cauza {
        Cauza {
            id,
            user_id: 1,
            titlu: format!("Cauza {}", id),
            descriere: String::new(),
            locatie: "Cluj".to_string(),
            suma_necesara: necesara,
            suma_stransa: stransa,
            rezolvata,
            adapost: false,
            poze: Vec::new(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_remaining_is_floored_at_zero() {
        assert_eq!(cauza(1, 500, 200, false).remaining(), 300);
        assert_eq!(cauza(1, 500, 900, false).remaining(), 0);
        assert_eq!(cauza(1, i32::MIN, i32::MAX, false).remaining(), 0);
    }

    #[test]
    fn test_display_order() {
        let mut cases = vec![
            cauza(1, 100, 100, true),
            cauza(2, 1000, 100, false),
            cauza(3, 300, 100, false),
            cauza(4, 300, 100, false),
        ];
        cases.sort_by(Cauza::display_order);
        let ids: Vec<i64> = cases.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 4, 2, 1]);
    }

    #[test]
    fn test_image_names() {
        let stored = stored_image_name(12, "poza.jpg");
        assert_eq!(stored, "12poza.jpg");
        assert_eq!(image_reference(&stored), "/cauza/image/12poza.jpg");
    }

    #[test]
    fn test_changes_apply_only_given_fields() {
        let mut target = cauza(1, 100, 10, false);
        let changes = CauzaChanges {
            titlu: Some("Nou".to_string()),
            rezolvata: Some(true),
            ..Default::default()
        };
        changes.apply_to(&mut target);
        assert_eq!(target.titlu, "Nou");
        assert!(target.rezolvata);
        assert_eq!(target.suma_necesara, 100);
        assert!(!changes.is_empty());
        assert!(CauzaChanges::default().is_empty());
    }

    #[test]
    fn test_filter_matches_all_predicates() {
        let filter = CauzaFilter {
            locatie: "  cluj ".to_string(),
            sum_min: 100,
            sum_max: 500,
            rezolvata: false,
            adapost: false,
        };
        assert!(filter.matches(&cauza(1, 100, 0, false)));
        assert!(filter.matches(&cauza(2, 500, 0, false)));
        assert!(!filter.matches(&cauza(3, 501, 0, false)));
        assert!(!filter.matches(&cauza(4, 200, 0, true)));

        let mut elsewhere = cauza(5, 200, 0, false);
        elsewhere.locatie = "Iasi".to_string();
        assert!(!filter.matches(&elsewhere));
    }
}
