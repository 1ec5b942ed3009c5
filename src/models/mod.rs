use serde::{Deserialize, Serialize};

/// Who awarded the star rating of a property
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StarType {
    Official,
    Booking,
    #[default]
    Unknown,
}

/// Star rating of a property, 0-5
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Star {
    pub count: u8,
    #[serde(rename = "type")]
    pub kind: StarType,
}

impl Star {
    pub const MAX: u8 = 5;

    /// Builds a star rating from the number of filled icons. The type is only
    /// meaningful when at least one star is shown.
    pub fn new(count: usize, kind: StarType) -> Self {
        let count = count.min(Self::MAX as usize) as u8;
        let kind = if count == 0 { StarType::Unknown } else { kind };
        Self { count, kind }
    }
}

/// Where the aggregate score of a property comes from
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RatingType {
    Booking,
    External,
    #[default]
    Unknown,
}

/// One of the seven category scores shown next to the aggregate score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subrating {
    Staff,
    Facilities,
    Cleanliness,
    Comfort,
    Value,
    Location,
    Wifi,
}

/// Aggregate score and subratings, all on a 0.0-10.0 scale
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OverallRating {
    #[serde(rename = "type")]
    pub kind: RatingType,
    pub average: Option<f64>,
    pub staff: Option<f64>,
    pub facilities: Option<f64>,
    pub cleanliness: Option<f64>,
    pub comfort: Option<f64>,
    pub value: Option<f64>,
    pub location: Option<f64>,
    pub wifi: Option<f64>,
}

impl OverallRating {
    pub fn set(&mut self, field: Subrating, score: f64) {
        let slot = match field {
            Subrating::Staff => &mut self.staff,
            Subrating::Facilities => &mut self.facilities,
            Subrating::Cleanliness => &mut self.cleanliness,
            Subrating::Comfort => &mut self.comfort,
            Subrating::Value => &mut self.value,
            Subrating::Location => &mut self.location,
            Subrating::Wifi => &mut self.wifi,
        };
        *slot = Some(score);
    }
}

/// Traveller category of a reviewer
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Group,
    Family,
    Single,
    Couple,
    #[default]
    Unknown,
}

/// A single guest review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub user_name: String,
    pub user_type: UserType,
    pub country: Option<String>,
    pub room_name: String,
    pub num_stay_night: u32,
    /// `YYYY-MM`
    pub stay_date: String,
    /// `YYYY-MM-DD`
    pub review_date: String,
    pub title: String,
    pub positive_description: Option<String>,
    pub negative_description: Option<String>,
    pub rating: f64,
}

/// Review section of a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserReview {
    pub overall_rating: OverallRating,
    /// Total reported by the site
    pub count: u32,
    /// Number of reviews actually collected, always `reviews.len()`
    pub count_crawled: usize,
    pub reviews: Vec<Review>,
}

impl UserReview {
    pub fn extend_reviews(&mut self, reviews: impl IntoIterator<Item = Review>) {
        self.reviews.extend(reviews);
        self.count_crawled = self.reviews.len();
    }
}

/// Full record for one hotel listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingData {
    pub name: String,
    pub address: String,
    pub slogan: Option<String>,
    pub description: String,
    pub star: Star,
    pub user_review: UserReview,
}
