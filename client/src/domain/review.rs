//! Event reviews and the review submission form.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest accepted rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating.
pub const RATING_MAX: u8 = 5;
/// Minimum review length in characters after trimming.
pub const REVIEW_TEXT_MIN_LEN: usize = 10;

/// Moderation state of a review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Awaiting moderation.
    #[default]
    Pending,
    /// Visible to everyone.
    Approved,
    /// Hidden by a moderator.
    Rejected,
}

/// Review as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Review {
    /// Backend identifier.
    pub id: u64,
    /// Reviewed event.
    pub event: u64,
    /// Author identifier.
    #[serde(default)]
    pub user: Option<u64>,
    /// Author username.
    #[serde(default)]
    pub user_username: String,
    /// Author avatar URL.
    #[serde(default)]
    pub user_avatar: Option<String>,
    /// Star rating.
    pub rating: u8,
    /// Review body.
    pub text: String,
    /// Moderation state.
    #[serde(default)]
    pub status: ReviewStatus,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Reasons a review form is rejected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    /// Rating outside `RATING_MIN..=RATING_MAX`.
    RatingOutOfRange {
        /// Rejected rating.
        rating: u8,
    },
    /// Text shorter than [`REVIEW_TEXT_MIN_LEN`] once trimmed.
    TextTooShort {
        /// Required minimum length.
        min: usize,
    },
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RatingOutOfRange { rating } => write!(
                f,
                "rating must be between {RATING_MIN} and {RATING_MAX}, got {rating}"
            ),
            Self::TextTooShort { min } => {
                write!(f, "review must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for ReviewValidationError {}

/// Validated review submission.
///
/// # Examples
/// ```
/// use events_client::domain::NewReview;
///
/// let review = NewReview::try_new(7, 5, "  Wonderful evening!  ").unwrap();
/// assert_eq!(review.text(), "Wonderful evening!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReview {
    event: u64,
    rating: u8,
    text: String,
}

impl NewReview {
    /// Validate the form values; `text` is trimmed.
    pub fn try_new(event: u64, rating: u8, text: &str) -> Result<Self, ReviewValidationError> {
        if !(RATING_MIN..=RATING_MAX).contains(&rating) {
            return Err(ReviewValidationError::RatingOutOfRange { rating });
        }
        let text = text.trim();
        if text.chars().count() < REVIEW_TEXT_MIN_LEN {
            return Err(ReviewValidationError::TextTooShort {
                min: REVIEW_TEXT_MIN_LEN,
            });
        }
        Ok(Self {
            event,
            rating,
            text: text.to_owned(),
        })
    }

    /// Reviewed event.
    pub fn event(&self) -> u64 {
        self.event
    }

    /// Star rating.
    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Trimmed review body.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::zero(0, "Loved every minute", ReviewValidationError::RatingOutOfRange { rating: 0 })]
    #[case::six(6, "Loved every minute", ReviewValidationError::RatingOutOfRange { rating: 6 })]
    #[case::short(4, "   too short  ", ReviewValidationError::TextTooShort { min: REVIEW_TEXT_MIN_LEN })]
    fn rejects_invalid_reviews(
        #[case] rating: u8,
        #[case] text: &str,
        #[case] expected: ReviewValidationError,
    ) {
        assert_eq!(NewReview::try_new(1, rating, text), Err(expected));
    }

    #[test]
    fn serialises_trimmed_payload() {
        let review = NewReview::try_new(42, 4, "  Great sound, long queue  ").expect("valid review");
        assert_eq!(
            serde_json::to_value(&review).expect("serialises"),
            json!({ "event": 42, "rating": 4, "text": "Great sound, long queue" })
        );
    }

    #[test]
    fn decodes_backend_review() {
        let review: Review = serde_json::from_value(json!({
            "id": 3,
            "event": 42,
            "user": 9,
            "user_username": "ada",
            "user_avatar": null,
            "rating": 5,
            "text": "Wonderful evening",
            "status": "approved",
            "created_at": "2025-05-01T18:00:00Z"
        }))
        .expect("review decodes");
        assert_eq!(review.status, ReviewStatus::Approved);
        assert_eq!(review.user_username, "ada");
    }
}
