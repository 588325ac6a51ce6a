//! Event listing, detail, filter, and interaction types.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Age rating of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeRestriction {
    /// Suitable for everyone.
    #[default]
    #[serde(rename = "0+")]
    All,
    /// Six and older.
    #[serde(rename = "6+")]
    SixPlus,
    /// Twelve and older.
    #[serde(rename = "12+")]
    TwelvePlus,
    /// Sixteen and older.
    #[serde(rename = "16+")]
    SixteenPlus,
    /// Adults only.
    #[serde(rename = "18+")]
    Adult,
}

impl AgeRestriction {
    /// Wire value such as `"12+"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "0+",
            Self::SixPlus => "6+",
            Self::TwelvePlus => "12+",
            Self::SixteenPlus => "16+",
            Self::Adult => "18+",
        }
    }
}

/// Publication state of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Not visible to the public yet.
    Draft,
    /// Listed publicly.
    #[default]
    Published,
    /// Called off.
    Cancelled,
    /// Already took place.
    Completed,
}

/// Ways a user can mark an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// The user finds the event interesting.
    Interested,
    /// The user plans to attend.
    Going,
}

/// Outcome of toggling an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionToggle {
    /// The mark was set.
    Added,
    /// The mark was cleared.
    Removed,
}

/// Selector for the "my events" listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MyEventsType {
    /// Every event the user marked.
    #[default]
    All,
    /// Only events marked as interesting.
    Interested,
    /// Only events the user is going to.
    Going,
}

impl MyEventsType {
    /// Query value for the `type` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Interested => "interested",
            Self::Going => "going",
        }
    }
}

/// Event list item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventSummary {
    /// Backend identifier.
    pub id: u64,
    /// Title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// One-line teaser.
    #[serde(default)]
    pub short_description: String,
    /// Poster URL.
    #[serde(default)]
    pub image: Option<String>,
    /// First day.
    pub start_date: NaiveDate,
    /// Start time, when known.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// City.
    #[serde(default)]
    pub city: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Venue name.
    #[serde(default)]
    pub venue_name: String,
    /// Category identifier.
    #[serde(default)]
    pub category: Option<u64>,
    /// Category display name.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Whether entry is free.
    #[serde(default)]
    pub is_free: bool,
    /// Lowest ticket price as a decimal string.
    #[serde(default)]
    pub price_min: Option<String>,
    /// Highest ticket price as a decimal string.
    #[serde(default)]
    pub price_max: Option<String>,
    /// Age rating.
    #[serde(default)]
    pub age_restriction: AgeRestriction,
    /// Mean review rating, absent without approved reviews.
    #[serde(default)]
    pub average_rating: Option<f64>,
    /// Number of approved reviews.
    #[serde(default)]
    pub reviews_count: u64,
    /// Number of detail page views.
    #[serde(default)]
    pub views_count: u64,
    /// Editorial pick.
    #[serde(default)]
    pub is_featured: bool,
}

/// Full event record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventDetail {
    /// Backend identifier.
    pub id: u64,
    /// Title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// One-line teaser.
    #[serde(default)]
    pub short_description: String,
    /// Category identifier.
    #[serde(default)]
    pub category: Option<u64>,
    /// Category display name.
    #[serde(default)]
    pub category_name: Option<String>,
    /// First day.
    pub start_date: NaiveDate,
    /// Start time.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// Last day, for multi-day events.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// End time.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// Venue name.
    #[serde(default)]
    pub venue_name: String,
    /// Latitude as a decimal string.
    #[serde(default)]
    pub latitude: Option<String>,
    /// Longitude as a decimal string.
    #[serde(default)]
    pub longitude: Option<String>,
    /// Organiser name.
    #[serde(default)]
    pub organizer: String,
    /// Organiser email.
    #[serde(default)]
    pub organizer_email: String,
    /// Organiser phone.
    #[serde(default)]
    pub organizer_phone: String,
    /// Organiser website.
    #[serde(default)]
    pub organizer_website: String,
    /// Whether entry is free.
    #[serde(default)]
    pub is_free: bool,
    /// Lowest ticket price.
    #[serde(default)]
    pub price_min: Option<String>,
    /// Highest ticket price.
    #[serde(default)]
    pub price_max: Option<String>,
    /// Ticket shop URL.
    #[serde(default)]
    pub ticket_url: String,
    /// Age rating.
    #[serde(default)]
    pub age_restriction: AgeRestriction,
    /// Poster URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Trailer URL.
    #[serde(default)]
    pub video_url: String,
    /// Publication state.
    #[serde(default)]
    pub status: EventStatus,
    /// Editorial pick.
    #[serde(default)]
    pub is_featured: bool,
    /// Mean review rating.
    #[serde(default)]
    pub average_rating: Option<f64>,
    /// Number of approved reviews.
    #[serde(default)]
    pub reviews_count: u64,
    /// Number of detail page views.
    #[serde(default)]
    pub views_count: u64,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Marks the current user set on this event; empty when anonymous.
    #[serde(default)]
    pub user_interaction: Vec<InteractionKind>,
}

impl EventDetail {
    /// Whether the current user set `kind` on this event.
    pub fn has_interaction(&self, kind: InteractionKind) -> bool {
        self.user_interaction.contains(&kind)
    }
}

/// Sort order accepted by the event listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventOrdering {
    /// Soonest first (server default).
    StartDate,
    /// Latest first.
    StartDateDesc,
    /// Newest listings first.
    Newest,
    /// Most viewed first.
    MostViewed,
}

impl EventOrdering {
    /// Value of the `ordering` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartDate => "start_date",
            Self::StartDateDesc => "-start_date",
            Self::Newest => "-created_at",
            Self::MostViewed => "-views_count",
        }
    }
}

/// Search and filter parameters for the event listing.
///
/// Unset fields are omitted from the query string.
///
/// # Examples
/// ```
/// use events_client::domain::EventFilter;
///
/// let filter = EventFilter::default().search("jazz").city("Kazan").free(true);
/// assert_eq!(
///     filter.to_query(),
///     vec![
///         ("search", "jazz".to_owned()),
///         ("city", "Kazan".to_owned()),
///         ("is_free", "true".to_owned()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Free-text search over title, description, organiser, and venue.
    pub search: Option<String>,
    /// Earliest start date, inclusive.
    pub start_date_from: Option<NaiveDate>,
    /// Latest start date, inclusive.
    pub start_date_to: Option<NaiveDate>,
    /// Category slug.
    pub category: Option<String>,
    /// City, matched case-insensitively by substring.
    pub city: Option<String>,
    /// Free or paid events only.
    pub is_free: Option<bool>,
    /// Exact age rating.
    pub age_restriction: Option<AgeRestriction>,
    /// Organiser, matched by substring.
    pub organizer: Option<String>,
    /// Editorial picks only.
    pub is_featured: Option<bool>,
    /// Sort order.
    pub ordering: Option<EventOrdering>,
    /// Include events that already started.
    pub show_past: bool,
    /// One-based page number.
    pub page: Option<u32>,
}

impl EventFilter {
    /// Set the free-text search.
    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = non_blank(value.into());
        self
    }

    /// Restrict to a date range; either end may be open.
    pub fn dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.start_date_from = from;
        self.start_date_to = to;
        self
    }

    /// Restrict to a category slug.
    pub fn category(mut self, slug: impl Into<String>) -> Self {
        self.category = non_blank(slug.into());
        self
    }

    /// Restrict to a city.
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = non_blank(city.into());
        self
    }

    /// Restrict to free (`true`) or paid (`false`) events.
    pub fn free(mut self, is_free: bool) -> Self {
        self.is_free = Some(is_free);
        self
    }

    /// Restrict to an age rating.
    pub fn age(mut self, restriction: AgeRestriction) -> Self {
        self.age_restriction = Some(restriction);
        self
    }

    /// Restrict to an organiser.
    pub fn organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = non_blank(organizer.into());
        self
    }

    /// Restrict to editorial picks.
    pub fn featured(mut self, is_featured: bool) -> Self {
        self.is_featured = Some(is_featured);
        self
    }

    /// Choose the sort order.
    pub fn ordering(mut self, ordering: EventOrdering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    /// Include past events.
    pub fn include_past(mut self) -> Self {
        self.show_past = true;
        self
    }

    /// Request a page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    /// Query pairs in a stable order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(from) = self.start_date_from {
            query.push(("start_date_from", from.to_string()));
        }
        if let Some(to) = self.start_date_to {
            query.push(("start_date_to", to.to_string()));
        }
        if let Some(category) = &self.category {
            query.push(("category", category.clone()));
        }
        if let Some(city) = &self.city {
            query.push(("city", city.clone()));
        }
        if let Some(is_free) = self.is_free {
            query.push(("is_free", is_free.to_string()));
        }
        if let Some(age) = self.age_restriction {
            query.push(("age_restriction", age.as_str().to_owned()));
        }
        if let Some(organizer) = &self.organizer {
            query.push(("organizer", organizer.clone()));
        }
        if let Some(is_featured) = self.is_featured {
            query.push(("is_featured", is_featured.to_string()));
        }
        if let Some(ordering) = self.ordering {
            query.push(("ordering", ordering.as_str().to_owned()));
        }
        if self.show_past {
            query.push(("show_past", "true".to_owned()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        query
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Reasons an event draft is rejected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDraftValidationError {
    /// Title is blank.
    EmptyTitle,
    /// Paid events need at least one price.
    MissingPrice,
    /// End date precedes start date.
    EndBeforeStart,
}

impl fmt::Display for EventDraftValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "event title must not be empty"),
            Self::MissingPrice => write!(f, "a paid event needs a price"),
            Self::EndBeforeStart => write!(f, "end date cannot be earlier than start date"),
        }
    }
}

impl std::error::Error for EventDraftValidationError {}

/// Create/update payload for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDraft {
    /// Title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// One-line teaser.
    pub short_description: String,
    /// Category identifier.
    pub category: Option<u64>,
    /// First day.
    pub start_date: NaiveDate,
    /// Start time.
    pub start_time: Option<NaiveTime>,
    /// Last day.
    pub end_date: Option<NaiveDate>,
    /// End time.
    pub end_time: Option<NaiveTime>,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Venue name.
    pub venue_name: String,
    /// Organiser name.
    pub organizer: String,
    /// Whether entry is free.
    pub is_free: bool,
    /// Lowest price as a decimal string.
    pub price_min: Option<String>,
    /// Highest price as a decimal string.
    pub price_max: Option<String>,
    /// Ticket shop URL.
    pub ticket_url: String,
    /// Age rating.
    pub age_restriction: AgeRestriction,
    /// Publication state.
    pub status: EventStatus,
}

impl EventDraft {
    /// Check the client-side rules the backend would otherwise reject.
    pub fn validate(&self) -> Result<(), EventDraftValidationError> {
        if self.title.trim().is_empty() {
            return Err(EventDraftValidationError::EmptyTitle);
        }
        let has_price = [&self.price_min, &self.price_max]
            .into_iter()
            .flatten()
            .any(|price| !price.trim().is_empty());
        if !self.is_free && !has_price {
            return Err(EventDraftValidationError::MissingPrice);
        }
        if self.end_date.is_some_and(|end| end < self.start_date) {
            return Err(EventDraftValidationError::EndBeforeStart);
        }
        Ok(())
    }
}
