//! Text search and place details through the Places API (New).
//!
//! Callers predate the New API, so both transcoders flatten the New resource
//! back into the legacy field names (`formatted_address`, `place_id`,
//! `geometry_viewport.northeast`, `price_level` as an integer, ...). Every key
//! of the output is always present; absent upstream fields become empty
//! strings, zeros, `false` or empty lists.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::MapsClient;
use crate::error::{Operation, Result};
use crate::waypoint::{ApiLatLng, Coordinate, LatLng};

const SEARCH_FIELD_MASK: &str = "places.displayName,places.formattedAddress,places.location,places.id,places.rating,places.types";

const DETAILS_FIELD_MASK: &str = "id,displayName,formattedAddress,location,viewport,types,nationalPhoneNumber,internationalPhoneNumber,websiteUri,googleMapsUri,rating,userRatingCount,priceLevel,businessStatus,regularOpeningHours,reviews,photos,editorialSummary";

static PHOTO_NAME_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^places/[^/]+/photos/").expect("photo prefix pattern is a valid regex")
});

// ============================================================================
// UPSTREAM RESOURCES
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LocalizedText {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchTextResponse {
    places: Vec<PlaceResource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlaceResource {
    id: String,
    display_name: LocalizedText,
    formatted_address: String,
    location: ApiLatLng,
    viewport: Viewport,
    types: Vec<String>,
    national_phone_number: String,
    international_phone_number: String,
    website_uri: String,
    google_maps_uri: String,
    rating: f64,
    user_rating_count: i64,
    price_level: Option<String>,
    business_status: String,
    regular_opening_hours: Option<OpeningHoursResource>,
    reviews: Vec<ReviewResource>,
    photos: Vec<PhotoResource>,
    editorial_summary: LocalizedText,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Viewport {
    low: ApiLatLng,
    high: ApiLatLng,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct OpeningHoursResource {
    open_now: bool,
    periods: Vec<PeriodResource>,
    weekday_descriptions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PeriodResource {
    open: Option<PointResource>,
    close: Option<PointResource>,
}

// proto3 JSON omits zero values, so Sunday midnight arrives as `{}`.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default)]
struct PointResource {
    day: u8,
    hour: u8,
    minute: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReviewResource {
    relative_publish_time_description: String,
    rating: f64,
    text: LocalizedText,
    author_attribution: AuthorAttribution,
    publish_time: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PhotoResource {
    name: String,
    width_px: u32,
    height_px: u32,
    author_attributions: Vec<AuthorAttribution>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AuthorAttribution {
    display_name: String,
    uri: String,
}

// ============================================================================
// REQUESTS
// ============================================================================

/// Arguments for a text search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSearch {
    pub query: String,
    pub location: Option<Coordinate>,
    /// Bias radius in meters; only used together with `location`.
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextRequest<'a> {
    text_query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_bias: Option<LocationBias>,
}

#[derive(Debug, Serialize)]
struct LocationBias {
    circle: Circle,
}

#[derive(Debug, Serialize)]
struct Circle {
    center: ApiLatLng,
    radius: f64,
}

impl PlaceSearch {
    fn to_request(&self) -> SearchTextRequest<'_> {
        // A bias needs both a center and a radius; either alone is ignored.
        let location_bias = match (self.location, self.radius) {
            (Some(center), Some(radius)) => Some(LocationBias {
                circle: Circle {
                    center: ApiLatLng::from(center),
                    radius,
                },
            }),
            _ => None,
        };
        SearchTextRequest {
            text_query: &self.query,
            location_bias,
        }
    }
}

// ============================================================================
// OUTPUTS
// ============================================================================

/// Output of `maps_search_places`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPlacesOutput {
    pub places: Vec<PlaceSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceSummary {
    pub name: String,
    pub formatted_address: String,
    pub location: LatLng,
    pub place_id: String,
    pub rating: f64,
    pub types: Vec<String>,
}

/// Output of `maps_place_details`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetailsOutput {
    pub name: String,
    pub place_id: String,
    pub formatted_address: String,
    pub location: LatLng,
    pub geometry_viewport: ViewportOutput,
    pub types: Vec<String>,
    pub formatted_phone_number: String,
    pub international_phone_number: String,
    pub website: String,
    pub url: String,
    pub rating: f64,
    pub user_ratings_total: i64,
    pub price_level: u8,
    pub business_status: String,
    pub editorial_summary: String,
    pub opening_hours: OpeningHoursOutput,
    pub reviews: Vec<ReviewOutput>,
    pub photos: Vec<PhotoOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportOutput {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpeningHoursOutput {
    pub open_now: bool,
    pub periods: Vec<PeriodOutput>,
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodOutput {
    pub open: HoursPoint,
    pub close: Option<HoursPoint>,
}

/// A weekday (0 = Sunday) and a zero-padded `HHMM` time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoursPoint {
    pub day: u8,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutput {
    pub author_name: String,
    pub rating: f64,
    pub text: String,
    pub time: String,
    pub relative_time_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoOutput {
    pub photo_reference: String,
    pub height: u32,
    pub width: u32,
    pub html_attributions: Vec<String>,
}

// ============================================================================
// TRANSCODERS
// ============================================================================

/// Search for places matching free text, optionally biased to a circle.
pub async fn search_places(client: &MapsClient, search: &PlaceSearch) -> Result<SearchPlacesOutput> {
    info!(
        query = %search.query,
        biased = search.location.is_some() && search.radius.is_some(),
        "searching places"
    );
    let response: SearchTextResponse = client
        .post_new(
            Operation::SearchPlaces,
            &client.endpoints().places_search_text,
            SEARCH_FIELD_MASK,
            &search.to_request(),
        )
        .await?;

    Ok(SearchPlacesOutput {
        places: response.places.into_iter().map(summarize_place).collect(),
    })
}

/// Fetch the full details of one place.
pub async fn place_details(client: &MapsClient, place_id: &str) -> Result<PlaceDetailsOutput> {
    info!(place_id, "fetching place details");
    let url = client.endpoints().place_details_url(place_id);
    let place: PlaceResource = client
        .get_new(Operation::PlaceDetails, &url, DETAILS_FIELD_MASK)
        .await?;
    Ok(detail_place(place))
}

fn summarize_place(place: PlaceResource) -> PlaceSummary {
    PlaceSummary {
        name: place.display_name.text,
        formatted_address: place.formatted_address,
        location: place.location.into(),
        place_id: place.id,
        rating: place.rating,
        types: place.types,
    }
}

fn detail_place(place: PlaceResource) -> PlaceDetailsOutput {
    let opening_hours = match place.regular_opening_hours {
        Some(hours) => OpeningHoursOutput {
            open_now: hours.open_now,
            periods: hours
                .periods
                .into_iter()
                .map(|period| PeriodOutput {
                    open: hours_point(period.open.unwrap_or_default()),
                    close: period.close.map(hours_point),
                })
                .collect(),
            weekday_text: hours.weekday_descriptions,
        },
        None => OpeningHoursOutput {
            open_now: false,
            periods: Vec::new(),
            weekday_text: Vec::new(),
        },
    };

    PlaceDetailsOutput {
        name: place.display_name.text,
        place_id: place.id,
        formatted_address: place.formatted_address,
        location: place.location.into(),
        geometry_viewport: ViewportOutput {
            northeast: place.viewport.high.into(),
            southwest: place.viewport.low.into(),
        },
        types: place.types,
        formatted_phone_number: place.national_phone_number,
        international_phone_number: place.international_phone_number,
        website: place.website_uri,
        url: place.google_maps_uri,
        rating: place.rating,
        user_ratings_total: place.user_rating_count,
        price_level: price_level(place.price_level.as_deref()),
        business_status: place.business_status,
        editorial_summary: place.editorial_summary.text,
        opening_hours,
        reviews: place
            .reviews
            .into_iter()
            .map(|review| ReviewOutput {
                author_name: review.author_attribution.display_name,
                rating: review.rating,
                text: review.text.text,
                time: review.publish_time,
                relative_time_description: review.relative_publish_time_description,
            })
            .collect(),
        photos: place
            .photos
            .into_iter()
            .map(|photo| PhotoOutput {
                photo_reference: photo_reference(&photo.name),
                height: photo.height_px,
                width: photo.width_px,
                html_attributions: photo
                    .author_attributions
                    .iter()
                    .map(html_attribution)
                    .collect(),
            })
            .collect(),
    }
}

/// Legacy integer price level for a Places (New) `PriceLevel` enum name.
/// Unknown, unspecified and absent values map to 0.
pub fn price_level(level: Option<&str>) -> u8 {
    match level {
        Some("PRICE_LEVEL_FREE") => 0,
        Some("PRICE_LEVEL_INEXPENSIVE") => 1,
        Some("PRICE_LEVEL_MODERATE") => 2,
        Some("PRICE_LEVEL_EXPENSIVE") => 3,
        Some("PRICE_LEVEL_VERY_EXPENSIVE") => 4,
        _ => 0,
    }
}

/// Strip the `places/<id>/photos/` prefix from a photo resource name.
pub fn photo_reference(name: &str) -> String {
    PHOTO_NAME_PREFIX.replace(name, "").into_owned()
}

fn html_attribution(author: &AuthorAttribution) -> String {
    let name = escape_html(&author.display_name);
    if author.uri.is_empty() {
        name
    } else {
        format!("<a href=\"{}\">{}</a>", escape_html(&author.uri), name)
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn hours_point(point: PointResource) -> HoursPoint {
    HoursPoint {
        day: point.day,
        time: format!("{:02}{:02}", point.hour, point.minute),
    }
}
