//! Facility records as served by the backend.
//!
//! The backend is not consistent about column spelling (`Latitude` vs
//! `latitude`, `DayOfWeek` vs `day_of_week`) or id type (number vs string),
//! so deserialization goes through a lenient raw shape and then validates the
//! coordinate.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::geo::{Coordinate, CoordinateError};

/// Opaque record identity. Numeric ids are kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "IdRepr", into = "String")]
pub struct FacilityId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(i64),
    Text(String),
}

impl From<IdRepr> for FacilityId {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Number(n) => FacilityId(n.to_string()),
            IdRepr::Text(s) => FacilityId(s),
        }
    }
}

impl From<FacilityId> for String {
    fn from(id: FacilityId) -> Self {
        id.0
    }
}

impl From<&str> for FacilityId {
    fn from(s: &str) -> Self {
        FacilityId(s.to_string())
    }
}

impl From<String> for FacilityId {
    fn from(s: String) -> Self {
        FacilityId(s)
    }
}

impl FacilityId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FacilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default, alias = "DayOfWeek", skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<String>,
    #[serde(default, alias = "Opens", skip_serializing_if = "Option::is_none")]
    pub opens: Option<String>,
    #[serde(default, alias = "Closes", skip_serializing_if = "Option::is_none")]
    pub closes: Option<String>,
    #[serde(default, alias = "HolidayInfo", skip_serializing_if = "Option::is_none")]
    pub holiday_info: Option<String>,
    /// Free-form summary such as `"09:00-18:00"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
}

impl OpeningHours {
    /// Whether the facility is open at `time`, ignoring the day of week.
    ///
    /// Uses `opens`/`closes` when both parse, otherwise an `"HH:MM-HH:MM"`
    /// summary. A closing time earlier than the opening time spans midnight.
    /// Returns `None` when no usable hours are recorded.
    #[must_use]
    pub fn is_open_at(&self, time: NaiveTime) -> Option<bool> {
        let (opens, closes) = self.window()?;
        if opens == closes {
            return Some(true);
        }
        Some(if opens < closes {
            opens <= time && time < closes
        } else {
            time >= opens || time < closes
        })
    }

    fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        if let (Some(opens), Some(closes)) = (&self.opens, &self.closes) {
            if let (Some(o), Some(c)) = (parse_clock(opens), parse_clock(closes)) {
                return Some((o, c));
            }
        }
        let (opens, closes) = self.opening_hours.as_deref()?.split_once('-')?;
        Some((parse_clock(opens)?, parse_clock(closes)?))
    }
}

/// Parses `HH:MM` or `HH:MM:SS`; `24:00` is read as midnight.
fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw == "24:00" || raw == "24:00:00" {
        return Some(NaiveTime::MIN);
    }
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetPolicy {
    #[serde(default, alias = "PetFriendly", skip_serializing_if = "Option::is_none")]
    pub pet_friendly: Option<bool>,
    #[serde(default, alias = "PetExclusiveInfo", skip_serializing_if = "Option::is_none")]
    pub exclusive_info: Option<String>,
    #[serde(default, alias = "PetSizeLimit", skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<String>,
    #[serde(default, alias = "PetRestrictions", skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<String>,
    #[serde(default, alias = "PetExtraFee", skip_serializing_if = "Option::is_none")]
    pub extra_fee: Option<String>,
}

/// A facility shown on the map. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFacility", into = "RawFacility")]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub category: Category,
    pub address: String,
    pub district: String,
    pub position: Coordinate,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub hours: OpeningHours,
    pub pet_policy: PetPolicy,
    pub parking_available: Option<bool>,
    pub is_indoor: Option<bool>,
    pub is_outdoor: Option<bool>,
    pub admission_fee_info: Option<String>,
    /// Only set by location-based search.
    pub distance_km: Option<f64>,
}

impl Facility {
    /// A facility with only the required fields set.
    #[must_use]
    pub fn new(
        id: impl Into<FacilityId>,
        name: impl Into<String>,
        category: Category,
        district: impl Into<String>,
        position: Coordinate,
    ) -> Self {
        Facility {
            id: id.into(),
            name: name.into(),
            category,
            address: String::new(),
            district: district.into(),
            position,
            phone: None,
            website: None,
            description: None,
            image_url: None,
            hours: OpeningHours::default(),
            pet_policy: PetPolicy::default(),
            parking_available: None,
            is_indoor: None,
            is_outdoor: None,
            admission_fee_info: None,
            distance_km: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFacility {
    id: FacilityId,
    name: String,
    category: Category,
    #[serde(default)]
    address: String,
    #[serde(default)]
    district: String,
    #[serde(alias = "Latitude")]
    latitude: f64,
    #[serde(alias = "Longitude")]
    longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, alias = "imageurl", skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(flatten)]
    hours: OpeningHours,
    #[serde(flatten)]
    pet_policy: PetPolicy,
    #[serde(default, alias = "ParkingAvailable", skip_serializing_if = "Option::is_none")]
    parking_available: Option<bool>,
    #[serde(default, alias = "IsIndoor", skip_serializing_if = "Option::is_none")]
    is_indoor: Option<bool>,
    #[serde(default, alias = "IsOutdoor", skip_serializing_if = "Option::is_none")]
    is_outdoor: Option<bool>,
    #[serde(default, alias = "AdmissionFeeInfo", skip_serializing_if = "Option::is_none")]
    admission_fee_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distance_km: Option<f64>,
}

impl TryFrom<RawFacility> for Facility {
    type Error = CoordinateError;

    fn try_from(raw: RawFacility) -> Result<Self, Self::Error> {
        Ok(Facility {
            position: Coordinate::new(raw.latitude, raw.longitude)?,
            id: raw.id,
            name: raw.name,
            category: raw.category,
            address: raw.address,
            district: raw.district,
            phone: raw.phone,
            website: raw.website,
            description: raw.description,
            image_url: raw.image_url,
            hours: raw.hours,
            pet_policy: raw.pet_policy,
            parking_available: raw.parking_available,
            is_indoor: raw.is_indoor,
            is_outdoor: raw.is_outdoor,
            admission_fee_info: raw.admission_fee_info,
            distance_km: raw.distance_km,
        })
    }
}

impl From<Facility> for RawFacility {
    fn from(f: Facility) -> Self {
        RawFacility {
            id: f.id,
            name: f.name,
            category: f.category,
            address: f.address,
            district: f.district,
            latitude: f.position.lat(),
            longitude: f.position.lon(),
            phone: f.phone,
            website: f.website,
            description: f.description,
            image_url: f.image_url,
            hours: f.hours,
            pet_policy: f.pet_policy,
            parking_available: f.parking_available,
            is_indoor: f.is_indoor,
            is_outdoor: f.is_outdoor,
            admission_fee_info: f.admission_fee_info,
            distance_km: f.distance_km,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(opens: Option<&str>, closes: Option<&str>, summary: Option<&str>) -> OpeningHours {
        OpeningHours {
            opens: opens.map(str::to_string),
            closes: closes.map(str::to_string),
            opening_hours: summary.map(str::to_string),
            ..OpeningHours::default()
        }
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn deserializes_capitalised_backend_columns() {
        let json = r#"{
            "id": 42,
            "name": "24시 동물병원",
            "category": "veterinary hospital",
            "address": "서울 강남구 테헤란로 1",
            "district": "Gangnam-gu",
            "Latitude": 37.498,
            "Longitude": 127.027,
            "DayOfWeek": "Mon-Sun",
            "Opens": "00:00",
            "Closes": "24:00",
            "PetFriendly": true
        }"#;
        let f: Facility = serde_json::from_str(json).unwrap();
        assert_eq!(f.id.as_str(), "42");
        assert_eq!(f.category, Category::VeterinaryHospital);
        assert_eq!(f.hours.day_of_week.as_deref(), Some("Mon-Sun"));
        assert_eq!(f.pet_policy.pet_friendly, Some(true));
        assert!(f.distance_km.is_none());
    }

    #[test]
    fn deserializes_lowercase_search_result() {
        let json = r#"{
            "id": "uuid-cafe-1",
            "name": "멍멍이 카페",
            "category": "cafe",
            "address": "서울 여기",
            "district": "송파구",
            "latitude": 37.51,
            "longitude": 127.1,
            "opening_hours": "11:00-22:00",
            "distance_km": 0.8
        }"#;
        let f: Facility = serde_json::from_str(json).unwrap();
        assert_eq!(f.id.as_str(), "uuid-cafe-1");
        assert_eq!(f.distance_km, Some(0.8));
        assert_eq!(f.hours.is_open_at(at(12, 0)), Some(true));
    }

    #[test]
    fn rejects_out_of_range_coordinate() {
        let json = r#"{"id": 1, "name": "x", "category": "pharmacy", "latitude": 123.0, "longitude": 127.0}"#;
        assert!(serde_json::from_str::<Facility>(json).is_err());
    }

    #[test]
    fn rejects_missing_coordinate() {
        let json = r#"{"id": 1, "name": "x", "category": "pharmacy", "latitude": 37.0}"#;
        assert!(serde_json::from_str::<Facility>(json).is_err());
    }

    #[test]
    fn serializes_back_with_flat_coordinates() {
        let json = r#"{"id": 3, "name": "튼튼 동물약국", "category": "pharmacy", "latitude": 37.55, "longitude": 126.91}"#;
        let f: Facility = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&f).unwrap();
        assert_eq!(value["id"], "3");
        assert_eq!(value["latitude"], 37.55);
        let again: Facility = serde_json::from_value(value).unwrap();
        assert_eq!(again, f);
    }

    #[test]
    fn open_window_within_day() {
        let h = hours(Some("09:00"), Some("18:00"), None);
        assert_eq!(h.is_open_at(at(9, 0)), Some(true));
        assert_eq!(h.is_open_at(at(18, 0)), Some(false));
        assert_eq!(h.is_open_at(at(8, 59)), Some(false));
    }

    #[test]
    fn open_window_spanning_midnight() {
        let h = hours(Some("20:00"), Some("02:00"), None);
        assert_eq!(h.is_open_at(at(23, 30)), Some(true));
        assert_eq!(h.is_open_at(at(1, 0)), Some(true));
        assert_eq!(h.is_open_at(at(12, 0)), Some(false));
    }

    #[test]
    fn round_the_clock_hours_are_always_open() {
        let h = hours(Some("00:00"), Some("24:00"), None);
        assert_eq!(h.is_open_at(at(3, 0)), Some(true));
    }

    #[test]
    fn unknown_hours_yield_none() {
        assert_eq!(OpeningHours::default().is_open_at(at(10, 0)), None);
        assert_eq!(hours(None, None, Some("24시간")).is_open_at(at(10, 0)), None);
    }
}
