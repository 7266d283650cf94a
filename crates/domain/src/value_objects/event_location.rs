//! Event location value object
//!
//! Either a physical venue (address, city, country, optional coordinates)
//! or a virtual event reachable through a URL.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DomainError;

/// Raw input for [`EventLocation::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLocationProps {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub virtual_event: bool,
    pub virtual_url: Option<String>,
}

/// Where an event takes place.
///
/// # Invariants
///
/// - physical: `address`, `city`, `country` are non-empty
/// - virtual: `virtual_url` is a syntactically valid URL
/// - `latitude` and `longitude` are both present or both absent, within
///   `[-90, 90]` and `[-180, 180]`
///
/// Equality compares address, city, country and the virtual fields only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "EventLocationProps", into = "EventLocationProps")]
pub struct EventLocation {
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    postal_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    virtual_event: bool,
    virtual_url: Option<String>,
}

impl EventLocation {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when any invariant above is violated.
    pub fn new(props: EventLocationProps) -> Result<Self, DomainError> {
        let address = non_blank(props.address);
        let city = non_blank(props.city);
        let country = non_blank(props.country);
        let virtual_url = non_blank(props.virtual_url);

        if props.virtual_event {
            let url = virtual_url.as_deref().ok_or_else(|| {
                DomainError::validation("Los eventos virtuales requieren una URL")
            })?;
            Url::parse(url).map_err(|_| {
                DomainError::validation(format!("La URL del evento virtual no es válida: {}", url))
            })?;
        } else {
            if address.is_none() {
                return Err(DomainError::validation("La dirección es obligatoria"));
            }
            if city.is_none() {
                return Err(DomainError::validation("La ciudad es obligatoria"));
            }
            if country.is_none() {
                return Err(DomainError::validation("El país es obligatorio"));
            }
        }

        match (props.latitude, props.longitude) {
            (Some(lat), Some(lng)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(DomainError::validation(
                        "La latitud debe estar entre -90 y 90",
                    ));
                }
                if !(-180.0..=180.0).contains(&lng) {
                    return Err(DomainError::validation(
                        "La longitud debe estar entre -180 y 180",
                    ));
                }
            }
            (None, None) => {}
            _ => {
                return Err(DomainError::validation(
                    "Latitud y longitud deben proporcionarse juntas",
                ))
            }
        }

        Ok(Self {
            address,
            city,
            state: non_blank(props.state),
            country,
            postal_code: non_blank(props.postal_code),
            latitude: props.latitude,
            longitude: props.longitude,
            virtual_event: props.virtual_event,
            virtual_url,
        })
    }

    /// Shorthand for a virtual event.
    pub fn virtual_at(url: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(EventLocationProps {
            virtual_event: true,
            virtual_url: Some(url.into()),
            ..Default::default()
        })
    }

    /// Shorthand for a physical venue without coordinates.
    pub fn physical(
        address: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::new(EventLocationProps {
            address: Some(address.into()),
            city: Some(city.into()),
            country: Some(country.into()),
            ..Default::default()
        })
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn is_virtual(&self) -> bool {
        self.virtual_event
    }

    pub fn virtual_url(&self) -> Option<&str> {
        self.virtual_url.as_deref()
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Single-line human readable form. Virtual events render as their URL.
    pub fn full_address(&self) -> String {
        if self.virtual_event {
            return self.virtual_url.clone().unwrap_or_default();
        }
        [
            self.address.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.postal_code.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn to_props(&self) -> EventLocationProps {
        EventLocationProps {
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            postal_code: self.postal_code.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            virtual_event: self.virtual_event,
            virtual_url: self.virtual_url.clone(),
        }
    }
}

impl PartialEq for EventLocation {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
            && self.city == other.city
            && self.country == other.country
            && self.virtual_event == other.virtual_event
            && self.virtual_url == other.virtual_url
    }
}

impl Eq for EventLocation {}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<EventLocationProps> for EventLocation {
    type Error = DomainError;

    fn try_from(props: EventLocationProps) -> Result<Self, Self::Error> {
        Self::new(props)
    }
}

impl From<EventLocation> for EventLocationProps {
    fn from(location: EventLocation) -> Self {
        location.to_props()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn madrid() -> EventLocationProps {
        EventLocationProps {
            address: Some("Gran Vía 1".into()),
            city: Some("Madrid".into()),
            country: Some("España".into()),
            ..Default::default()
        }
    }

    #[test]
    fn physical_requires_address_city_country() {
        assert!(EventLocation::new(madrid()).is_ok());

        let mut props = madrid();
        props.city = Some("   ".into());
        assert!(EventLocation::new(props).is_err());

        let mut props = madrid();
        props.country = None;
        assert!(EventLocation::new(props).is_err());
    }

    #[test]
    fn coordinates_must_be_paired() {
        let mut props = madrid();
        props.latitude = Some(40.4);
        assert!(EventLocation::new(props.clone()).is_err());

        props.longitude = Some(-3.7);
        let location = EventLocation::new(props).unwrap();
        assert!(location.has_coordinates());
    }

    #[test]
    fn coordinates_are_range_checked() {
        let mut props = madrid();
        props.latitude = Some(90.5);
        props.longitude = Some(0.0);
        assert!(EventLocation::new(props.clone()).is_err());

        props.latitude = Some(-90.0);
        props.longitude = Some(180.5);
        assert!(EventLocation::new(props.clone()).is_err());

        props.longitude = Some(-180.0);
        assert!(EventLocation::new(props).is_ok());
    }

    #[test]
    fn virtual_requires_valid_url() {
        assert!(EventLocation::virtual_at("https://meet.example.com/room").is_ok());
        assert!(EventLocation::virtual_at("not a url").is_err());
        assert!(EventLocation::new(EventLocationProps {
            virtual_event: true,
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn equality_ignores_optional_details() {
        let a = EventLocation::new(madrid()).unwrap();
        let mut props = madrid();
        props.postal_code = Some("28013".into());
        props.latitude = Some(40.4);
        props.longitude = Some(-3.7);
        let b = EventLocation::new(props).unwrap();
        assert_eq!(a, b);

        let c = EventLocation::physical("Gran Vía 2", "Madrid", "España").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn full_address_joins_present_parts() {
        let mut props = madrid();
        props.postal_code = Some("28013".into());
        let location = EventLocation::new(props).unwrap();
        assert_eq!(location.full_address(), "Gran Vía 1, Madrid, 28013, España");

        let online = EventLocation::virtual_at("https://live.example.com").unwrap();
        assert_eq!(online.full_address(), "https://live.example.com");
    }
}
