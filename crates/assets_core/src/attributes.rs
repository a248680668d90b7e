//! Translation between the attribute names the UI works with (`dateAdded`) and
//! the names the assets API stores, sorts by and echoes back (`date_added`).

use shared::error::AssetError;

/// `(frontend, api)` pairs. Both columns are unique, so the mapping is a bijection.
const ATTRIBUTES: &[(&str, &str)] = &[
    ("displayName", "display_name"),
    ("contentType", "content_type"),
    ("dateAdded", "date_added"),
];

pub fn to_api_attribute(frontend_name: &str) -> Result<&'static str, AssetError> {
    ATTRIBUTES
        .iter()
        .find(|(frontend, _)| *frontend == frontend_name)
        .map(|(_, api)| *api)
        .ok_or_else(|| AssetError::unknown_attribute(frontend_name))
}

pub fn to_frontend_attribute(api_name: &str) -> Result<&'static str, AssetError> {
    ATTRIBUTES
        .iter()
        .find(|(_, api)| *api == api_name)
        .map(|(frontend, _)| *frontend)
        .ok_or_else(|| AssetError::unknown_attribute(api_name))
}

pub fn frontend_attributes() -> impl Iterator<Item = &'static str> {
    ATTRIBUTES.iter().map(|(frontend, _)| *frontend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_known_attribute() {
        for name in frontend_attributes() {
            let api = to_api_attribute(name).expect("known frontend name");
            assert_eq!(to_frontend_attribute(api).expect("known api name"), name);
        }
    }

    #[test]
    fn maps_content_type() {
        assert_eq!(to_api_attribute("contentType"), Ok("content_type"));
        assert_eq!(to_frontend_attribute("content_type"), Ok("contentType"));
    }

    #[test]
    fn rejects_unknown_names_in_both_directions() {
        assert_eq!(
            to_api_attribute("edX"),
            Err(AssetError::unknown_attribute("edX"))
        );
        // api names are not accepted where frontend names are expected
        assert!(to_api_attribute("date_added").is_err());
        assert!(to_frontend_attribute("dateAdded").is_err());
    }
}
