//! Parameter names shared between the request, the values provider and the result.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// An enum-like parameter name such as `temperature_air_mean_200`.
///
/// Parameters are compared, hashed and ordered by their lowercase name, which keeps
/// the result ordering `(date, parameter)` independent of how callers spelled them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Parameter(Cow<'static, str>);

impl Parameter {
    /// Daily mean air temperature at 2 m, in Kelvin.
    pub const TEMPERATURE_AIR_MEAN_200: Parameter =
        Parameter(Cow::Borrowed("temperature_air_mean_200"));
    /// Mean wind speed, in m/s.
    pub const WIND_SPEED: Parameter = Parameter(Cow::Borrowed("wind_speed"));
    /// Precipitation height, in mm.
    pub const PRECIPITATION_HEIGHT: Parameter = Parameter(Cow::Borrowed("precipitation_height"));

    pub fn new(name: impl AsRef<str>) -> Self {
        Parameter(Cow::Owned(name.as_ref().trim().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Parameter {
    fn from(name: &str) -> Self {
        Parameter::new(name)
    }
}

impl From<String> for Parameter {
    fn from(name: String) -> Self {
        Parameter::new(name)
    }
}

impl From<Parameter> for String {
    fn from(parameter: Parameter) -> Self {
        parameter.0.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_normalized() {
        assert_eq!(
            Parameter::new(" TEMPERATURE_AIR_MEAN_200 "),
            Parameter::TEMPERATURE_AIR_MEAN_200
        );
        assert_eq!(Parameter::from("Wind_Speed").as_str(), "wind_speed");
    }

    #[test]
    fn test_deserialized_names_are_normalized() {
        let parameter: Parameter = serde_json::from_str("\"Wind_Speed\"").unwrap();
        assert_eq!(parameter, Parameter::WIND_SPEED);

        let parameters: Vec<Parameter> =
            serde_json::from_str(r#"[" PRECIPITATION_HEIGHT", "temperature_air_mean_200"]"#).unwrap();
        assert_eq!(
            parameters,
            [Parameter::PRECIPITATION_HEIGHT, Parameter::TEMPERATURE_AIR_MEAN_200]
        );

        assert_eq!(serde_json::to_string(&parameter).unwrap(), "\"wind_speed\"");
    }

    #[test]
    fn test_ordering_is_by_name() {
        let mut params = vec![
            Parameter::WIND_SPEED,
            Parameter::PRECIPITATION_HEIGHT,
            Parameter::TEMPERATURE_AIR_MEAN_200,
        ];
        params.sort();
        assert_eq!(
            params,
            [
                Parameter::PRECIPITATION_HEIGHT,
                Parameter::TEMPERATURE_AIR_MEAN_200,
                Parameter::WIND_SPEED
            ]
        );
    }
}
