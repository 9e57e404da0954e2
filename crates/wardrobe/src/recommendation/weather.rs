use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Simplified weather condition used as the weather table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Windy,
}

impl WeatherCondition {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
            Self::Windy => "windy",
        }
    }

    /// Collapse a provider's free-text description ("Patchy light drizzle",
    /// "Partly cloudy") into one of the simplified conditions. Unrecognized
    /// descriptions are treated as clear.
    pub fn simplify(description: &str) -> Self {
        let description = description.to_lowercase();
        let has = |needle: &str| description.contains(needle);

        if has("clear") {
            Self::Clear
        } else if has("sunny") {
            Self::Sunny
        } else if has("cloud") {
            Self::Cloudy
        } else if has("rain") || has("drizzle") {
            Self::Rainy
        } else if has("snow") || has("ice") || has("sleet") {
            Self::Snowy
        } else if has("wind") {
            Self::Windy
        } else {
            Self::Clear
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weather condition '{0}'")]
pub struct UnknownCondition(pub String);

impl FromStr for WeatherCondition {
    type Err = UnknownCondition;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(Self::Clear),
            "sunny" => Ok(Self::Sunny),
            "cloudy" => Ok(Self::Cloudy),
            "rainy" => Ok(Self::Rainy),
            "snowy" => Ok(Self::Snowy),
            "windy" => Ok(Self::Windy),
            _ => Err(UnknownCondition(value.to_string())),
        }
    }
}

/// Current conditions for a location. A missing condition scores neutrally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_f: f64,
    pub condition: Option<WeatherCondition>,
}

/// Source of current weather for a city.
pub trait WeatherProvider: Send + Sync {
    fn current(&self, city: &str) -> Result<WeatherReading, WeatherError>;
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("a city is required to look up weather")]
    MissingCity,
    #[error("weather unavailable for '{city}': {reason}")]
    Unavailable { city: String, reason: String },
}

/// Provider that reports the same reading for every city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticWeatherProvider {
    reading: WeatherReading,
}

impl StaticWeatherProvider {
    pub fn new(reading: WeatherReading) -> Self {
        Self { reading }
    }
}

impl WeatherProvider for StaticWeatherProvider {
    fn current(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        if city.trim().is_empty() {
            return Err(WeatherError::MissingCity);
        }
        Ok(self.reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplify_maps_provider_descriptions() {
        assert_eq!(WeatherCondition::simplify("Clear"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::simplify("Sunny"), WeatherCondition::Sunny);
        assert_eq!(
            WeatherCondition::simplify("Partly cloudy"),
            WeatherCondition::Cloudy
        );
        assert_eq!(
            WeatherCondition::simplify("Patchy light drizzle"),
            WeatherCondition::Rainy
        );
        assert_eq!(
            WeatherCondition::simplify("Moderate or heavy sleet"),
            WeatherCondition::Snowy
        );
        assert_eq!(WeatherCondition::simplify("Ice pellets"), WeatherCondition::Snowy);
        assert_eq!(WeatherCondition::simplify("Windy"), WeatherCondition::Windy);
        assert_eq!(WeatherCondition::simplify("Mist"), WeatherCondition::Clear);
    }

    #[test]
    fn simplify_checks_in_priority_order() {
        // "cloud" is checked before "rain"
        assert_eq!(
            WeatherCondition::simplify("Cloudy with rain"),
            WeatherCondition::Cloudy
        );
    }

    #[test]
    fn parses_table_keys() {
        assert_eq!("Rainy".parse::<WeatherCondition>(), Ok(WeatherCondition::Rainy));
        assert!("hail".parse::<WeatherCondition>().is_err());
    }

    #[test]
    fn static_provider_requires_a_city() {
        let provider = StaticWeatherProvider::new(WeatherReading {
            temperature_f: 52.0,
            condition: Some(WeatherCondition::Cloudy),
        });

        let reading = provider.current("Eugene").expect("reading");
        assert_eq!(reading.temperature_f, 52.0);
        assert!(matches!(provider.current("  "), Err(WeatherError::MissingCity)));
    }
}
