use embedded_graphics::prelude::Size;

use crate::render::Frame;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Failed to build weather URL")]
    Url(#[from] url::ParseError),

    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Failed to fetch weather conditions")]
    Conditions(#[source] reqwest::Error),

    #[error("Failed to fetch weather icon from '{url}'")]
    IconRequest {
        url: url::Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode weather conditions")]
    Json(#[from] serde_json::Error),

    #[error("Temperature {0} is not representable")]
    Temperature(serde_json::Number),

    #[error("Failed to convert weather icon")]
    IconDecode(#[from] image::ImageError),
}

/// The part of the conditions document that gets read out
#[derive(Debug, serde::Deserialize)]
struct Conditions {
    current_observation: CurrentObservation,
}

#[derive(Debug, serde::Deserialize)]
struct CurrentObservation {
    temp_f: serde_json::Number,
    weather: String,
    wind_string: String,
    icon_url: url::Url,
}

#[derive(Debug)]
pub struct WeatherReport {
    /// The temperature exactly as the service reported it
    pub temperature: serde_json::Number,
    pub temp_f: f64,
    pub weather: String,
    pub wind: String,
    pub icon: Frame,
}

impl WeatherReport {
    pub fn sentence(&self) -> String {
        format!(
            "Right now the weather is {weather}. The wind is {wind}. The temperature is currently {temperature} degrees Fahrenheit.",
            weather = self.weather,
            wind = self.wind,
            temperature = self.temperature,
        )
    }

    pub fn band(&self) -> TemperatureBand {
        TemperatureBand::from_fahrenheit(self.temp_f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBand {
    /// below 40°F
    Cold,
    /// 40°F up to, not including, 60°F
    Cool,
    /// 60°F up to and including 80°F
    Comfortable,
    /// above 80°F
    Hot,
}

impl TemperatureBand {
    pub fn from_fahrenheit(temp_f: f64) -> Self {
        if temp_f < 40.0 {
            TemperatureBand::Cold
        } else if temp_f < 60.0 {
            TemperatureBand::Cool
        } else if temp_f <= 80.0 {
            TemperatureBand::Comfortable
        } else {
            TemperatureBand::Hot
        }
    }

    pub const fn remark(self) -> &'static str {
        match self {
            TemperatureBand::Cold => {
                "It is cold outside right now. You should wear a jacket to prevent system failure!"
            }
            TemperatureBand::Cool => {
                "It is cool outside right now. You might want a sweater to maintain proper operating temperature."
            }
            TemperatureBand::Comfortable => {
                "It is a comfortable temperature for humans outside right now."
            }
            TemperatureBand::Hot => "It's pretty hot right now. Don't overheat your circuits!",
        }
    }
}

pub trait WeatherSource {
    async fn fetch(&self) -> Result<WeatherReport, WeatherError>;
}

pub struct WeatherClient {
    client: reqwest::Client,
    conditions_url: url::Url,
    location: String,
    size: Size,
    invert_icon: bool,
    pixel_threshold: u8,
}

pub fn conditions_url(config: &crate::config::WeatherConfig) -> Result<url::Url, url::ParseError> {
    config.base_url.join(&format!(
        "{key}/geolookup/conditions/q/{state}/{city}.json",
        key = config.api_key,
        state = config.state,
        city = config.city,
    ))
}

impl WeatherClient {
    pub fn new(
        config: &crate::config::WeatherConfig,
        size: Size,
    ) -> Result<Self, WeatherError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build().map_err(WeatherError::Client)?,
            conditions_url: conditions_url(config)?,
            location: format!("{}, {}", config.city, config.state),
            size,
            invert_icon: config.invert_icon,
            pixel_threshold: config.pixel_threshold,
        })
    }

    async fn get_bytes(&self, url: &url::Url) -> Result<Vec<u8>, reqwest::Error> {
        let response = self.client.get(url.clone()).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn decode_conditions(body: &[u8]) -> Result<CurrentObservation, WeatherError> {
    let conditions: Conditions = serde_json::from_slice(body)?;
    Ok(conditions.current_observation)
}

fn report(observation: CurrentObservation, icon: Frame) -> Result<WeatherReport, WeatherError> {
    let temp_f = observation
        .temp_f
        .as_f64()
        .filter(|t| t.is_finite())
        .ok_or_else(|| WeatherError::Temperature(observation.temp_f.clone()))?;

    Ok(WeatherReport {
        temperature: observation.temp_f,
        temp_f,
        weather: observation.weather,
        wind: observation.wind_string,
        icon,
    })
}

impl WeatherSource for WeatherClient {
    async fn fetch(&self) -> Result<WeatherReport, WeatherError> {
        tracing::debug!(location = %self.location, "Fetching weather conditions");
        // the conditions URL carries the API key, keep it out of errors and logs
        let body = self
            .get_bytes(&self.conditions_url)
            .await
            .map_err(|source| WeatherError::Conditions(source.without_url()))?;
        let observation = decode_conditions(&body)?;
        tracing::debug!(?observation, "Received weather conditions");

        let icon_bytes = self
            .get_bytes(&observation.icon_url)
            .await
            .map_err(|source| WeatherError::IconRequest {
                url: observation.icon_url.clone(),
                source,
            })?;
        let icon = crate::render::icon_frame(
            &icon_bytes,
            self.size,
            self.invert_icon,
            self.pixel_threshold,
        )?;

        report(observation, icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherConfig;

    fn config() -> WeatherConfig {
        toml::from_str(
            r#"
            api_key = "0123456789abcdef"
            state = "CA"
            city = "San_Francisco"
            "#,
        )
        .unwrap()
    }

    fn observation(temp_f: &str) -> CurrentObservation {
        let body = format!(
            r#"{{"current_observation": {{
                "temp_f": {temp_f},
                "weather": "Clear",
                "wind_string": "Calm",
                "icon_url": "http://icons.wxug.com/i/c/k/clear.gif"
            }}}}"#
        );
        decode_conditions(body.as_bytes()).unwrap()
    }

    #[test]
    fn url_embeds_key_and_location() {
        assert_eq!(
            conditions_url(&config()).unwrap().as_str(),
            "http://api.wunderground.com/api/0123456789abcdef/geolookup/conditions/q/CA/San_Francisco.json"
        );
    }

    #[test]
    fn decodes_conditions_document() {
        let observation = decode_conditions(include_bytes!("../test/conditions.json")).unwrap();

        assert_eq!(observation.weather, "Partly Cloudy");
        assert_eq!(
            observation.wind_string,
            "From the WSW at 4.0 MPH Gusting to 8.0 MPH"
        );
        assert_eq!(
            observation.icon_url.as_str(),
            "http://icons.wxug.com/i/c/k/partlycloudy.gif"
        );
        assert_eq!(observation.temp_f.as_f64(), Some(52.3));
    }

    #[test]
    fn missing_observation_is_an_error() {
        let error = decode_conditions(br#"{"response": {}}"#).unwrap_err();
        assert!(matches!(error, WeatherError::Json(_)));
    }

    #[test]
    fn temperature_is_spoken_as_received() {
        let icon = Frame::new(Size::new(1, 1));
        let mild = report(observation("72.5"), icon.clone()).unwrap();
        insta::assert_snapshot!(mild.sentence(), @"Right now the weather is Clear. The wind is Calm. The temperature is currently 72.5 degrees Fahrenheit.");

        let chilly = report(observation("41"), icon).unwrap();
        assert_eq!(chilly.temperature.to_string(), "41");
        assert_eq!(chilly.band(), TemperatureBand::Cool);
    }

    #[test]
    fn temperature_bands() {
        use TemperatureBand::*;

        let cases = [
            (-20.0, Cold),
            (39.999, Cold),
            (40.0, Cool),
            (59.999, Cool),
            (60.0, Comfortable),
            (72.0, Comfortable),
            (80.0, Comfortable),
            (80.001, Hot),
            (104.0, Hot),
        ];

        for (temp_f, band) in cases {
            assert_eq!(TemperatureBand::from_fahrenheit(temp_f), band, "{temp_f}");
        }
    }

    #[test]
    fn every_band_has_its_own_remark() {
        let remarks = [
            TemperatureBand::Cold,
            TemperatureBand::Cool,
            TemperatureBand::Comfortable,
            TemperatureBand::Hot,
        ]
        .map(TemperatureBand::remark);

        for (i, remark) in remarks.iter().enumerate() {
            assert!(!remarks[i + 1..].contains(remark));
        }
    }

    mod http {
        use std::io::Cursor;

        use wiremock::matchers::method;
        use wiremock::matchers::path;
        use wiremock::Mock;
        use wiremock::MockServer;
        use wiremock::ResponseTemplate;

        use super::*;

        const API_KEY: &str = "0123456789abcdef";
        const CONDITIONS_PATH: &str = "/api/0123456789abcdef/geolookup/conditions/q/CA/San_Francisco.json";

        fn client(server: &MockServer) -> WeatherClient {
            let config: WeatherConfig = toml::from_str(&format!(
                r#"
                api_key = "{API_KEY}"
                state = "CA"
                city = "San_Francisco"
                base_url = "{}/api/"
                timeout = "5s"
                "#,
                server.uri()
            ))
            .unwrap();
            WeatherClient::new(&config, Size::new(16, 8)).unwrap()
        }

        /// The conditions fixture, with the icon served by `server`
        fn conditions(server: &MockServer) -> String {
            include_str!("../test/conditions.json").replace(
                "http://icons.wxug.com/i/c/k/partlycloudy.gif",
                &format!("{}/icons/partlycloudy.png", server.uri()),
            )
        }

        /// Black icon, lit everywhere once inverted
        fn icon_png() -> Vec<u8> {
            let image = image::GrayImage::from_pixel(8, 8, image::Luma([0]));
            let mut buf = Cursor::new(Vec::new());
            image.write_to(&mut buf, image::ImageFormat::Png).unwrap();
            buf.into_inner()
        }

        async fn serve_icon(server: &MockServer, response: ResponseTemplate) {
            Mock::given(method("GET"))
                .and(path("/icons/partlycloudy.png"))
                .respond_with(response)
                .expect(1)
                .mount(server)
                .await;
        }

        #[tokio::test]
        async fn fetches_conditions_and_follows_icon_url() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(CONDITIONS_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_string(conditions(&server)))
                .expect(1)
                .mount(&server)
                .await;
            serve_icon(&server, ResponseTemplate::new(200).set_body_bytes(icon_png())).await;

            let report = client(&server).fetch().await.unwrap();

            assert_eq!(report.weather, "Partly Cloudy");
            assert_eq!(report.temperature.to_string(), "52.3");
            assert_eq!(report.band(), TemperatureBand::Cool);
            assert_eq!(report.icon.lit_count(), 16 * 8);
        }

        #[tokio::test]
        async fn server_error_keeps_api_key_out_of_the_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(CONDITIONS_PATH))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;

            let error = client(&server).fetch().await.unwrap_err();

            let WeatherError::Conditions(ref source) = error else {
                panic!("Expected conditions error, got {error:?}");
            };
            assert_eq!(source.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
            assert!(source.url().is_none());
            assert!(!format!("{error:?}").contains(API_KEY));
            assert!(!format!("{source}").contains(API_KEY));
        }

        #[tokio::test]
        async fn missing_icon_names_the_icon_url() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(CONDITIONS_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_string(conditions(&server)))
                .mount(&server)
                .await;
            serve_icon(&server, ResponseTemplate::new(404)).await;

            let error = client(&server).fetch().await.unwrap_err();

            let WeatherError::IconRequest { url, source } = error else {
                panic!("Expected icon error, got {error:?}");
            };
            assert_eq!(url.path(), "/icons/partlycloudy.png");
            assert_eq!(source.status(), Some(reqwest::StatusCode::NOT_FOUND));
        }

        #[tokio::test]
        async fn undecodable_icon_is_an_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(CONDITIONS_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_string(conditions(&server)))
                .mount(&server)
                .await;
            serve_icon(&server, ResponseTemplate::new(200).set_body_string("<html/>")).await;

            let error = client(&server).fetch().await.unwrap_err();
            assert!(matches!(error, WeatherError::IconDecode(_)));
        }
    }
}
