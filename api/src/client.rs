use crate::error::ApiError;
use crate::schema::SchemaVersion;
use crate::{NormalizeOptions, StarRailInfo};
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const BASE_URL: &str = "https://api.mihomo.me/sr_info_parsed";
pub const ASSET_URL: &str = "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master";

/// Response language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Cht,
    Chs,
    De,
    En,
    Es,
    Fr,
    Id,
    Jp,
    Kr,
    Pt,
    Ru,
    Th,
    Vi,
}

impl Language {
    pub const ALL: [Language; 13] = [
        Language::Cht,
        Language::Chs,
        Language::De,
        Language::En,
        Language::Es,
        Language::Fr,
        Language::Id,
        Language::Jp,
        Language::Kr,
        Language::Pt,
        Language::Ru,
        Language::Th,
        Language::Vi,
    ];

    /// Value of the `lang` query parameter.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Cht => "cht",
            Language::Chs => "cn",
            Language::De => "de",
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Id => "id",
            Language::Jp => "jp",
            Language::Kr => "kr",
            Language::Pt => "pt",
            Language::Ru => "ru",
            Language::Th => "th",
            Language::Vi => "vi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language code `{0}`")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or_else(|| UnknownLanguage(s.to_owned()))
    }
}

/// Client for the anonymous mihomo profile API.
#[derive(Debug, Clone)]
pub struct MihomoApi {
    client: Client,
    language: Language,
    base_url: String,
    asset_url: String,
    timeout: Duration,
}

impl Default for MihomoApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("srinfo/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            language: Language::default(),
            base_url: BASE_URL.to_owned(),
            asset_url: ASSET_URL.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl MihomoApi {
    pub fn new(language: Language) -> Self {
        Self { language, ..Self::default() }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_asset_url(mut self, url: impl Into<String>) -> Self {
        self.asset_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Fetch a profile and run it through the whole normalization pipeline.
    ///
    /// With `replace_icon_name_with_url`, every icon path in the payload is
    /// turned into an absolute asset URL before mapping.
    pub async fn fetch_user(
        &self,
        uid: u64,
        version: SchemaVersion,
        replace_icon_name_with_url: bool,
    ) -> ApiResult<StarRailInfo> {
        let raw = self.request(uid, self.language, version).await?;
        let options = NormalizeOptions {
            asset_base_url: replace_icon_name_with_url.then(|| self.asset_url.clone()),
        };
        Ok(crate::normalize(raw, version, &options)?)
    }

    /// Fetch the raw payload for `uid`, untouched.
    pub async fn request(
        &self,
        uid: u64,
        language: Language,
        version: SchemaVersion,
    ) -> ApiResult<Value> {
        let mut url = format!("{}/{uid}?lang={}", self.base_url, language.code());
        if let Some(v) = version.query_value() {
            url.push_str("&version=");
            url.push_str(v);
        }
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network { source: e, url: url.clone() })?;

        match response.status().as_u16() {
            200 => response
                .json::<Value>()
                .await
                .map_err(|e| ApiError::Parsing { source: e, url }),
            400 => {
                let detail = response
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_owned));
                Err(ApiError::InvalidParams(detail))
            }
            404 => Err(ApiError::UserNotFound(uid)),
            status => Err(ApiError::Api { status, url }),
        }
    }

    /// Absolute URL of an icon path from a payload.
    pub fn get_icon_url(&self, icon: &str) -> String {
        crate::sanitize::asset_url(&self.asset_url, icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const CURRENT: &str = include_str!("../fixtures/current.json");
    const V1: &str = include_str!("../fixtures/v1.json");

    fn api(server: &mockito::Server) -> MihomoApi {
        MihomoApi::new(Language::En)
            .with_base_url(server.url())
            .with_asset_url("https://assets.test/")
    }

    #[test]
    fn language_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
        assert_eq!("CN".parse::<Language>().unwrap(), Language::Chs);
        assert_eq!("xx".parse::<Language>(), Err(UnknownLanguage("xx".into())));
    }

    #[test]
    fn icon_urls_join_with_a_slash() {
        let api = MihomoApi::default().with_asset_url("https://assets.test/");
        assert_eq!(api.get_icon_url("icon/avatar/1.png"), "https://assets.test/icon/avatar/1.png");
    }

    #[tokio::test]
    async fn fetch_user_runs_the_whole_pipeline() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/800000001")
            .match_query(Matcher::UrlEncoded("lang".into(), "en".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(CURRENT)
            .create_async()
            .await;

        let info = api(&server)
            .fetch_user(800_000_001, SchemaVersion::Current, true)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(info.player.avatar.icon, "https://assets.test/icon/avatar/1001.png");
        assert_eq!(info.character("8002").unwrap().name, "Stelle");
    }

    #[tokio::test]
    async fn v1_requests_send_the_version_parameter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/800000001")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lang".into(), "en".into()),
                Matcher::UrlEncoded("version".into(), "v1".into()),
            ]))
            .with_status(200)
            .with_body(V1)
            .create_async()
            .await;

        let info = api(&server).fetch_user(800_000_001, SchemaVersion::V1, false).await.unwrap();

        mock.assert_async().await;
        assert_eq!(info.characters[0].icon, "icon/character/1102.png");
    }

    #[tokio::test]
    async fn not_found_maps_to_user_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/1")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let err = api(&server).fetch_user(1, SchemaVersion::Current, false).await.unwrap_err();
        assert!(matches!(err, ApiError::UserNotFound(1)));
    }

    #[tokio::test]
    async fn bad_request_carries_the_detail() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/2")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"detail": "Invalid uid"}"#)
            .create_async()
            .await;

        let err = api(&server).request(2, Language::En, SchemaVersion::Current).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidParams(Some(ref d)) if d == "Invalid uid"));
    }

    #[tokio::test]
    async fn bad_request_without_json_has_no_detail() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/3")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body("nope")
            .create_async()
            .await;

        let err = api(&server).request(3, Language::En, SchemaVersion::Current).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidParams(None)));
    }

    #[tokio::test]
    async fn server_errors_keep_their_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/4")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = api(&server).request(4, Language::En, SchemaVersion::Current).await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn incomplete_payload_is_a_mapping_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/5")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"player": {"nickname": "x"}, "characters": []}"#)
            .create_async()
            .await;

        let err = api(&server).fetch_user(5, SchemaVersion::Current, false).await.unwrap_err();
        assert!(matches!(err, ApiError::Mapping(ref e) if e.path() == "player.uid"));
    }
}
