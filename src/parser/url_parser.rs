use super::errors::ParseError;
use super::models::VideoId;
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    static ref ID_PATTERN: Regex = Regex::new(r"^[0-9A-Za-z_-]{11}$").unwrap();
}

const WATCH_HOSTS: [&str; 4] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
];

const PATH_PREFIXES: [&str; 4] = ["shorts", "embed", "live", "v"];

pub struct UrlParser;

impl UrlParser {
    /// 将链接或裸 ID 解析为视频 ID
    pub fn parse(input: &str) -> Result<VideoId, ParseError> {
        let input = input.trim();

        if ID_PATTERN.is_match(input) {
            return Ok(VideoId(input.to_string()));
        }

        let url = Url::parse(input).map_err(|_| ParseError::InvalidLocator(input.to_string()))?;
        Self::extract_id(&url).ok_or_else(|| ParseError::InvalidLocator(input.to_string()))
    }

    fn extract_id(url: &Url) -> Option<VideoId> {
        let host = url.host_str()?;
        let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

        let candidate = if host == "youtu.be" {
            segments.next().map(str::to_string)
        } else if WATCH_HOSTS.contains(&host) {
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned()),
                Some(prefix) if PATH_PREFIXES.contains(&prefix) => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            }
        } else {
            None
        };

        candidate
            .filter(|id| ID_PATTERN.is_match(id))
            .map(VideoId)
    }
}
