use semver::Version;
use std::{fmt, str::FromStr};

const LATEST_URL: &str = "https://core.telegram.org/bots/api";
const STABLE: (u64, u64, u64) = (5, 3, 0);

/// Documented Bot API releases and the archived copy of the page describing them.
const ARCHIVE: &[((u64, u64, u64), &str)] = &[
    ((1, 0, 0), "https://web.archive.org/web/20150714025308id_/https://core.telegram.org/bots/api/"),
    ((1, 1, 0), "https://web.archive.org/web/20150812125616id_/https://core.telegram.org/bots/api"),
    ((1, 4, 0), "https://web.archive.org/web/20150909214252id_/https://core.telegram.org/bots/api"),
    ((1, 5, 0), "https://web.archive.org/web/20150921091215id_/https://core.telegram.org/bots/api/"),
    ((1, 6, 0), "https://web.archive.org/web/20151023071257id_/https://core.telegram.org/bots/api"),
    ((1, 8, 0), "https://web.archive.org/web/20160112101045id_/https://core.telegram.org/bots/api"),
    ((1, 8, 2), "https://web.archive.org/web/20160126005312id_/https://core.telegram.org/bots/api"),
    ((1, 8, 3), "https://web.archive.org/web/20160305132243id_/https://core.telegram.org/bots/api"),
    ((2, 0, 0), "https://web.archive.org/web/20160413101342id_/https://core.telegram.org/bots/api"),
    ((2, 1, 0), "https://web.archive.org/web/20160912130321id_/https://core.telegram.org/bots/api"),
    ((2, 1, 1), "https://web.archive.org/web/20160912130321id_/https://core.telegram.org/bots/api"),
    ((2, 2, 0), "https://web.archive.org/web/20161004150232id_/https://core.telegram.org/bots/api"),
    ((2, 3, 0), "https://web.archive.org/web/20161124162115id_/https://core.telegram.org/bots/api"),
    ((2, 3, 1), "https://web.archive.org/web/20161204181811id_/https://core.telegram.org/bots/api"),
    ((3, 0, 0), "https://web.archive.org/web/20170612094628id_/https://core.telegram.org/bots/api"),
    ((3, 1, 0), "https://web.archive.org/web/20170703123052id_/https://core.telegram.org/bots/api"),
    ((3, 2, 0), "https://web.archive.org/web/20170819054238id_/https://core.telegram.org/bots/api"),
    ((3, 3, 0), "https://web.archive.org/web/20170914060628id_/https://core.telegram.org/bots/api"),
    ((3, 5, 0), "https://web.archive.org/web/20171201065426id_/https://core.telegram.org/bots/api"),
    ((3, 6, 0), "https://web.archive.org/web/20180217001114id_/https://core.telegram.org/bots/api"),
    ((4, 0, 0), "https://web.archive.org/web/20180728174553id_/https://core.telegram.org/bots/api"),
    ((4, 1, 0), "https://web.archive.org/web/20180828155646id_/https://core.telegram.org/bots/api"),
    ((4, 2, 0), "https://web.archive.org/web/20190417160652id_/https://core.telegram.org/bots/api"),
    ((4, 3, 0), "https://web.archive.org/web/20190601122107id_/https://core.telegram.org/bots/api"),
    ((4, 4, 0), "https://web.archive.org/web/20190731114703id_/https://core.telegram.org/bots/api"),
    ((4, 5, 0), "https://web.archive.org/web/20200107090812id_/https://core.telegram.org/bots/api"),
    ((4, 6, 0), "https://web.archive.org/web/20200208225346id_/https://core.telegram.org/bots/api"),
    ((4, 7, 0), "https://web.archive.org/web/20200401052001id_/https://core.telegram.org/bots/api"),
    ((4, 8, 0), "https://web.archive.org/web/20200429054924id_/https://core.telegram.org/bots/api"),
    ((4, 9, 0), "https://web.archive.org/web/20200611131321id_/https://core.telegram.org/bots/api"),
    ((5, 0, 0), "https://web.archive.org/web/20201104151640id_/https://core.telegram.org/bots/api"),
    ((5, 1, 0), "https://web.archive.org/web/20210315055600id_/https://core.telegram.org/bots/api"),
    ((5, 2, 0), "https://web.archive.org/web/20210428195636id_/https://core.telegram.org/bots/api"),
    ((5, 3, 0), "https://web.archive.org/web/20210626142851id_/https://core.telegram.org/bots/api"),
];

/// Which documentation page to scrape.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Latest,
    Archived { version: Version, url: &'static str },
}

impl Layer {
    /// Every archived release, oldest first.
    pub fn archived() -> impl Iterator<Item = Layer> {
        ARCHIVE.iter().map(|&((major, minor, patch), url)| Layer::Archived {
            version: Version::new(major, minor, patch),
            url,
        })
    }

    pub fn stable() -> Self {
        let (major, minor, patch) = STABLE;
        Self::find(major, minor, patch).unwrap_or(Layer::Latest)
    }

    /// Picks the layer named by `text`, falling back to the latest page for unknown versions.
    ///
    /// Accepts `latest`, `stable`, `5.3.0`, `5.3`, `v5.3.0` and the dotless `530` form.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim().to_ascii_lowercase();
        let text = text.trim_start_matches('v');
        if text == "stable" {
            return Self::stable();
        }

        let layer = if text.contains('.') {
            let mut components = text.split('.').map(|n| n.parse::<u64>().ok());
            match (
                components.next().flatten(),
                components.next().unwrap_or(Some(0)),
                components.next().unwrap_or(Some(0)),
            ) {
                (Some(major), Some(minor), Some(patch)) => Self::find(major, minor, patch),
                _ => None,
            }
        } else {
            ARCHIVE
                .iter()
                .find(|((major, minor, patch), _)| {
                    format!("{}{}{}", major, minor, patch) == text
                })
                .and_then(|&((major, minor, patch), _)| Self::find(major, minor, patch))
        };

        layer.unwrap_or_else(|| {
            if text != "latest" {
                log::warn!("Unknown Bot API version `{}`, using latest", text);
            }
            Layer::Latest
        })
    }

    fn find(major: u64, minor: u64, patch: u64) -> Option<Self> {
        ARCHIVE
            .iter()
            .find(|(version, _)| *version == (major, minor, patch))
            .map(|&(_, url)| Layer::Archived {
                version: Version::new(major, minor, patch),
                url,
            })
    }

    pub fn url(&self) -> &'static str {
        match self {
            Layer::Latest => LATEST_URL,
            Layer::Archived { url, .. } => *url,
        }
    }

    pub fn version(&self) -> Option<&Version> {
        match self {
            Layer::Latest => None,
            Layer::Archived { version, .. } => Some(version),
        }
    }

    /// File stem used for dumped artefacts: `v530`.
    pub fn file_stem(&self) -> String {
        match self {
            Layer::Latest => "latest".to_string(),
            Layer::Archived { version, .. } => {
                format!("v{}{}{}", version.major, version.minor, version.patch)
            }
        }
    }
}

impl FromStr for Layer {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_text(s))
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Latest => f.write_str("latest"),
            Layer::Archived { version, .. } => write!(f, "{}", version),
        }
    }
}
