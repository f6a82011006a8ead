//! Site-wide settings read by the bootstrap renderer.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::ConfigError;

/// Substitution point for the site metadata JSON.
pub const SITE_DATA_MARKER: &str = "{{ site_data }}";
/// Substitution point for the start instruction JSON.
pub const START_DATA_MARKER: &str = "{{ start_data }}";

/// Bootstrap document used unless a custom one is configured.
///
/// Loads the client router, hands it the site metadata and performs the first
/// navigation into `#mainServerBody`.
pub const DEFAULT_BOOTSTRAP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">

<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<script src="https://sparkleweb.vercel.app/static/script.js"></script>
<link rel="shortcut icon" href="/static/favicon.ico" type="image/x-icon">
<script>
    var siteData = {{ site_data }};
    var startData = {{ start_data }};
    init(siteData.route, siteData.cssStylesheets, siteData.jsScripts);
    start(startData.template, startData.title, startData.args, startData.reload);
</script>
<link rel="stylesheet" href="https://sparkleweb.vercel.app/static/styles.css">
</head>

<body>
<div id="mainServerBody"></div>
</body>

</html>
"#;

/// Every key [`SiteConfig::configure`] accepts.
pub const FIELDS: [&str; 7] = [
    "template",
    "title",
    "args",
    "reload",
    "css_stylesheets",
    "js_scripts",
    "bootstrap_template",
];

/// Starting page settings applied together by [`SiteConfig::set_index`].
#[derive(Clone, Debug, PartialEq)]
pub struct IndexPage {
    template: String,
    title: Option<String>,
    args: Option<Map<String, Value>>,
    reload: Option<Vec<String>>,
}

impl IndexPage {
    /// Starting page titled "Home" with no arguments and nothing to reload.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            title: Some("Home".to_owned()),
            args: Some(Map::new()),
            reload: Some(Vec::new()),
        }
    }

    /// Set the document title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the arguments passed to the starting template.
    #[must_use]
    pub fn args(mut self, args: Map<String, Value>) -> Self {
        self.args = Some(args);
        self
    }

    /// Set the names of assets that need a full reload on navigation.
    #[must_use]
    pub fn reload(mut self, reload: Vec<String>) -> Self {
        self.reload = Some(reload);
        self
    }
}

/// Site-wide settings.
///
/// The set of settings is closed: [`SiteConfig::configure`] rejects any key not
/// listed in [`FIELDS`].
#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    template: Option<String>,
    title: Option<String>,
    args: Option<Map<String, Value>>,
    reload: Option<Vec<String>>,
    css_stylesheets: BTreeMap<String, String>,
    js_scripts: BTreeMap<String, String>,
    bootstrap_template: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            template: None,
            title: None,
            args: None,
            reload: None,
            css_stylesheets: BTreeMap::new(),
            js_scripts: BTreeMap::new(),
            bootstrap_template: DEFAULT_BOOTSTRAP_TEMPLATE.to_owned(),
        }
    }
}

impl SiteConfig {
    /// Replace the starting page settings.
    pub fn set_index(&mut self, index: IndexPage) {
        self.template = Some(index.template);
        self.title = index.title;
        self.args = index.args;
        self.reload = index.reload;
    }

    /// Replace all stylesheets.
    pub fn set_styles<K, V>(&mut self, styles: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.css_stylesheets = collect_assets(styles);
    }

    /// Replace all scripts.
    pub fn set_scripts<K, V>(&mut self, scripts: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.js_scripts = collect_assets(scripts);
    }

    /// Write a batch of settings by name.
    ///
    /// All keys are checked before anything is written. On error the
    /// configuration is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] for a key outside [`FIELDS`] and
    /// [`ConfigError::InvalidValue`] for a value of the wrong shape.
    pub fn configure<K>(
        &mut self,
        batch: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<(), ConfigError>
    where
        K: Into<String>,
    {
        let batch: Vec<(String, Value)> = batch.into_iter().map(|(k, v)| (k.into(), v)).collect();

        if let Some((key, _)) = batch.iter().find(|(key, _)| !FIELDS.contains(&key.as_str())) {
            return Err(ConfigError::InvalidKey(key.clone()));
        }

        let mut next = self.clone();
        for (key, value) in batch {
            next.assign(&key, value)?;
        }
        *self = next;

        Ok(())
    }

    /// Check that the bootstrap template has both substitution points.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the missing marker.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for marker in [SITE_DATA_MARKER, START_DATA_MARKER] {
            if !self.bootstrap_template.contains(marker) {
                return Err(ConfigError::Validation(format!(
                    "bootstrap template is missing the `{marker}` substitution point"
                )));
            }
        }
        Ok(())
    }

    /// Starting template, if one is set.
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Title of the starting page.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Arguments for the starting template.
    pub fn args(&self) -> Option<&Map<String, Value>> {
        self.args.as_ref()
    }

    /// Assets needing a full reload on navigation.
    pub fn reload(&self) -> Option<&[String]> {
        self.reload.as_deref()
    }

    /// Stylesheets by name.
    pub fn css_stylesheets(&self) -> &BTreeMap<String, String> {
        &self.css_stylesheets
    }

    /// Scripts by name.
    pub fn js_scripts(&self) -> &BTreeMap<String, String> {
        &self.js_scripts
    }

    /// Raw bootstrap document template.
    pub fn bootstrap_template(&self) -> &str {
        &self.bootstrap_template
    }

    fn assign(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        match key {
            "template" => self.template = field(key, value)?,
            "title" => self.title = field(key, value)?,
            "args" => self.args = field(key, value)?,
            "reload" => self.reload = field(key, value)?,
            "css_stylesheets" => self.css_stylesheets = field(key, value)?,
            "js_scripts" => self.js_scripts = field(key, value)?,
            "bootstrap_template" => self.bootstrap_template = field(key, value)?,
            _ => return Err(ConfigError::InvalidKey(key.to_owned())),
        }
        Ok(())
    }
}

fn field<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, ConfigError> {
    serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
        key: key.to_owned(),
        message: e.to_string(),
    })
}

fn collect_assets<K, V>(assets: impl IntoIterator<Item = (K, V)>) -> BTreeMap<String, String>
where
    K: Into<String>,
    V: Into<String>,
{
    assets
        .into_iter()
        .map(|(name, url)| (name.into(), url.into()))
        .collect()
}
