use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{Framework, FrameworkHook, ReportContext, Result};

/// JSON names, aliases included, that map to a typed field. They never live
/// in `extra`, or the serialized configuration would repeat a key.
const TYPED_KEYS: &[&str] = &[
    "activateJsErrors",
    "jsErrors",
    "activateApiErrors",
    "apiErrors",
    "activateResourceErrors",
    "resourceErrors",
    "autoTracePerformance",
    "autoTracePerf",
    "useFirstMeaningfulPaint",
    "useFmp",
    "enableSinglePageAppMode",
    "enableSPA",
    "autoSendPerformance",
    "autoSendPerf",
    "service",
    "reportUrl",
    "pagePath",
    "serviceVersion",
];

fn is_typed_key(key: &str) -> bool {
    TYPED_KEYS.contains(&key)
}

/// Full configuration held by a [`ClientMonitor`](crate::ClientMonitor).
///
/// Starts at [`Default`] and is only ever changed by merging a
/// [`PartialOptions`] into it. The whole value is handed to the
/// [`PerformanceRecorder`](crate::PerformanceRecorder) on every recording,
/// including the keys the orchestrator does not interpret itself
/// (`auto_trace_performance`, `use_first_meaningful_paint`, `extra`).
///
/// Serializes with the camelCase key names accepted by
/// [`PartialOptions::from_json`]; the framework hook is not serializable
/// and is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorOptions {
    /// Enables script, promise and (with a hook) framework error capture.
    /// Default: true
    pub activate_js_errors: bool,

    /// Enables network/API error capture.
    /// Default: true
    pub activate_api_errors: bool,

    /// Enables resource-load error capture.
    /// Default: true
    pub activate_resource_errors: bool,

    /// Forwarded to the recorder.
    /// Default: true
    pub auto_trace_performance: bool,

    /// Forwarded to the recorder.
    /// Default: false
    pub use_first_meaningful_paint: bool,

    /// Re-record performance on every hash navigation.
    /// Default: false
    pub enable_single_page_app_mode: bool,

    /// When false, `register` does not schedule performance recording;
    /// the caller drives it through `set_performance_config`.
    /// Default: true
    pub auto_send_performance: bool,

    pub service: String,
    pub report_url: String,
    pub page_path: Option<String>,
    pub service_version: String,

    #[serde(skip)]
    pub framework: Framework,

    /// Keys the orchestrator does not recognize, kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        MonitorOptions {
            activate_js_errors: true,
            activate_api_errors: true,
            activate_resource_errors: true,
            auto_trace_performance: true,
            use_first_meaningful_paint: false,
            enable_single_page_app_mode: false,
            auto_send_performance: true,
            service: String::new(),
            report_url: String::new(),
            page_path: None,
            service_version: String::new(),
            framework: Framework::None,
            extra: BTreeMap::new(),
        }
    }
}

impl MonitorOptions {
    /// Defaults overridden by `partial`.
    pub fn from_partial(partial: &PartialOptions) -> Self {
        Self::default().merged(partial)
    }

    /// Shallow override: every key present in `partial` replaces the held
    /// value, every absent key is left alone. Values in `extra` are replaced
    /// whole, never merged recursively.
    pub fn merge(&mut self, partial: &PartialOptions) {
        if let Some(v) = partial.activate_js_errors {
            self.activate_js_errors = v;
        }
        if let Some(v) = partial.activate_api_errors {
            self.activate_api_errors = v;
        }
        if let Some(v) = partial.activate_resource_errors {
            self.activate_resource_errors = v;
        }
        if let Some(v) = partial.auto_trace_performance {
            self.auto_trace_performance = v;
        }
        if let Some(v) = partial.use_first_meaningful_paint {
            self.use_first_meaningful_paint = v;
        }
        if let Some(v) = partial.enable_single_page_app_mode {
            self.enable_single_page_app_mode = v;
        }
        if let Some(v) = partial.auto_send_performance {
            self.auto_send_performance = v;
        }
        if let Some(v) = &partial.service {
            self.service.clone_from(v);
        }
        if let Some(v) = &partial.report_url {
            self.report_url.clone_from(v);
        }
        if let Some(v) = &partial.page_path {
            self.page_path.clone_from(v);
        }
        if let Some(v) = &partial.service_version {
            self.service_version.clone_from(v);
        }
        if let Some(v) = &partial.framework {
            self.framework = v.clone();
        }
        for (key, value) in &partial.extra {
            if is_typed_key(key) {
                tracing::warn!(key = %key, "extra key shadows a typed option, ignored");
                continue;
            }
            self.extra.insert(key.clone(), value.clone());
        }
    }

    /// Like [`merge`](Self::merge) but returns a new value.
    pub fn merged(&self, partial: &PartialOptions) -> Self {
        let mut options = self.clone();
        options.merge(partial);
        options
    }

    /// Identity parameters passed to error-capture collaborators.
    pub fn report_context(&self) -> ReportContext {
        ReportContext::from(self)
    }
}

/// A subset of [`MonitorOptions`] to merge into the held configuration.
///
/// `None` means "key absent, keep the held value". Build one in code with
/// the `with_*` methods or parse it from JSON:
///
/// ```rust
/// use client_monitor::PartialOptions;
///
/// let from_code = PartialOptions::new()
///     .with_service("shop")
///     .with_activate_resource_errors(false);
///
/// let from_json = PartialOptions::from_json(
///     r#"{ "service": "shop", "resourceErrors": false }"#,
/// )?;
///
/// assert_eq!(from_code, from_json);
/// # Ok::<(), client_monitor::Error>(())
/// ```
///
/// JSON keys use camelCase names; the short names `jsErrors`, `apiErrors`,
/// `resourceErrors`, `autoTracePerf`, `useFmp`, `enableSPA` and
/// `autoSendPerf` are accepted as aliases. `"pagePath": null` clears the page
/// path, while leaving the key out keeps it. Unrecognized keys land in
/// `extra` and are forwarded to the recorder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialOptions {
    #[serde(default, alias = "jsErrors")]
    pub activate_js_errors: Option<bool>,

    #[serde(default, alias = "apiErrors")]
    pub activate_api_errors: Option<bool>,

    #[serde(default, alias = "resourceErrors")]
    pub activate_resource_errors: Option<bool>,

    #[serde(default, alias = "autoTracePerf")]
    pub auto_trace_performance: Option<bool>,

    #[serde(default, alias = "useFmp")]
    pub use_first_meaningful_paint: Option<bool>,

    #[serde(default, alias = "enableSPA")]
    pub enable_single_page_app_mode: Option<bool>,

    #[serde(default, alias = "autoSendPerf")]
    pub auto_send_performance: Option<bool>,

    #[serde(default)]
    pub service: Option<String>,

    #[serde(default)]
    pub report_url: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub page_path: Option<Option<String>>,

    #[serde(default)]
    pub service_version: Option<String>,

    #[serde(skip)]
    pub framework: Option<Framework>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Marks a key as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl PartialOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`](crate::Error::InvalidOptions) if the
    /// input is not a JSON object or a recognized key has a value of the
    /// wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Same as [`from_json`](Self::from_json) for an already parsed value.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns `true` if no key is present.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn with_activate_js_errors(mut self, enabled: bool) -> Self {
        self.activate_js_errors = Some(enabled);
        self
    }

    pub fn with_activate_api_errors(mut self, enabled: bool) -> Self {
        self.activate_api_errors = Some(enabled);
        self
    }

    pub fn with_activate_resource_errors(mut self, enabled: bool) -> Self {
        self.activate_resource_errors = Some(enabled);
        self
    }

    pub fn with_auto_trace_performance(mut self, enabled: bool) -> Self {
        self.auto_trace_performance = Some(enabled);
        self
    }

    pub fn with_use_first_meaningful_paint(mut self, enabled: bool) -> Self {
        self.use_first_meaningful_paint = Some(enabled);
        self
    }

    pub fn with_single_page_app_mode(mut self, enabled: bool) -> Self {
        self.enable_single_page_app_mode = Some(enabled);
        self
    }

    pub fn with_auto_send_performance(mut self, enabled: bool) -> Self {
        self.auto_send_performance = Some(enabled);
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_report_url(mut self, url: impl Into<String>) -> Self {
        self.report_url = Some(url.into());
        self
    }

    pub fn with_page_path(mut self, path: impl Into<String>) -> Self {
        self.page_path = Some(Some(path.into()));
        self
    }

    /// Clear the held page path.
    pub fn without_page_path(mut self) -> Self {
        self.page_path = Some(None);
        self
    }

    pub fn with_service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    pub fn with_framework_hook(mut self, hook: FrameworkHook) -> Self {
        self.framework = Some(Framework::Hook(hook));
        self
    }

    /// Remove a previously installed framework hook.
    pub fn without_framework(mut self) -> Self {
        self.framework = Some(Framework::None);
        self
    }

    /// Add an unrecognized key forwarded opaquely to the recorder.
    ///
    /// Names of typed options (`service`, `enableSPA`, ...) are ignored;
    /// set those through their own `with_*` method.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if is_typed_key(&key) {
            tracing::warn!(key = %key, "extra key shadows a typed option, ignored");
            return self;
        }
        self.extra.insert(key, value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Error;

    fn sample_partial() -> PartialOptions {
        PartialOptions::new()
            .with_service("shop")
            .with_activate_api_errors(false)
            .with_page_path("/cart")
            .with_extra("sampleRate", 0.5)
    }

    #[test]
    fn defaults_match_documented_values() {
        let o = MonitorOptions::default();
        assert!(o.activate_js_errors);
        assert!(o.activate_api_errors);
        assert!(o.activate_resource_errors);
        assert!(o.auto_trace_performance);
        assert!(!o.use_first_meaningful_paint);
        assert!(!o.enable_single_page_app_mode);
        assert!(o.auto_send_performance);
        assert!(o.framework.is_none());
        assert!(o.page_path.is_none());
    }

    #[test]
    fn merge_is_idempotent() {
        let base = MonitorOptions::default().merged(
            &PartialOptions::new()
                .with_report_url("https://collector/x")
                .with_single_page_app_mode(true),
        );
        let p = sample_partial();

        let once = base.merged(&p);
        let twice = once.merged(&p);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_only_touches_present_keys() {
        let base = MonitorOptions::from_partial(
            &PartialOptions::new()
                .with_report_url("https://collector/x")
                .with_service_version("2.0"),
        );
        let merged = base.merged(&sample_partial());

        assert_eq!(merged.service, "shop");
        assert!(!merged.activate_api_errors);
        assert_eq!(merged.page_path.as_deref(), Some("/cart"));
        assert_eq!(merged.extra["sampleRate"], json!(0.5));

        assert_eq!(merged.report_url, "https://collector/x");
        assert_eq!(merged.service_version, "2.0");
        assert!(merged.activate_js_errors);
        assert!(merged.activate_resource_errors);
    }

    #[test]
    fn empty_partial_is_noop() {
        let base = MonitorOptions::from_partial(&sample_partial());
        assert!(PartialOptions::new().is_empty());
        assert_eq!(base.merged(&PartialOptions::new()), base);
    }

    #[test]
    fn page_path_can_be_cleared() {
        let base = MonitorOptions::from_partial(&sample_partial());
        let cleared = base.merged(&PartialOptions::new().without_page_path());
        assert_eq!(cleared.page_path, None);
    }

    #[test]
    fn framework_hook_can_be_installed_and_removed() {
        let hook = FrameworkHook::new("vue");
        let with_hook =
            MonitorOptions::default().merged(&PartialOptions::new().with_framework_hook(hook.clone()));
        assert_eq!(with_hook.framework.hook(), Some(&hook));

        let kept = with_hook.merged(&PartialOptions::new().with_service("shop"));
        assert_eq!(kept.framework.hook(), Some(&hook));

        let removed = kept.merged(&PartialOptions::new().without_framework());
        assert!(removed.framework.is_none());
    }

    #[test]
    fn extra_values_are_replaced_not_merged() {
        let base = MonitorOptions::from_partial(
            &PartialOptions::new().with_extra("custom", json!({ "a": 1, "b": 2 })),
        );
        let merged = base.merged(&PartialOptions::new().with_extra("custom", json!({ "c": 3 })));
        assert_eq!(merged.extra["custom"], json!({ "c": 3 }));
    }

    #[test]
    fn parses_descriptive_and_short_names() {
        let long = PartialOptions::from_json(
            r#"{
                "activateJsErrors": false,
                "activateApiErrors": true,
                "enableSinglePageAppMode": true,
                "autoSendPerformance": false,
                "useFirstMeaningfulPaint": true
            }"#,
        )
        .unwrap();
        let short = PartialOptions::from_json(
            r#"{
                "jsErrors": false,
                "apiErrors": true,
                "enableSPA": true,
                "autoSendPerf": false,
                "useFmp": true
            }"#,
        )
        .unwrap();

        assert_eq!(long, short);
        assert_eq!(long.activate_js_errors, Some(false));
        assert_eq!(long.enable_single_page_app_mode, Some(true));
        assert_eq!(long.auto_send_performance, Some(false));
        assert!(long.extra.is_empty());
    }

    #[test]
    fn parses_identity_fields_and_unknown_keys() {
        let partial = PartialOptions::from_value(json!({
            "service": "shop",
            "reportUrl": "https://collector/x",
            "serviceVersion": "1.0.0",
            "pagePath": null,
            "vueVersion": 3
        }))
        .unwrap();

        assert_eq!(partial.service.as_deref(), Some("shop"));
        assert_eq!(partial.report_url.as_deref(), Some("https://collector/x"));
        assert_eq!(partial.service_version.as_deref(), Some("1.0.0"));
        assert_eq!(partial.page_path, Some(None));
        assert_eq!(partial.extra["vueVersion"], json!(3));
    }

    #[test]
    fn missing_page_path_is_absent() {
        let partial = PartialOptions::from_json(r#"{ "service": "shop" }"#).unwrap();
        assert_eq!(partial.page_path, None);
    }

    #[test]
    fn rejects_wrong_types_and_non_objects() {
        assert!(matches!(
            PartialOptions::from_json(r#"{ "jsErrors": "yes" }"#),
            Err(Error::InvalidOptions(_))
        ));
        assert!(matches!(
            PartialOptions::from_json("[1, 2]"),
            Err(Error::InvalidOptions(_))
        ));
    }

    #[test]
    fn extra_cannot_shadow_typed_keys() {
        let partial = PartialOptions::new()
            .with_service("shop")
            .with_extra("service", "evil")
            .with_extra("enableSPA", true)
            .with_extra("sampleRate", 0.5);
        assert_eq!(partial.extra.len(), 1);

        let mut raw = PartialOptions::new();
        raw.extra.insert("reportUrl".into(), json!("https://elsewhere"));
        let merged = MonitorOptions::default().merged(&raw);
        assert!(merged.extra.is_empty());
        assert_eq!(merged.report_url, "");
    }

    #[test]
    fn serialized_options_parse_back() {
        let options = MonitorOptions::from_partial(
            &PartialOptions::new()
                .with_service("shop")
                .with_extra("service", "evil")
                .with_extra("sampleRate", 0.5)
                .with_page_path("/cart"),
        );
        let json = serde_json::to_string(&options).unwrap();

        let parsed = PartialOptions::from_json(&json).unwrap();
        assert_eq!(MonitorOptions::from_partial(&parsed), options);
        assert_eq!(parsed.service.as_deref(), Some("shop"));
        assert_eq!(parsed.extra["sampleRate"], json!(0.5));
    }

    #[test]
    fn serializes_full_configuration_for_recorders() {
        let options = MonitorOptions::from_partial(
            &PartialOptions::new()
                .with_service("shop")
                .with_framework_hook(FrameworkHook::new("vue"))
                .with_extra("sampleRate", 0.5),
        );
        let json = serde_json::to_value(&options).unwrap();

        assert_eq!(json["service"], "shop");
        assert_eq!(json["activateJsErrors"], true);
        assert_eq!(json["enableSinglePageAppMode"], false);
        assert_eq!(json["sampleRate"], 0.5);
        assert!(json.get("framework").is_none());
    }
}
