use std::fmt;

use serde::Serialize;

use crate::MonitorOptions;

/// Identity and destination parameters handed to every error-capture
/// collaborator on activation.
///
/// Built from the held [`MonitorOptions`] at dispatch time; the values are
/// forwarded verbatim and never validated here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportContext {
    report_url: String,
    service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_path: Option<String>,
    service_version: String,
}

impl ReportContext {
    pub fn new(
        report_url: impl Into<String>,
        service: impl Into<String>,
        page_path: Option<String>,
        service_version: impl Into<String>,
    ) -> Self {
        Self {
            report_url: report_url.into(),
            service: service.into(),
            page_path,
            service_version: service_version.into(),
        }
    }

    /// Collector endpoint telemetry is sent to.
    pub fn report_url(&self) -> &str {
        &self.report_url
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn page_path(&self) -> Option<&str> {
        self.page_path.as_deref()
    }

    pub fn service_version(&self) -> &str {
        &self.service_version
    }
}

impl From<&MonitorOptions> for ReportContext {
    fn from(options: &MonitorOptions) -> Self {
        Self {
            report_url: options.report_url.clone(),
            service: options.service.clone(),
            page_path: options.page_path.clone(),
            service_version: options.service_version.clone(),
        }
    }
}

impl fmt::Display for ReportContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} -> {}", self.service, self.service_version, self.report_url)?;
        if let Some(path) = &self.page_path {
            write!(f, " ({path})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PartialOptions;

    #[test]
    fn built_from_options() {
        let options = MonitorOptions::from_partial(
            &PartialOptions::new()
                .with_service("shop")
                .with_report_url("https://collector/x")
                .with_service_version("1.2.0"),
        );
        let ctx = ReportContext::from(&options);

        assert_eq!(ctx.service(), "shop");
        assert_eq!(ctx.report_url(), "https://collector/x");
        assert_eq!(ctx.service_version(), "1.2.0");
        assert_eq!(ctx.page_path(), None);
    }

    #[test]
    fn display_includes_page_path() {
        let ctx = ReportContext::new("https://c", "shop", Some("/cart".into()), "1");
        assert_eq!(ctx.to_string(), "shop@1 -> https://c (/cart)");
    }

    #[test]
    fn serializes_camel_case_without_absent_path() {
        let ctx = ReportContext::new("https://c", "shop", None, "1");
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["reportUrl"], "https://c");
        assert_eq!(json["serviceVersion"], "1");
        assert!(json.get("pagePath").is_none());
    }
}
