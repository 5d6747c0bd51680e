//! Single-Page-App Example
//!
//! A page with hash-based routing. The monitor activates error capture at
//! registration, records performance once the page loads, and records again
//! on every hash navigation.
//!
//! # Key Concepts Demonstrated
//!
//! ## 1. Closures as Collaborators
//!
//! Capture subsystems and the recorder are plain closures here. A real page
//! bridge would install listeners and send beacons instead of printing.
//!
//! ## 2. Driving the Page from an Async Source
//!
//! `SignalPump` forwards signals from a channel into the page loop, the way a
//! DOM bridge would forward `load` and `hashchange` events.
//!
//! ## 3. Reconfiguration Between Navigations
//!
//! `set_performance_config` changes `pagePath` after the first navigation.
//! Later recordings see the new value.

use client_monitor::{
    ClientMonitor, Collaborators, ErrorCategory, MonitorOptions, PartialOptions, ReportContext,
    Result,
    host::{HostSignal, Page, SignalPump},
};

fn collaborators() -> Collaborators {
    Collaborators::new(|options: &MonitorOptions| {
        println!(
            "[perf] {} {} path={}",
            options.service,
            options.service_version,
            options.page_path.as_deref().unwrap_or("-")
        );
        Ok(())
    })
    .with_script_errors(|ctx: &ReportContext| {
        println!("[script] capturing for {ctx}");
        Ok(())
    })
    .with_promise_errors(|ctx: &ReportContext| {
        println!("[promise] capturing for {ctx}");
        Ok(())
    })
    .with_api_errors(|ctx: &ReportContext| {
        println!("[api] capturing for {ctx}");
        Ok(())
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let page = Page::new();
    let mut monitor = ClientMonitor::new(page.clone(), collaborators());

    let options = PartialOptions::from_json(
        r#"{
            "service": "shop",
            "serviceVersion": "2.4.0",
            "reportUrl": "https://collector.example/rum",
            "resourceErrors": false,
            "enableSPA": true
        }"#,
    )?;

    let report = monitor.register(&options);
    for (category, outcome) in report.activation().iter() {
        println!("{category}: {outcome:?}");
    }
    assert!(!monitor.is_active(ErrorCategory::Resource));

    page.emit(HostSignal::Load);
    page.emit(HostSignal::HashChange);
    page.run_pending();

    // Route changed: the page is loaded, so this records right away and
    // later navigations carry the new path.
    let schedule =
        monitor.set_performance_config(&PartialOptions::new().with_page_path("/cart"));
    println!("manual recording: {:?}", schedule.load);

    let (pump, sender) = SignalPump::new(page);
    sender.send(HostSignal::HashChange)?;
    sender.send(HostSignal::HashChange)?;
    drop(sender);

    let processed = pump.run().await;
    println!("processed {processed} page signals");

    let cancelled = monitor.teardown();
    println!("cancelled {cancelled} subscriptions");
    Ok(())
}
