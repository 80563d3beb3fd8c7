use std::time::Duration;

use pretty_assertions::assert_eq;
use puppy_monitor::config::{SiteSpec, TargetSelector, TransportKind};
use puppy_monitor::models::CheckOutcome;
use puppy_monitor::notifier::{Notifier, NotifyStatus};
use puppy_monitor::runner::Watcher;
use puppy_monitor::utils::http::create_client;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASELINE: &str = "Aktuell ist kein Wurf geplant. Daher nehmen wir auch keine Anfragen entgegen.";

fn kennel_page(heading: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
        <html><head><title>Wurfplanung</title></head>
        <body>
          <nav><h2 class="uk-h2">Menu</h2></nav>
          <h2 class="uk-h2 uk-text-warning">{}</h2>
        </body></html>"#,
        heading
    )
}

fn site(name: &str, url: String) -> SiteSpec {
    SiteSpec {
        name: name.to_string(),
        url,
        expected_text: BASELINE.to_string(),
        selector: TargetSelector::new("h2", "uk-h2 uk-text-warning"),
    }
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn timeout_alone_triggers_sendgrid_email() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/golden-harmony",
        ResponseTemplate::new(200).set_body_string(kennel_page(
            "Aktuell ist kein Wurf geplant.<br>\n   Daher nehmen wir auch keine Anfragen entgegen.",
        )),
    )
    .await;
    mount_page(
        &server,
        "/slow-kennel",
        ResponseTemplate::new(200)
            .set_body_string(kennel_page(BASELINE))
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let timeout = Duration::from_millis(300);
    let client = create_client("pipeline-test", timeout).unwrap();
    let api_url = format!("{}/v3/mail/send", server.uri());
    let lookup = move |var: &str| match var {
        "SENDGRID_API_KEY" => Some("SG.pipeline".to_string()),
        "SENDER_EMAIL" => Some("monitor@example.com".to_string()),
        "RECEIVER_EMAIL" => Some("owner@example.com".to_string()),
        "SENDGRID_API_URL" => Some(api_url.clone()),
        _ => None,
    };
    let notifier = Notifier::from_lookup(TransportKind::SendGrid, &client, timeout, &lookup);

    let slow_url = format!("{}/slow-kennel", server.uri());
    let watcher = Watcher::new(
        client,
        vec![
            site("Golden Harmony", format!("{}/golden-harmony", server.uri())),
            site("Slow Kennel", slow_url.clone()),
        ],
        timeout,
        notifier,
    );

    let summary = watcher.run().await;

    assert!(matches!(summary.notification, Some(NotifyStatus::Sent)));
    assert_eq!(summary.report.len(), 1);
    let entry = &summary.report.entries()[0];
    assert!(entry.starts_with(&format!("Slow Kennel ({}) - Error fetching page:", slow_url)));
    assert!(entry.contains("timed out"));

    let requests = server.received_requests().await.unwrap();
    let mail = requests
        .iter()
        .find(|r| r.url.path() == "/v3/mail/send")
        .expect("mail request");
    let payload: Value = serde_json::from_slice(&mail.body).unwrap();
    assert_eq!(payload["subject"], "Puppies might be available");
    let plain = payload["content"][0]["value"].as_str().unwrap();
    assert!(plain.contains("Slow Kennel"));
    assert!(!plain.contains("Golden Harmony"));
}

#[tokio::test]
async fn missing_mail_settings_do_not_escape_the_run() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/golden-harmony",
        ResponseTemplate::new(200).set_body_string(kennel_page("Wurf im Mai geplant! Jetzt anfragen.")),
    )
    .await;

    let timeout = Duration::from_secs(2);
    let client = create_client("pipeline-test", timeout).unwrap();
    let notifier = Notifier::from_lookup(TransportKind::SendGrid, &client, timeout, &|_: &str| None);
    let watcher = Watcher::new(
        client,
        vec![site("Golden Harmony", format!("{}/golden-harmony", server.uri()))],
        timeout,
        notifier,
    );

    let summary = watcher.run().await;

    let expected = CheckOutcome::Changed("Wurf im Mai geplant! Jetzt anfragen.".to_string())
        .describe(&watcher.sites()[0])
        .unwrap();
    assert_eq!(summary.report.entries(), &[expected]);
    assert!(matches!(summary.notification, Some(NotifyStatus::NotConfigured(_))));
}
