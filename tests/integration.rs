
use fixtures::*;

use ccw::app::{self, ExitReason};
use ccw::circle::{parser, BuildFetcher, BuildSource, CircleClient};
use ccw::config::{Config, FetchPolicy};
use ccw::coordinator::{RefreshCoordinator, RefreshState};
use ccw::error::FetchError;
use ccw::events::AppEvent;
use ccw::model::{self, ColorClass};
use ccw::ticker::Ticker;

use chrono::{TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use mockito::Matcher;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const BUILDS_JSON: &str = r#"[
    {
        "build_num": 103,
        "status": "running",
        "job_name": null,
        "workflows": {"job_name": "deploy", "workflow_name": "ci"},
        "start_time": "2024-06-01T10:10:00.000Z",
        "stop_time": null,
        "build_url": "https://circleci.com/gh/acme/widget/103"
    },
    {
        "build_num": 102,
        "status": "failed",
        "job_name": "test",
        "start_time": "2024-06-01T10:00:00.000Z",
        "stop_time": "2024-06-01T10:02:05.000Z",
        "build_url": "https://circleci.com/gh/acme/widget/102"
    },
    {
        "build_num": 101,
        "status": "fixed",
        "start_time": null,
        "stop_time": null,
        "build_url": "https://circleci.com/gh/acme/widget/101"
    }
]"#;

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

fn config(api_base: String, policy: FetchPolicy) -> Config {
    Config {
        token: "secret-token".to_string(),
        update_interval: Duration::from_secs(30),
        fetch_policy: policy,
        api_base,
    }
}

fn coordinator(source: Arc<dyn BuildSource>) -> (Arc<RefreshCoordinator<RecordingPresenter>>, RecordingPresenter) {
    let presenter = RecordingPresenter::default();
    let coord = RefreshCoordinator::new(
        project(),
        BuildFetcher::new(source, FetchPolicy::Degrade),
        presenter.clone(),
    );
    (Arc::new(coord), presenter)
}

/// A ticker whose only tick in test time is the immediate first one.
fn slow_ticker(tx: &mpsc::UnboundedSender<AppEvent>) -> Ticker {
    Ticker::spawn(Duration::from_secs(3600), tx.clone())
}

// ========== Data flow ==========

#[test]
fn json_to_display_model() {
    let raws = parser::parse_builds(BUILDS_JSON).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 12, 30).unwrap();
    let model = model::build_at(&project(), &raws, now);

    assert_eq!(model.title, "builds for acme/widget/tree/main");
    assert_eq!(model.rows.len(), 3);

    let cells: Vec<[&str; 5]> = model.rows.iter().map(|r| r.cells()).collect();
    assert_eq!(
        cells,
        vec![
            ["103", "deploy", "running", "2m 30s", "https://circleci.com/gh/acme/widget/103"],
            ["102", "test", "failed", "2m 5s", "https://circleci.com/gh/acme/widget/102"],
            ["101", "build", "fixed", "n/a", "https://circleci.com/gh/acme/widget/101"],
        ]
    );
    let colors: Vec<ColorClass> = model.rows.iter().map(|r| r.color).collect();
    assert_eq!(
        colors,
        vec![ColorClass::Neutral, ColorClass::Failure, ColorClass::Success]
    );
}

#[test]
fn row_count_matches_input_for_any_length() {
    for n in [0usize, 1, 5, 30] {
        let raws: Vec<_> = (0..n as u64).map(|i| raw_build(i, "success")).collect();
        let model = model::build(&project(), &raws);
        assert_eq!(model.rows.len(), n);
        let nums: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let got: Vec<String> = model.rows.iter().map(|r| r.build_num.clone()).collect();
        assert_eq!(got, nums);
    }
}

#[test]
fn in_progress_duration_is_recomputed_each_build() {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
    let raws = vec![timed_build(1, "running", start, None)];
    let earlier = model::build_at(&project(), &raws, start + chrono::Duration::seconds(10));
    let later = model::build_at(&project(), &raws, start + chrono::Duration::seconds(40));
    assert_eq!(earlier.rows[0].duration, "10s");
    assert_eq!(later.rows[0].duration, "40s");
}

#[test]
fn workflow_job_name_used_when_no_job_name() {
    let model = model::build(&project(), &[workflow_build(1, "success", "lint")]);
    assert_eq!(model.rows[0].job_name, "lint");
}

// ========== CircleCI client ==========

#[tokio::test]
async fn client_requests_first_page_with_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/project/github/acme/widget/tree/main")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "30".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
        ]))
        .match_header("circle-token", "secret-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(BUILDS_JSON)
        .create_async()
        .await;

    let client = CircleClient::new(&config(server.url(), FetchPolicy::Propagate)).unwrap();
    let fetcher = BuildFetcher::new(Arc::new(client), FetchPolicy::Propagate);
    let builds = fetcher.fetch(&project()).await.unwrap();

    mock.assert_async().await;
    let nums: Vec<u64> = builds.iter().map(|b| b.build_num).collect();
    assert_eq!(nums, vec![103, 102, 101]);
}

#[tokio::test]
async fn client_server_error_propagates() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let client = CircleClient::new(&config(server.url(), FetchPolicy::Propagate)).unwrap();
    let fetcher = BuildFetcher::new(Arc::new(client), FetchPolicy::Propagate);
    match fetcher.fetch(&project()).await {
        Err(FetchError::Status { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn client_server_error_degrades_to_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(404)
        .with_body(r#"{"message": "Project not found"}"#)
        .create_async()
        .await;

    let client = CircleClient::new(&config(server.url(), FetchPolicy::Degrade)).unwrap();
    let fetcher = BuildFetcher::new(Arc::new(client), FetchPolicy::Degrade);
    assert!(fetcher.fetch(&project()).await.unwrap().is_empty());
}

#[tokio::test]
async fn client_garbage_body_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = CircleClient::new(&config(server.url(), FetchPolicy::Propagate)).unwrap();
    let fetcher = BuildFetcher::new(Arc::new(client), FetchPolicy::Propagate);
    assert!(matches!(
        fetcher.fetch(&project()).await,
        Err(FetchError::Decode(_))
    ));
}

// ========== Run loop ==========

#[tokio::test]
async fn quit_while_idle_stops_timer_and_exits() {
    let (coord, presenter) = coordinator(Arc::new(StaticSource(Vec::new())));
    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(AppEvent::Key(press(KeyCode::Char('q')))).unwrap();
    let ticker = slow_ticker(&tx);

    let reason = app::run(coord.clone(), &mut rx, &ticker).await;

    assert_eq!(reason, ExitReason::Quit);
    assert_eq!(coord.state(), RefreshState::Stopped);
    assert_eq!(presenter.renders(), 0);

    // Once the ticker is gone only our own sender keeps the channel open.
    drop(tx);
    let drained = tokio::time::timeout(Duration::from_secs(1), async {
        while let Some(ev) = rx.recv().await {
            assert_eq!(ev, AppEvent::Tick);
        }
    })
    .await;
    assert!(drained.is_ok(), "ticker still running after quit");
}

#[tokio::test]
async fn first_tick_renders_table() {
    let (coord, presenter) = coordinator(Arc::new(StaticSource(vec![
        raw_build(2, "success"),
        raw_build(1, "failed"),
    ])));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticker = slow_ticker(&tx);

    let driver = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(AppEvent::Key(press(KeyCode::Char('q')))).unwrap();
    };
    let (reason, ()) = tokio::join!(app::run(coord.clone(), &mut rx, &ticker), driver);

    assert_eq!(reason, ExitReason::Quit);
    assert_eq!(presenter.renders(), 1);
    let frame = presenter.frames.lock().unwrap()[0].clone();
    assert_eq!(frame.rows.len(), 2);
    assert_eq!(frame.rows[1].color, ColorClass::Failure);
}

#[tokio::test]
async fn triggers_during_refresh_are_dropped() {
    let (source, entered) = GatedSource::new(vec![raw_build(1, "success")]);
    let (coord, presenter) = coordinator(source.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticker = slow_ticker(&tx);

    let driver = async {
        entered.await.unwrap();
        tx.send(AppEvent::Resize { width: 100, height: 40 }).unwrap();
        tx.send(AppEvent::Key(press(KeyCode::Char('r')))).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        source.release.notify_one();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(presenter.renders(), 1);

        // Back to idle, so a manual refresh goes through.
        tx.send(AppEvent::Key(press(KeyCode::Char('r')))).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(AppEvent::Key(press(KeyCode::Char('q')))).unwrap();
    };
    let (reason, ()) = tokio::join!(app::run(coord.clone(), &mut rx, &ticker), driver);

    assert_eq!(reason, ExitReason::Quit);
    assert_eq!(presenter.renders(), 2);
    assert_eq!(presenter.clear_count(), 0);
}

#[tokio::test]
async fn resize_clears_then_renders() {
    let (coord, presenter) = coordinator(Arc::new(StaticSource(Vec::new())));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticker = slow_ticker(&tx);

    let driver = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(AppEvent::Resize { width: 80, height: 24 }).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(AppEvent::Key(press(KeyCode::Char('q')))).unwrap();
    };
    tokio::join!(app::run(coord.clone(), &mut rx, &ticker), driver);

    assert_eq!(presenter.renders(), 2);
    assert_eq!(presenter.clear_count(), 1);
}

#[tokio::test]
async fn quit_waits_for_inflight_refresh() {
    let (source, entered) = GatedSource::new(vec![raw_build(1, "success")]);
    let (coord, presenter) = coordinator(source.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticker = slow_ticker(&tx);

    let driver = async {
        entered.await.unwrap();
        tx.send(AppEvent::Key(press(KeyCode::Char('q')))).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(presenter.renders(), 0);
        source.release.notify_one();
    };
    let (reason, ()) = tokio::join!(app::run(coord.clone(), &mut rx, &ticker), driver);

    assert_eq!(reason, ExitReason::Quit);
    assert_eq!(presenter.renders(), 1);
    assert_eq!(coord.state(), RefreshState::Stopped);
}

#[tokio::test]
async fn input_failure_ends_loop() {
    let (coord, _presenter) = coordinator(Arc::new(StaticSource(Vec::new())));
    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.send(AppEvent::InputClosed("terminal read error".to_string())).unwrap();
    let ticker = slow_ticker(&tx);

    let reason = app::run(coord, &mut rx, &ticker).await;
    assert_eq!(reason, ExitReason::InputClosed("terminal read error".to_string()));
}
