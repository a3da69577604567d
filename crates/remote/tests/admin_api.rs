// Integration tests for the admin API reader against a mock server.
// Run with: cargo test -p podsync-remote --test admin_api

use httpmock::prelude::*;
use serde_json::json;

use podsync_core::{timestamp, CancelToken, Category, Progress, Record};
use podsync_remote::{AdminCredentials, RemoteClient, RemoteError};

fn credentials(server: &MockServer, token: &str) -> AdminCredentials {
    AdminCredentials {
        access_token: token.into(),
        refresh_token: "rt".into(),
        api_base: server.base_url(),
    }
}

fn episode_item(id: i64) -> serde_json::Value {
    json!({
        "episodeId": id,
        "usageYn": "Y",
        "channelName": "Morning Brief",
        "episodeName": format!("Ep {id}"),
        "createdAt": "2026-02-01 08:30:00",
        "playTime": 1800,
        "likeCnt": 4,
        "listenCnt": 120
    })
}

fn page_body(items: Vec<serde_json::Value>, total: u64) -> serde_json::Value {
    json!({
        "data": {
            "pageInfo": { "totalCount": total },
            "dataList": items
        }
    })
}

#[test]
fn fetch_all_walks_pages_until_total_count() {
    let server = MockServer::start();

    let page1 = server.mock(|when, then| {
        when.method(GET)
            .path("/admin/episode")
            .query_param("page", "1")
            .query_param("size", "1000")
            .header("authorization", "Bearer tok");
        then.status(200)
            .json_body(page_body(vec![episode_item(1), episode_item(2)], 1500));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET)
            .path("/admin/episode")
            .query_param("page", "2")
            .query_param("size", "1000");
        then.status(200)
            .json_body(page_body(vec![episode_item(3)], 1500));
    });

    let mut client = RemoteClient::new(credentials(&server, "tok"));
    let records = client
        .fetch_all(Category::Episode, &mut Progress::ignore(), &CancelToken::new())
        .unwrap();

    page1.assert();
    page2.assert();
    let ids: Vec<_> = records.iter().filter_map(Record::numeric_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn fetch_all_reports_monotonic_progress() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/admin/episode").query_param("page", "1");
        then.status(200).json_body(page_body(vec![episode_item(1)], 1));
    });

    let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = std::sync::Arc::clone(&seen);
    let mut progress = Progress::new(move |p: &str| sink.lock().unwrap().push(p.to_string()));

    let mut client = RemoteClient::new(credentials(&server, "tok"));
    client
        .fetch_all(Category::Episode, &mut progress, &CancelToken::new())
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["100%"]);
}

#[test]
fn upstream_error_degrades_to_empty_fetch() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/admin/channel");
        then.status(500).body("boom");
    });

    let mut client = RemoteClient::new(credentials(&server, "tok"));
    let records = client
        .fetch_all(Category::Channel, &mut Progress::ignore(), &CancelToken::new())
        .unwrap();

    // Zero new records is the degraded-but-safe outcome, not a crash.
    assert!(records.is_empty());
}

#[test]
fn expired_token_is_refreshed_once_and_the_page_retried() {
    let server = MockServer::start();

    let rejected = server.mock(|when, then| {
        when.method(GET)
            .path("/admin/episode")
            .header("authorization", "Bearer stale");
        then.status(401).body("expired");
    });
    let refresh = server.mock(|when, then| {
        when.method(POST)
            .path("/admin/refresh")
            .json_body(json!({ "refreshToken": "rt" }));
        then.status(200)
            .json_body(json!({ "data": { "accessToken": "fresh" } }));
    });
    let retried = server.mock(|when, then| {
        when.method(GET)
            .path("/admin/episode")
            .header("authorization", "Bearer fresh");
        then.status(200).json_body(page_body(vec![episode_item(1)], 1));
    });

    let mut client = RemoteClient::new(credentials(&server, "stale"));
    let (records, total) = client.fetch_page(Category::Episode, 1, 1000).unwrap();

    assert_eq!(total, 1);
    assert_eq!(records.len(), 1);
    rejected.assert(); // one failed attempt
    refresh.assert(); // one refresh
    retried.assert(); // one retry — exactly one extra request
}

#[test]
fn persistent_rejection_propagates_as_fatal() {
    let server = MockServer::start();

    let rejected = server.mock(|when, then| {
        when.method(GET).path("/admin/episode");
        then.status(401).body("still no");
    });
    let refresh = server.mock(|when, then| {
        when.method(POST).path("/admin/refresh");
        then.status(200)
            .json_body(json!({ "data": { "accessToken": "fresh" } }));
    });

    let mut client = RemoteClient::new(credentials(&server, "stale"));
    let err = client
        .fetch_all(Category::Episode, &mut Progress::ignore(), &CancelToken::new())
        .unwrap_err();

    // Fatal auth is not degraded to an empty result.
    assert!(matches!(err, RemoteError::AuthFatal(_)));
    rejected.assert_hits(2);
    refresh.assert();
}

#[test]
fn cancellation_checked_before_each_page() {
    let server = MockServer::start();
    let page = server.mock(|when, then| {
        when.method(GET).path("/admin/episode");
        then.status(200).json_body(page_body(vec![episode_item(1)], 1));
    });

    let cancel = CancelToken::new();
    cancel.cancel();

    let mut client = RemoteClient::new(credentials(&server, "tok"));
    let err = client
        .fetch_all(Category::Episode, &mut Progress::ignore(), &cancel)
        .unwrap_err();

    assert!(matches!(err, RemoteError::Cancelled));
    page.assert_hits(0);
}

#[test]
fn curation_pages_expand_through_the_detail_endpoint() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET)
            .path("/admin/curation")
            .query_param("page", "1")
            .query_param("size", "100")
            .query_param("periodType", "ALL");
        then.status(200).json_body(page_body(
            vec![
                json!({ "curationId": 1, "createdAt": "2026-03-02 09:00:00" }),
                json!({ "curationId": 2, "createdAt": "2026-03-01 10:00:00" }),
            ],
            2,
        ));
    });

    let detail1 = server.mock(|when, then| {
        when.method(GET).path("/admin/curation/1");
        then.status(200).json_body(json!({
            "data": {
                "curationName": "Weekend Picks",
                "curationType": "EDITORIAL",
                "createdAt": "2026-03-02 09:00:00",
                "episodes": [
                    { "episodeId": 10, "episodeName": "A" },
                    { "episodeId": 11, "episodeName": "B" }
                ]
            }
        }));
    });
    let detail2 = server.mock(|when, then| {
        when.method(GET).path("/admin/curation/2");
        then.status(200).json_body(json!({
            "data": {
                "curationName": "Daily Mix",
                "curationType": "AUTO",
                "createdAt": "2026-03-01 10:00:00",
                "episodes": [{ "episodeId": 12, "episodeName": "C" }]
            }
        }));
    });

    let mut client = RemoteClient::new(credentials(&server, "tok"));
    let records = client
        .fetch_all(Category::Curation, &mut Progress::ignore(), &CancelToken::new())
        .unwrap();

    detail1.assert();
    detail2.assert();
    assert_eq!(records.len(), 3);
    match &records[0] {
        Record::Curation(c) => {
            assert_eq!(c.curation_name, "Weekend Picks");
            assert_eq!(c.episode_id, 10);
        }
        other => panic!("expected curation entry, got {other:?}"),
    }
}

#[test]
fn curation_tail_fetch_stops_at_the_boundary_page() {
    let server = MockServer::start();

    // 300 curations upstream (3 pages), but page 1 already opens at the
    // store's latest stamp — paging must stop there.
    let page1 = server.mock(|when, then| {
        when.method(GET)
            .path("/admin/curation")
            .query_param("page", "1");
        then.status(200).json_body(page_body(
            vec![json!({ "curationId": 7, "createdAt": "2026-03-01 10:00:00" })],
            300,
        ));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET)
            .path("/admin/curation")
            .query_param("page", "2");
        then.status(200).json_body(page_body(vec![], 300));
    });
    let detail = server.mock(|when, then| {
        when.method(GET).path("/admin/curation/7");
        then.status(200).json_body(json!({
            "data": {
                "curationName": "Boundary",
                "createdAt": "2026-03-01 10:00:00",
                "episodes": [{ "episodeId": 1 }]
            }
        }));
    });

    let latest = timestamp::decode("2026-03-01 10:00:00");
    let mut client = RemoteClient::new(credentials(&server, "tok"));
    let records = client
        .fetch_since(
            Category::Curation,
            latest,
            &mut Progress::ignore(),
            &CancelToken::new(),
        )
        .unwrap();

    page1.assert();
    page2.assert_hits(0); // early stop — the optimization, not the filter
    detail.assert();
    assert_eq!(records.len(), 1);
}
