//! API Integration Tests
//!
//! Most tests run the full router on the in-memory store and need nothing
//! external. `test_postgres_*` additionally need `DATABASE_URL`.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, TimeZone, Utc};
use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, postgres_url, StubRenderer, TestServer,
    TEST_ADMIN, TEST_CHANNEL,
};
use reqwest::StatusCode;
use scream_core::{ChannelRef, PostId, ReactionCounts, ReactionRepository};
use scream_service::Published;

async fn create(server: &TestServer, request: &CreateScreamRequest) -> CreatedScream {
    let response = server.post("/api/v1/screams", request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn toggle(server: &TestServer, post_id: i64, user_id: i64, kind: &str) -> Counts {
    let response = server
        .post(
            &format!("/api/v1/screams/{post_id}/reactions"),
            &ToggleReactionRequest::new(user_id, kind),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn view(server: &TestServer, post_id: i64) -> PostView {
    let response = server.get(&format!("/api/v1/screams/{post_id}")).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn post_count(server: &TestServer, user_id: i64) -> i64 {
    let response = server
        .get(&format!("/api/v1/users/{user_id}/stats"))
        .await
        .unwrap();
    let stats: UserStats = assert_json(response, StatusCode::OK).await.unwrap();
    stats.post_count
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let health: HealthStatus = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let health: HealthStatus = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(health.status, "ready");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Scream Tests
// ============================================================================

#[tokio::test]
async fn test_create_scream_at_known_message() {
    let server = TestServer::start().await.unwrap();
    let user = unique_user();
    let request = CreateScreamRequest::at_message(user, "  the lab deadline moved up  ");

    let created = create(&server, &request).await;
    assert_eq!(created.text, "the lab deadline moved up");
    assert_eq!(created.chat_id, TEST_CHANNEL);
    assert_eq!(Some(created.message_id), request.message_id);

    let post = view(&server, created.post_id).await;
    assert_eq!(post.post_id, created.post_id);
    assert_eq!(post.reactions, Counts::new(0, 0, 0));
    assert_eq!(post.votes, 0);
    assert!(!post.is_deleted);

    assert_eq!(post_count(&server, user).await, 1);
    // Nothing published: the caller already owns the message
    assert!(server.published().await.is_empty());
}

#[tokio::test]
async fn test_create_scream_publishes_to_channel() {
    let server = TestServer::start().await.unwrap();
    let created = create(&server, &CreateScreamRequest::publish(unique_user(), "coffee machine broke")).await;

    assert_eq!(created.chat_id, TEST_CHANNEL);
    let channel_ref = ChannelRef::new(created.chat_id, created.message_id);
    assert_eq!(
        server.published().await,
        vec![
            Published::Text {
                channel_ref,
                text: "coffee machine broke".to_string(),
            },
            // Buttons bound to the stored post
            Published::Reactions {
                channel_ref,
                post_id: PostId::new(created.post_id),
                counts: ReactionCounts::default(),
            },
        ]
    );

    toggle(&server, created.post_id, unique_user(), "💀").await;
    assert_eq!(
        server.published().await.last(),
        Some(&Published::Reactions {
            channel_ref,
            post_id: PostId::new(created.post_id),
            counts: ReactionCounts::new(1, 0, 0),
        })
    );
}

#[tokio::test]
async fn test_create_scream_validation() {
    let server = TestServer::start().await.unwrap();
    let user = unique_user();

    let response = server
        .post("/api/v1/screams", &CreateScreamRequest::publish(user, ""))
        .await
        .unwrap();
    assert_eq!(assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(), "VALIDATION_ERROR");

    // Whitespace passes the length check but not the domain rule
    let response = server
        .post("/api/v1/screams", &CreateScreamRequest::publish(user, "   "))
        .await
        .unwrap();
    assert_eq!(assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(), "EMPTY_TEXT");

    // Over the configured MAX_POST_LENGTH of 280
    let response = server
        .post("/api/v1/screams", &CreateScreamRequest::publish(user, &"a".repeat(281)))
        .await
        .unwrap();
    assert_eq!(assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(), "TEXT_TOO_LONG");

    let half_ref = CreateScreamRequest {
        user_id: user,
        text: "hello".to_string(),
        chat_id: Some(TEST_CHANNEL),
        message_id: None,
    };
    let response = server.post("/api/v1/screams", &half_ref).await.unwrap();
    assert_eq!(assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(), "VALIDATION_ERROR");

    let response = server
        .post("/api/v1/screams", &serde_json::json!({"text": "no user"}))
        .await
        .unwrap();
    assert_eq!(assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(), "INVALID_BODY");

    assert_eq!(post_count(&server, user).await, 0);
    assert!(server.published().await.is_empty());
}

#[tokio::test]
async fn test_duplicate_channel_message_rejected() {
    let server = TestServer::start().await.unwrap();
    let first = CreateScreamRequest::at_message(unique_user(), "first");
    create(&server, &first).await;

    let intruder = unique_user();
    let again = CreateScreamRequest {
        user_id: intruder,
        text: "second".to_string(),
        chat_id: first.chat_id,
        message_id: first.message_id,
    };
    let response = server.post("/api/v1/screams", &again).await.unwrap();
    assert_eq!(
        assert_error(response, StatusCode::CONFLICT).await.unwrap(),
        "DUPLICATE_CHANNEL_REF"
    );
    assert_eq!(post_count(&server, intruder).await, 0);
}

#[tokio::test]
async fn test_get_unknown_scream() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/v1/screams/424242").await.unwrap();
    assert_eq!(assert_error(response, StatusCode::NOT_FOUND).await.unwrap(), "UNKNOWN_POST");

    let response = server.get("/api/v1/screams/not-a-number").await.unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "INVALID_PATH_PARAMETER"
    );
}

// ============================================================================
// Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_toggle_flow() {
    let server = TestServer::start().await.unwrap();
    let created = create(&server, &CreateScreamRequest::at_message(unique_user(), "react to me")).await;
    let voter = unique_user();
    let other = unique_user();

    assert_eq!(toggle(&server, created.post_id, voter, "fire").await, Counts::new(0, 1, 0));
    assert_eq!(toggle(&server, created.post_id, other, "🔥").await, Counts::new(0, 2, 0));
    // Switch keeps the total
    assert_eq!(toggle(&server, created.post_id, voter, "clown").await, Counts::new(0, 1, 1));
    // Same kind again removes
    assert_eq!(toggle(&server, created.post_id, voter, "CLOWN").await, Counts::new(0, 1, 0));
    assert_eq!(toggle(&server, created.post_id, voter, "💀").await, Counts::new(1, 1, 0));

    let post = view(&server, created.post_id).await;
    assert_eq!(post.reactions, Counts::new(1, 1, 0));
    assert_eq!(post.votes, 2);
}

#[tokio::test]
async fn test_reaction_errors() {
    let server = TestServer::start().await.unwrap();
    let created = create(&server, &CreateScreamRequest::at_message(unique_user(), "hm")).await;

    let response = server
        .post(
            &format!("/api/v1/screams/{}/reactions", created.post_id),
            &ToggleReactionRequest::new(unique_user(), "thumbs_up"),
        )
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "INVALID_REACTION_KIND"
    );
    assert_eq!(view(&server, created.post_id).await.reactions, Counts::new(0, 0, 0));

    let response = server
        .post(
            "/api/v1/screams/999999/reactions",
            &ToggleReactionRequest::new(unique_user(), "fire"),
        )
        .await
        .unwrap();
    assert_eq!(assert_error(response, StatusCode::NOT_FOUND).await.unwrap(), "UNKNOWN_POST");
}

#[tokio::test]
async fn test_concurrent_reactions_stay_consistent() {
    let server = TestServer::start().await.unwrap();
    let created = create(&server, &CreateScreamRequest::at_message(unique_user(), "race")).await;
    let voters: Vec<i64> = (0..12).map(|_| unique_user()).collect();

    // Each voter fires twice concurrently with a different kind; the final
    // state is one active reaction per voter or none, never two.
    let requests = voters.iter().flat_map(|&voter| {
        let server = &server;
        let post_id = created.post_id;
        [
            futures::future::Either::Left(async move { toggle(server, post_id, voter, "fire").await }),
            futures::future::Either::Right(async move { toggle(server, post_id, voter, "skull").await }),
        ]
    });
    futures::future::join_all(requests).await;

    let post = view(&server, created.post_id).await;
    assert!(post.votes <= voters.len() as i64);
    assert!(post.reactions.skull >= 0 && post.reactions.fire >= 0);
    assert_eq!(post.reactions.clown, 0);

    // Cached counters agree with the ledger
    let store = server.store.clone().unwrap();
    let counted = store.count_from_ledger(PostId::new(created.post_id)).await.unwrap();
    assert_eq!(
        Counts::new(counted.skull, counted.fire, counted.clown),
        post.reactions
    );
}

// ============================================================================
// Moderation Tests
// ============================================================================

#[tokio::test]
async fn test_moderation_delete() {
    let server = TestServer::start().await.unwrap();
    let author = unique_user();
    let created = create(&server, &CreateScreamRequest::at_message(author, "delete me")).await;
    create(&server, &CreateScreamRequest::at_message(author, "keep me")).await;
    assert_eq!(post_count(&server, author).await, 2);

    // Non-admins are turned away
    let response = server
        .delete(&created.message_path(), &DeletePostRequest { admin_id: author })
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::FORBIDDEN).await.unwrap(),
        "MISSING_PERMISSIONS"
    );
    assert!(!view(&server, created.post_id).await.is_deleted);

    let response = server
        .delete(&created.message_path(), &DeletePostRequest { admin_id: TEST_ADMIN })
        .await
        .unwrap();
    let outcome: DeleteOutcome = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome.outcome, "deleted");
    assert_eq!(outcome.post_id, Some(created.post_id));
    assert!(view(&server, created.post_id).await.is_deleted);
    assert_eq!(post_count(&server, author).await, 1);

    // Idempotent
    let response = server
        .delete(&created.message_path(), &DeletePostRequest { admin_id: TEST_ADMIN })
        .await
        .unwrap();
    let outcome: DeleteOutcome = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome.outcome, "already_deleted");
    assert_eq!(post_count(&server, author).await, 1);

    let response = server
        .delete(
            &format!("/api/v1/channels/{TEST_CHANNEL}/messages/-5"),
            &DeletePostRequest { admin_id: TEST_ADMIN },
        )
        .await
        .unwrap();
    let outcome: DeleteOutcome = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome.outcome, "not_found");
    assert_eq!(outcome.post_id, None);

    // The channel message went away exactly once
    assert_eq!(
        server.published().await,
        vec![Published::Deleted(ChannelRef::new(created.chat_id, created.message_id))]
    );
}

// ============================================================================
// Aggregate Tests
// ============================================================================

#[tokio::test]
async fn test_daily_top_tie_break_and_deleted_posts() {
    let server = TestServer::start().await.unwrap();
    let store = server.store.clone().unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
    let noon = Utc.with_ymd_and_hms(2024, 3, 12, 12, 0, 0).unwrap();

    let first = create(&server, &CreateScreamRequest::at_message(unique_user(), "first")).await;
    let second = create(&server, &CreateScreamRequest::at_message(unique_user(), "second")).await;
    let hidden = create(&server, &CreateScreamRequest::at_message(unique_user(), "hidden")).await;
    for post in [&first, &second, &hidden] {
        store.backdate(PostId::new(post.post_id), noon).await.unwrap();
    }

    for _ in 0..2 {
        toggle(&server, first.post_id, unique_user(), "fire").await;
        toggle(&server, second.post_id, unique_user(), "skull").await;
    }
    for _ in 0..5 {
        toggle(&server, hidden.post_id, unique_user(), "clown").await;
    }
    let response = server
        .delete(&hidden.message_path(), &DeletePostRequest { admin_id: TEST_ADMIN })
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/api/v1/digest/daily?date=2024-03-12").await.unwrap();
    let daily: DailyTop = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(daily.date, day.to_string());
    let top = daily.top.expect("top post");
    assert_eq!(top.post_id, first.post_id);
    assert_eq!(top.text, "first");
    assert_eq!(top.votes, 2);

    let response = server.get("/api/v1/digest/daily?date=2024-03-13").await.unwrap();
    let daily: DailyTop = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(daily.top.is_none());
}

#[tokio::test]
async fn test_weekly_counts() {
    let server = TestServer::start().await.unwrap();
    let store = server.store.clone().unwrap();
    let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

    for (offset, hour) in [(0u64, 0u32), (2, 9), (2, 23), (6, 23)] {
        let created = create(&server, &CreateScreamRequest::at_message(unique_user(), "w")).await;
        let at = (monday + Days::new(offset)).and_hms_opt(hour, 59, 59).unwrap().and_utc();
        store.backdate(PostId::new(created.post_id), at).await.unwrap();
    }
    // Next Monday belongs to the following week
    let created = create(&server, &CreateScreamRequest::at_message(unique_user(), "w")).await;
    store
        .backdate(
            PostId::new(created.post_id),
            (monday + Days::new(7)).and_hms_opt(0, 0, 0).unwrap().and_utc(),
        )
        .await
        .unwrap();

    let response = server.get("/api/v1/digest/weekly?start=2024-03-11").await.unwrap();
    let weekly: Weekly = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(weekly.start, "2024-03-11");
    assert_eq!(weekly.end, "2024-03-17");
    assert_eq!(weekly.counts, vec![1, 0, 2, 0, 0, 0, 1]);
    assert_eq!(weekly.total, 4);
    assert_eq!(weekly.labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);

    let response = server.get("/api/v1/digest/weekly?start=last-week").await.unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_REQUEST).await.unwrap(),
        "INVALID_QUERY_PARAMETER"
    );
}

#[tokio::test]
async fn test_user_stats_current_week() {
    let server = TestServer::start().await.unwrap();
    let user = unique_user();
    create(&server, &CreateScreamRequest::at_message(user, "one")).await;
    create(&server, &CreateScreamRequest::at_message(user, "two")).await;

    let response = server.get(&format!("/api/v1/users/{user}/stats")).await.unwrap();
    let stats: UserStats = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.post_count, 2);
    assert_eq!(stats.week.labels.first().map(String::as_str), Some("Mon"));

    let today = Utc::now().date_naive();
    let offset = today.weekday().num_days_from_monday() as usize;
    assert_eq!(stats.week.counts[offset], 2);
    assert_eq!(stats.week.total, 2);
    // No chart renderer configured
    assert_eq!(stats.chart_url, None);

    assert_eq!(post_count(&server, unique_user()).await, 0);
}

#[tokio::test]
async fn test_user_stats_chart() {
    let server = TestServer::start_with_renderer(Arc::new(StubRenderer)).await.unwrap();
    let user = unique_user();
    create(&server, &CreateScreamRequest::at_message(user, "chart me")).await;

    let response = server.get(&format!("/api/v1/users/{user}/stats")).await.unwrap();
    let stats: UserStats = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.post_count, 1);
    assert_eq!(
        stats.chart_url.as_deref(),
        Some("https://quickchart.io/chart/render/stub")
    );
}

// ============================================================================
// Meme Tests
// ============================================================================

#[tokio::test]
async fn test_post_meme() {
    let server = TestServer::start_with_renderer(Arc::new(StubRenderer)).await.unwrap();

    let response = server
        .post(
            "/api/v1/digest/meme",
            &PostMemeRequest {
                admin_id: unique_user(),
                text: "nope".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::FORBIDDEN).await.unwrap(),
        "MISSING_PERMISSIONS"
    );

    let response = server
        .post(
            "/api/v1/digest/meme",
            &PostMemeRequest {
                admin_id: TEST_ADMIN,
                text: "finals week".to_string(),
            },
        )
        .await
        .unwrap();
    let published: PublishedMessage = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(published.chat_id, TEST_CHANNEL);

    assert_eq!(
        server.published().await,
        vec![Published::Photo {
            channel_ref: ChannelRef::new(published.chat_id, published.message_id),
            url: "https://i.imgflip.com/stub.jpg".to_string(),
            caption: "finals week".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_post_meme_without_renderer() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .post(
            "/api/v1/digest/meme",
            &PostMemeRequest {
                admin_id: TEST_ADMIN,
                text: "finals week".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        assert_error(response, StatusCode::BAD_GATEWAY).await.unwrap(),
        "EXTERNAL_SERVICE_ERROR"
    );
    assert!(server.published().await.is_empty());
}

// ============================================================================
// PostgreSQL backend
// ============================================================================

#[tokio::test]
async fn test_postgres_scream_lifecycle() {
    let Some(url) = postgres_url() else {
        return;
    };

    let server = TestServer::start_postgres(&url).await.expect("Failed to start server");
    let response = server.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let author = unique_user() + Utc::now().timestamp_micros();
    let mut request = CreateScreamRequest::at_message(author, "postgres scream");
    request.message_id = Some(Utc::now().timestamp_micros());
    let created = create(&server, &request).await;
    assert_eq!(post_count(&server, author).await, 1);

    let voter = unique_user() + Utc::now().timestamp_micros();
    assert_eq!(toggle(&server, created.post_id, voter, "fire").await, Counts::new(0, 1, 0));
    assert_eq!(toggle(&server, created.post_id, voter, "clown").await, Counts::new(0, 0, 1));

    let response = server
        .delete(&created.message_path(), &DeletePostRequest { admin_id: TEST_ADMIN })
        .await
        .unwrap();
    let outcome: DeleteOutcome = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(outcome.outcome, "deleted");
    assert_eq!(post_count(&server, author).await, 0);
}
