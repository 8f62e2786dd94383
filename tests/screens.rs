mod support;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde_json::json;

use frontend::api::models::PlaceSearchQuery;
use frontend::error::{ApiError, UNAVAILABLE_MESSAGE};
use frontend::screen::{AddFriendError, FriendRequestOutcome, Route, ScreenState};
use support::{StubBackend, activity_place, fail, friend, ok, page, search_place};

fn activity_router(place_count: i64) -> Router {
    Router::new().route(
        "/profile/me/activity",
        get(move || async move {
            let frequent: Vec<_> = (1..=place_count / 2).map(activity_place).collect();
            let dormant: Vec<_> = (place_count / 2 + 1..=place_count).map(activity_place).collect();
            ok(json!({ "frequent": frequent, "dormant": dormant }))
        }),
    )
}

#[tokio::test]
async fn place_list_drops_the_one_failed_detail() {
    let router = activity_router(5).route(
        "/places/{place_id}",
        get(|Path(place_id): Path<i64>| async move {
            if place_id == 3 {
                (StatusCode::INTERNAL_SERVER_ERROR, fail(500, "boom"))
            } else {
                (StatusCode::OK, ok(support::place_detail(place_id, 37.28, 127.01)))
            }
        }),
    );
    let backend = StubBackend::start(router).await;
    let (context, _store) = backend.context().await;
    let screen = context.place_list_screen();

    let places = screen.load().await.unwrap().unwrap();

    let ids: Vec<Option<i64>> = places.iter().map(|p| p.place.place_id).collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(4), Some(5)]);
    assert!(!screen.state().is_loading());
    for seen in backend.log.all().iter().filter(|s| s.path.starts_with("/places/")) {
        assert_eq!(seen.query.as_deref(), Some("includeInsight=true"));
    }
}

#[tokio::test]
async fn place_list_caps_at_thirty_and_backfills_ids() {
    let router = activity_router(40).route(
        "/places/{place_id}",
        get(|| async {
            // server omits the id
            let mut detail = support::place_detail(0, 37.28, 127.01);
            detail.as_object_mut().unwrap().remove("placeId");
            ok(detail)
        }),
    );
    let backend = StubBackend::start(router).await;
    let (context, _store) = backend.context().await;
    let screen = context.place_list_screen();

    let places = screen.load().await.unwrap().unwrap();

    assert_eq!(places.len(), 30);
    assert_eq!(places[0].place.place_id, Some(1));
    assert_eq!(places[29].place.place_id, Some(30));

    let route = screen.select(&places[4]);
    match route {
        Route::Map { focus: Some(focus) } => assert_eq!(focus.place_id, 5),
        other => panic!("unexpected route {other:?}"),
    }
}

#[tokio::test]
async fn place_list_surfaces_activity_failure() {
    let router = Router::new().route(
        "/profile/me/activity",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, fail(503, "Maintenance")) }),
    );
    let backend = StubBackend::start(router).await;
    let (context, _store) = backend.context().await;
    let screen = context.place_list_screen();

    screen.load().await;

    assert_eq!(
        screen.state(),
        ScreenState::Failed(ApiError::new(503, "Maintenance"))
    );
}

#[tokio::test]
async fn accepting_a_request_removes_it_locally() {
    let router = Router::new()
        .route(
            "/friends/requests",
            get(|| async { ok(json!([friend(2, "PENDING"), friend(3, "PENDING")])) }),
        )
        .route(
            "/friends/respond",
            post(|Query(params): Query<HashMap<String, String>>| async move {
                match params.get("friendUserId").map(String::as_str) {
                    Some("3") => (StatusCode::CONFLICT, fail(409, "")),
                    Some("4") => (StatusCode::SERVICE_UNAVAILABLE, fail(503, "upstream down")),
                    _ => (StatusCode::OK, ok(json!({ "status": "ACCEPTED" }))),
                }
            }),
        );
    let backend = StubBackend::start(router).await;
    let (context, _store) = backend.context().await;
    let screen = context.friend_requests_screen();

    screen.focus().await;
    screen.accept(2).await.unwrap();

    let remaining: Vec<i64> = screen.requests().iter().map(|r| r.user_id).collect();
    assert_eq!(remaining, vec![3]);

    let err = screen.reject(3).await.unwrap_err();
    assert_eq!(err.code, 409);
    assert_eq!(err.message, "Failed to reject the friend request");
    assert_eq!(screen.requests().len(), 1);

    let err = screen.accept(4).await.unwrap_err();
    assert_eq!(err.code, 503);
    assert_eq!(err.message, UNAVAILABLE_MESSAGE);
    // no refetch after responding
    assert_eq!(backend.log.to_path("/friends/requests").len(), 1);
}

fn lookup_router() -> Router {
    Router::new()
        .route(
            "/users/lookup",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let user_id: i64 = params["userId"].parse().unwrap();
                match user_id {
                    1 => (StatusCode::OK, ok(json!({ "userId": 1, "nickname": "me", "me": true }))),
                    2 => (
                        StatusCode::OK,
                        ok(json!({ "userId": 2, "nickname": "pal", "relation": "FRIEND" })),
                    ),
                    3..=6 => (
                        StatusCode::OK,
                        ok(json!({ "userId": user_id, "nickname": "new", "relation": "NONE" })),
                    ),
                    _ => (StatusCode::NOT_FOUND, fail(404, "User not found")),
                }
            }),
        )
        .route(
            "/friends/add",
            post(|axum::Json(body): axum::Json<serde_json::Value>| async move {
                match body["friendUserId"].as_i64() {
                    Some(3) => (StatusCode::OK, ok(json!({ "status": "PENDING" }))),
                    Some(4) => (StatusCode::CONFLICT, fail(409, "Request already sent")),
                    Some(6) => (
                        StatusCode::OK,
                        axum::Json(json!({
                            "code": 409,
                            "message": "already friends",
                            "data": { "detail": "duplicate" }
                        })),
                    ),
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, fail(500, "boom")),
                }
            }),
        )
}

#[tokio::test]
async fn add_friend_lookup_rules() {
    let backend = StubBackend::start(lookup_router()).await;
    let (context, _store) = backend.context().await;
    let screen = context.add_friend_screen();

    assert_eq!(screen.lookup(" ").await, Some(Err(AddFriendError::EmptyInput)));
    assert_eq!(screen.lookup("abc").await, Some(Err(AddFriendError::InvalidId)));
    assert_eq!(screen.lookup("99").await, Some(Err(AddFriendError::NotFound)));
    assert_eq!(screen.lookup("1").await, Some(Err(AddFriendError::SelfLookup)));
    assert_eq!(screen.lookup("2").await, Some(Err(AddFriendError::AlreadyFriends)));
    assert!(screen.candidate().is_none());
    assert_eq!(screen.send_request().await, None);

    // only the numeric ids reached the backend
    assert_eq!(backend.log.to_path("/users/lookup").len(), 3);
}

#[tokio::test]
async fn add_friend_maps_send_outcomes() {
    let backend = StubBackend::start(lookup_router()).await;
    let (context, _store) = backend.context().await;
    let screen = context.add_friend_screen();

    screen.lookup("3").await.unwrap().unwrap();
    assert_eq!(screen.send_request().await, Some(FriendRequestOutcome::Sent));

    screen.lookup("4").await.unwrap().unwrap();
    assert_eq!(
        screen.send_request().await,
        Some(FriendRequestOutcome::Duplicate("Request already sent".to_string()))
    );

    screen.lookup("5").await.unwrap().unwrap();
    assert!(matches!(
        screen.send_request().await,
        Some(FriendRequestOutcome::Failed(err)) if err.code == 500
    ));

    // conflict reported in the body of an HTTP 200
    screen.lookup("6").await.unwrap().unwrap();
    assert_eq!(
        screen.send_request().await,
        Some(FriendRequestOutcome::Duplicate("already friends".to_string()))
    );
    assert!(!screen.is_sending());
}

#[tokio::test]
async fn appointment_keeps_accepted_friends() {
    let router = Router::new().route(
        "/friends",
        get(|| async {
            ok(page(vec![
                friend(1, "ACCEPTED"),
                friend(2, "PENDING"),
                friend(3, "ACCEPTED"),
                friend(4, "REJECTED"),
            ]))
        }),
    );
    let backend = StubBackend::start(router).await;
    let (context, _store) = backend.context().await;
    let mut screen = context.appointment_screen();

    screen.load().await;
    let ids: Vec<i64> = screen.friends().iter().map(|f| f.user_id).collect();
    assert_eq!(ids, vec![1, 3]);

    screen.toggle(3);
    screen.toggle(1);
    assert_eq!(screen.complete(), Route::Search { friend_ids: vec![1, 3] });

    let seen = backend.log.to_path("/friends");
    assert_eq!(seen[0].query.as_deref(), Some("page=0&size=50"));
}

#[tokio::test]
async fn friends_sheet_debounces_typing() {
    let router = Router::new().route(
        "/friends",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            let search = params.get("search").cloned().unwrap_or_default();
            ok(page(vec![json!({ "userId": 9, "nickname": search, "status": "ACCEPTED" })]))
        }),
    );
    let backend = StubBackend::start(router).await;
    let (context, _store) = backend.context().await;
    let sheet = context.friends_sheet();

    let (first, second) = tokio::join!(sheet.search_changed("k"), sheet.search_changed("kim"));

    assert_eq!(first, None);
    let friends = second.unwrap().unwrap();
    assert_eq!(friends[0].nickname, "kim");

    let seen = backend.log.to_path("/friends");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].query.as_deref(), Some("search=kim&page=0&size=50"));
}

#[tokio::test]
async fn friends_sheet_fetches_once_on_open() {
    let router = Router::new().route(
        "/friends",
        get(|| async { ok(page(vec![friend(1, "ACCEPTED")])) }),
    );
    let backend = StubBackend::start(router).await;
    let (context, _store) = backend.context().await;
    let mut sheet = context.friends_sheet();

    sheet.open().await;
    sheet.open().await;
    assert_eq!(backend.log.to_path("/friends").len(), 1);

    assert!(sheet.toggle_favourite(1));
    assert!(sheet.toggle_selected(1));
    assert!(!sheet.toggle_selected(1));
    assert!(sheet.favourites().contains(1));
    assert!(sheet.selected().is_empty());
}

#[tokio::test]
async fn friends_sheet_does_not_refetch_empty_list() {
    let router = Router::new().route("/friends", get(|| async { ok(page(Vec::new())) }));
    let backend = StubBackend::start(router).await;
    let (context, _store) = backend.context().await;
    let sheet = context.friends_sheet();

    // the second open sees the first one in flight
    tokio::join!(sheet.open(), sheet.open());
    sheet.open().await;

    assert!(sheet.friends().is_empty());
    assert!(matches!(sheet.state(), ScreenState::Ready(_)));
    assert_eq!(backend.log.to_path("/friends").len(), 1);
}

#[tokio::test]
async fn my_page_refresh_keeps_list_on_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let router = Router::new().route(
        "/profile/me/activity",
        get(move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    (
                        StatusCode::OK,
                        ok(json!({ "frequent": [activity_place(1)], "dormant": [activity_place(2)] })),
                    )
                } else {
                    (StatusCode::SERVICE_UNAVAILABLE, fail(503, "Maintenance"))
                }
            }
        }),
    );
    let backend = StubBackend::start(router).await;
    let (context, _store) = backend.context().await;
    let screen = context.my_page_screen();

    screen.load().await;
    let outcome = screen.refresh().await.unwrap();

    assert_eq!(outcome.unwrap_err().code, 503);
    let ids: Vec<i64> = screen.places().iter().map(|p| p.place_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(!screen.is_refreshing());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let seen = backend.log.to_path("/profile/me/activity");
    assert_eq!(seen[0].query.as_deref(), Some("lookbackDays=90"));
}

#[tokio::test]
async fn search_results_feed_recent_places() {
    let router = Router::new().route(
        "/places/search",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            let results = match params.get("q").map(String::as_str) {
                Some("first") => vec![search_place(1), search_place(2)],
                _ => vec![search_place(2), search_place(3)],
            };
            ok(json!(results))
        }),
    );
    let backend = StubBackend::start(router).await;
    let (context, _store) = backend.context().await;
    let search = context.search_screen();

    for text in ["first", "second"] {
        let route = search.submit_text(text).await.unwrap().unwrap();
        let results = context.search_result_screen(route).unwrap();
        assert!(!results.persist().await.is_empty());
    }

    let recent = context.my_page_screen().recent_places().await;
    let ids: Vec<i64> = recent.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn blank_search_submit_does_nothing() {
    let backend = StubBackend::start(Router::new()).await;
    let (context, _store) = backend.context().await;
    let search = context.search_screen();

    assert!(search.submit(PlaceSearchQuery::default()).await.is_none());
    assert!(search.submit_text("  ").await.is_none());
    assert_eq!(search.state(), ScreenState::Idle);
    assert!(backend.log.all().is_empty());
}

#[tokio::test]
async fn search_with_mood_only_is_sent() {
    let router = Router::new().route("/places/search", get(|| async { ok(json!([])) }));
    let backend = StubBackend::start(router).await;
    let (context, _store) = backend.context().await;
    let search = context.search_screen();

    let query = PlaceSearchQuery {
        mood: Some(" cozy ".to_string()),
        ..PlaceSearchQuery::default()
    };
    let route = search.submit(query).await.unwrap().unwrap();

    match route {
        Route::SearchResult { places, query } => {
            assert!(places.is_empty());
            assert_eq!(query.mood.as_deref(), Some("cozy"));
        }
        other => panic!("unexpected route {other:?}"),
    }
    let seen = backend.log.to_path("/places/search");
    assert_eq!(seen[0].query.as_deref(), Some("mood=cozy"));
}
