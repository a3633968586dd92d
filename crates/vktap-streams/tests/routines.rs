//! Routine behaviour against a scripted gateway.

mod common;

use common::{config, wall, FakeGateway};
use serde_json::json;
use vktap_api::{VkError, AUTH_FAILED_CODE};
use vktap_streams::routines::{admin_groups, comments, group_stat, groups, posts, story};
use vktap_streams::{Dimension, Source, StreamError, StreamKind};

#[tokio::test]
async fn failed_reach_zero_fills_only_that_post() {
    let gateway = FakeGateway::new()
        .reply("wall.get", wall(&[10, 11]))
        .reply(
            "stats.getPostReach:10",
            json!([{ "post_id": 10, "reach_total": 500, "reach_subscribers": 300, "hide": 1 }]),
        )
        .fail("stats.getPostReach:11", 15);

    let rows = posts::extract(&gateway, &config("")).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].post_id, 10);
    assert_eq!(rows[0].group_id, -42);
    assert_eq!(rows[0].reach.reach_total, 500);
    assert_eq!(rows[0].reach.hide, 1);
    assert_eq!(rows[1].post_id, 11);
    assert_eq!(rows[1].reach, posts::ReachFields::default());
    assert_eq!(rows[1].text, "post 11");
    assert_eq!(rows[1].group_id, -42);
    assert_eq!(rows[1].likes, 2);
}

#[tokio::test]
async fn empty_reach_list_zero_fills() {
    let gateway = FakeGateway::new()
        .reply("wall.get", wall(&[10]))
        .reply("stats.getPostReach:10", json!([]));

    let rows = posts::extract(&gateway, &config("")).await.unwrap();
    assert_eq!(rows[0].reach.reach_total, 0);
}

#[tokio::test]
async fn auth_failure_on_reach_aborts_the_stream() {
    let gateway = FakeGateway::new()
        .reply("wall.get", wall(&[10, 11]))
        .fail("stats.getPostReach:10", AUTH_FAILED_CODE);

    let err = posts::extract(&gateway, &config("")).await.unwrap_err();

    assert!(matches!(
        err,
        StreamError::Gateway(VkError::Api { code: 5, .. })
    ));
    // Nothing after the fatal call.
    assert_eq!(gateway.calls(), vec!["wall.get", "stats.getPostReach:10"]);
}

#[tokio::test]
async fn post_listing_failure_is_fatal() {
    let gateway = FakeGateway::new().fail("wall.get", 15);
    assert!(posts::extract(&gateway, &config("")).await.is_err());
}

#[tokio::test]
async fn failed_comment_listing_skips_the_post() {
    let gateway = FakeGateway::new()
        .reply("wall.get", wall(&[10, 11, 12]))
        .reply(
            "wall.getComments:10",
            json!({ "count": 1, "items": [{ "id": 1, "from_id": 5, "date": 100, "text": "a", "likes": { "count": 3 } }] }),
        )
        .fail("wall.getComments:11", 212)
        .reply(
            "wall.getComments:12",
            json!({ "count": 1, "items": [{ "id": 2, "from_id": 6, "date": 101, "text": "b", "reply_to_user": 5, "reply_to_comment": 1 }] }),
        );

    let rows = comments::extract(&gateway, &config("")).await.unwrap();

    let keys: Vec<(i64, i64)> = rows.iter().map(|r| (r.post_id, r.comment_id)).collect();
    assert_eq!(keys, vec![(10, 1), (12, 2)]);
    assert_eq!(rows[0].group_id, -42);
    assert_eq!(rows[0].likes, 3);
    assert_eq!(rows[0].reply_to_user, 0);
    assert_eq!(rows[0].reply_to_comment, 0);
    assert_eq!(rows[1].likes, 0);
    assert_eq!(rows[1].reply_to_comment, 1);
}

#[tokio::test]
async fn group_stat_stamps_id_and_sends_query() {
    let gateway = FakeGateway::new().reply(
        "stats.get",
        json!([{
            "period_from": 1_700_000_000,
            "period_to": 1_700_086_400,
            "reach": { "reach": 10, "reach_subscribers": 5, "mobile_reach": 7, "age": [{ "value": "18-21", "count": 10 }] },
            "visitors": { "views": 30, "visitors": 12, "mobile_views": 20, "age": [{ "value": "18-21", "count": 4 }] }
        }]),
    );

    let rows = group_stat::extract(&gateway, &config(""), 1_699_000_000)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.id == Some(42)));
    assert_eq!((rows[0].source, rows[0].dimension), (Source::Reach, Dimension::Age));
    assert_eq!(rows[1].source, Source::Visitors);

    let query = gateway.last_stats_query().unwrap();
    assert_eq!(query.group_id, 42);
    assert_eq!(query.app_id, Some(7));
    assert_eq!(query.timestamp_from, 1_699_000_000);
    assert_eq!(query.interval, "day");
    assert!(query.extended);
}

#[tokio::test]
async fn group_stat_structural_error_is_fatal() {
    let gateway = FakeGateway::new().reply(
        "stats.get",
        json!([{ "period_from": 1, "period_to": 2, "visitors": { "views": 1, "visitors": 1, "mobile_views": 1 } }]),
    );

    let err = group_stat::extract(&gateway, &config(""), 0).await.unwrap_err();
    assert!(matches!(err, StreamError::Structural { .. }));
}

#[tokio::test]
async fn groups_returns_the_community() {
    let gateway = FakeGateway::new().reply(
        "groups.getById:42",
        json!({ "groups": [{ "id": 42, "name": "Club", "members_count": 10 }], "profiles": [] }),
    );

    let rows = groups::extract(&gateway, &config("")).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].members_count, Some(10));
}

#[tokio::test]
async fn groups_accepts_the_legacy_array_shape() {
    let gateway = FakeGateway::new().reply(
        "groups.getById:42",
        json!([{ "id": 42, "screen_name": "club42", "is_closed": 0 }]),
    );

    let rows = groups::extract(&gateway, &config("")).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].screen_name.as_deref(), Some("club42"));
    assert_eq!(rows[0].is_closed, Some(0));
}

#[tokio::test]
async fn groups_failure_is_fatal() {
    let gateway = FakeGateway::new().fail("groups.getById:42", 15);
    let err = groups::extract(&gateway, &config("")).await.unwrap_err();
    assert!(matches!(err, StreamError::Gateway(VkError::Api { code: 15, .. })));
}

#[tokio::test]
async fn story_defaults_and_skip_on_failed_stats() {
    let gateway = FakeGateway::new()
        .reply(
            "stories.get",
            json!({
                "count": 2,
                "items": [[
                    {
                        "id": 1,
                        "date": 100,
                        "expires_at": 200,
                        "new_reactions": [{ "reaction_id": 1 }, { "reaction_id": 2 }],
                        "clickable_stickers": {
                            "clickable_stickers": [{ "link_object": { "url": "https://example.com" } }]
                        }
                    },
                    { "id": 2, "date": 101, "expires_at": 201 },
                    { "id": 3, "date": 102, "expires_at": 202, "type": "photo", "track_code": "abc" }
                ]]
            }),
        )
        .reply(
            "stories.getStats:1",
            json!({ "views": { "state": "on", "count": 40 }, "open_link": { "state": "on", "count": 3 } }),
        )
        .fail("stories.getStats:2", 15)
        .reply("stories.getStats:3", json!({}));

    let rows = story::extract(&gateway, &config("")).await.unwrap();

    assert_eq!(rows.len(), 2);
    let first = &rows[0];
    assert_eq!(first.group_id, 42);
    assert_eq!(first.link, "https://example.com");
    assert_eq!(first.kind, "-");
    assert_eq!(first.track_code, "-");
    assert_eq!(first.views, 40);
    assert_eq!(first.open_link, 3);
    assert_eq!(first.replies, 0);
    assert_eq!(first.new_reactions, 2);
    let third = &rows[1];
    assert_eq!(third.id, 3);
    assert_eq!(third.kind, "photo");
    assert_eq!(third.link, "-");
}

#[tokio::test]
async fn admin_groups_pairs_ids_with_the_legacy_user() {
    let gateway = FakeGateway::new().reply("groups.get:7", json!({ "count": 2, "items": [42, 43] }));
    let config = config("include_admin_groups: true\nparams:\n  token: legacy\n  user_id: 7\n");

    let rows = admin_groups::extract(&gateway, &config).await.unwrap();

    assert_eq!(
        rows,
        vec![
            admin_groups::AdminGroupRow { id: 42, user_id: 7 },
            admin_groups::AdminGroupRow { id: 43, user_id: 7 },
        ]
    );
    assert_eq!(StreamKind::AdminGroups.token(&config).unwrap(), "legacy");
    assert_eq!(StreamKind::Groups.token(&config).unwrap(), "secret");
}

#[tokio::test]
async fn admin_groups_without_params_is_a_config_error() {
    let gateway = FakeGateway::new();
    let err = admin_groups::extract(&gateway, &config("")).await.unwrap_err();
    assert!(matches!(err, StreamError::Config(_)));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn produce_records_conforms_post_rows() {
    let gateway = FakeGateway::new()
        .reply("wall.get", wall(&[10]))
        .fail("stats.getPostReach:10", 15);

    let records = StreamKind::GroupPosts
        .produce_records(&gateway, &config(""))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["post_id"], 10);
    assert_eq!(record["group_id"], -42);
    assert_eq!(record["type"], "post");
    assert_eq!(record["reach_total"], 0);
    assert_eq!(record["unsubscribe"], 0);
    let schema = StreamKind::GroupPosts.schema();
    assert_eq!(record.len(), schema.properties().len());
    assert!(schema.type_mismatches(record).is_empty());
}

#[tokio::test]
async fn produce_records_keeps_declared_activity_fields() {
    let gateway = FakeGateway::new().reply(
        "stats.get",
        json!([{
            "period_from": 1,
            "period_to": 2,
            "activity": { "likes": 4, "subscribed": 1, "mystery": 9 },
            "reach": { "reach": 1, "reach_subscribers": 1, "mobile_reach": 1, "sex": [{ "value": "f", "count": 1 }] },
            "visitors": { "views": 1, "visitors": 1, "mobile_views": 1 }
        }]),
    );

    let records = StreamKind::GroupStat
        .produce_records(&gateway, &config(""))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 42);
    assert_eq!(records[0]["activity_likes"], 4);
    assert_eq!(records[0]["dimension"], "sex");
    assert!(records[0].get("activity_mystery").is_none());
}
