use cirelay_core::{ChatDirectory, ChatError, REPORT_CHANNEL};
use cirelay_discord::{DiscordClient, DiscordConfig, DiscordError};
use httpmock::prelude::*;
use serde_json::json;

const GUILD_ID: u64 = 555;

fn client_for(server: &MockServer) -> DiscordClient {
    let config = DiscordConfig::new("bot-token", GUILD_ID).with_api_base(&server.base_url());
    DiscordClient::new(config).expect("client should build")
}

fn guild_listing() -> serde_json::Value {
    json!([
        { "id": "10", "type": 4, "name": "widget", "parent_id": null },
        { "id": "11", "type": 0, "name": "general", "parent_id": "10" },
        { "id": "12", "type": 0, "name": "pr-report", "parent_id": "10" },
        { "id": "20", "type": 4, "name": "gadget", "parent_id": null },
        { "id": "21", "type": 2, "name": "pr-report", "parent_id": "20" },
        { "id": "30", "type": 0, "name": "pr-report", "parent_id": null }
    ])
}

#[tokio::test]
async fn resolves_category_and_report_channel() {
    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method(GET)
            .path("/guilds/555/channels")
            .header("authorization", "Bot bot-token");
        then.status(200).json_body(guild_listing());
    });

    let client = client_for(&server);
    let category = client
        .find_category("widget")
        .await
        .expect("lookup should succeed")
        .expect("category exists");
    assert_eq!(category.id, "10");

    let channel = client
        .find_text_channel(&category, REPORT_CHANNEL)
        .await
        .expect("lookup should succeed")
        .expect("channel exists");
    assert_eq!(channel.id, "12");
    assert_eq!(channel.name, REPORT_CHANNEL);

    // No caching between lookups.
    listing.assert_calls(2);
}

#[tokio::test]
async fn voice_channel_and_orphan_channel_are_not_matched() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/guilds/555/channels");
        then.status(200).json_body(guild_listing());
    });

    let client = client_for(&server);
    let category = client.find_category("gadget").await.unwrap().unwrap();
    let channel = client
        .find_text_channel(&category, REPORT_CHANNEL)
        .await
        .unwrap();
    assert!(channel.is_none());

    assert!(client.find_category("pr-report").await.unwrap().is_none());
    assert!(client.find_category("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_guild_maps_to_guild_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/guilds/555/channels");
        then.status(404)
            .json_body(json!({ "message": "Unknown Guild", "code": 10004 }));
    });

    let client = client_for(&server);
    let err = client.find_category("widget").await.unwrap_err();
    assert_eq!(err, ChatError::GuildNotFound);
}

#[tokio::test]
async fn server_error_on_listing_is_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/guilds/555/channels");
        then.status(502).body("bad gateway");
    });

    let client = client_for(&server);
    let err = client.find_category("widget").await.unwrap_err();
    assert_eq!(
        err,
        ChatError::Api {
            status: 502,
            body: "bad gateway".to_string()
        }
    );
}

#[tokio::test]
async fn send_posts_message_content() {
    let server = MockServer::start();
    let post = server.mock(|when, then| {
        when.method(POST)
            .path("/channels/12/messages")
            .header("authorization", "Bot bot-token")
            .json_body_includes(json!({ "content": "hello **widget**" }).to_string());
        then.status(200).json_body(json!({ "id": "900", "channel_id": "12" }));
    });

    let client = client_for(&server);
    let channel = cirelay_core::ChannelRef {
        id: "12".to_string(),
        name: REPORT_CHANNEL.to_string(),
    };
    client
        .send(&channel, "hello **widget**")
        .await
        .expect("send should succeed");

    post.assert();
}

#[tokio::test]
async fn rejected_send_is_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/channels/12/messages");
        then.status(403)
            .json_body(json!({ "message": "Missing Permissions", "code": 50013 }));
    });

    let client = client_for(&server);
    let channel = cirelay_core::ChannelRef {
        id: "12".to_string(),
        name: REPORT_CHANNEL.to_string(),
    };
    let err = client.send(&channel, "hi").await.unwrap_err();
    assert!(matches!(err, ChatError::Api { status: 403, .. }));
}

#[tokio::test]
async fn current_user_reads_bot_identity() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/users/@me")
            .header("authorization", "Bot bot-token");
        then.status(200)
            .json_body(json!({ "id": "42", "username": "ci-relay", "bot": true }));
    });

    let user = client_for(&server).current_user().await.unwrap();
    assert_eq!(user.id, "42");
    assert_eq!(user.username, "ci-relay");
}

#[tokio::test]
async fn current_user_with_bad_token() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/users/@me");
        then.status(401).json_body(json!({ "message": "401: Unauthorized" }));
    });

    let err = client_for(&server).current_user().await.unwrap_err();
    assert!(matches!(err, DiscordError::Api { status: 401, .. }));
}
