// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-turn conversations against a mock gateway.

use arpent_assistant::{AssistantClient, ChatReply, ChatTurn, Conversation};
use arpent_config::model::AssistantConfig;
use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> AssistantClient {
    AssistantClient::from_config(&AssistantConfig {
        endpoint: Some(format!("{}/assistant", server.uri())),
        api_key: Some("anon-key".into()),
        bearer_token: None,
        timeout_secs: Some(5),
    })
    .unwrap()
}

#[tokio::test]
async fn second_turn_sends_streamed_first_reply() {
    let server = MockServer::start().await;
    let sse = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Un bornage \"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"fixe les limites.\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "C'est quoi un bornage ?"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse.as_bytes().to_vec(), "text/event-stream"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "user", "content": "C'est quoi un bornage ?"},
                {"role": "assistant", "content": "Un bornage fixe les limites."},
                {"role": "user", "content": "Combien ça coûte ?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Sur devis."})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut conversation = Conversation::new();

    for question in ["C'est quoi un bornage ?", "Combien ça coûte ?"] {
        let mut events = client.reply(conversation.push_user(question));
        while let Some(event) = events.next().await {
            conversation.apply(&event);
        }
    }

    assert_eq!(
        conversation.turns().last(),
        Some(&ChatTurn::assistant("Sur devis."))
    );
    assert_eq!(conversation.turns().len(), 4);
}

#[tokio::test]
async fn failed_reply_collects_to_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "Service indisponible"})),
        )
        .mount(&server)
        .await;

    let reply = ChatReply::collect(client(&server).reply(vec![ChatTurn::user("Bonjour")])).await;
    assert!(reply.is_error());
    assert_eq!(reply.display_text(), "[Erreur] Service indisponible");
}
