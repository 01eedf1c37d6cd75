// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for MQTT actions using mockforge-mqtt.

#![cfg(feature = "mqtt")]

use std::time::Duration;

use hcfan_lib::protocol::{Action, Dispatch, MqttDispatcher};
use hcfan_lib::{Accessory, Bridge, Characteristic, CharacteristicValue, Config};
use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18850);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to bind
    sleep(Duration::from_millis(500)).await;
}

/// Subscribes an independent client to `topic` and forwards what it receives.
async fn watch_topic(port: u16, topic: &str) -> mpsc::UnboundedReceiver<(String, String)> {
    let mut options = MqttOptions::new(format!("watcher_{port}"), "127.0.0.1", port);
    options.set_keep_alive(Duration::from_secs(5));
    let (client, mut event_loop) = AsyncClient::new(options, 10);
    client.subscribe(topic, QoS::AtMostOnce).await.unwrap();

    timeout(Duration::from_secs(5), async {
        loop {
            if let Event::Incoming(Packet::SubAck(_)) = event_loop.poll().await.unwrap() {
                break;
            }
        }
    })
    .await
    .expect("subscription not acknowledged");

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let _client = client;
        while let Ok(event) = event_loop.poll().await {
            if let Event::Incoming(Packet::Publish(publish)) = event {
                let payload = String::from_utf8_lossy(&publish.payload).into_owned();
                let _ = tx.send((publish.topic, payload));
            }
        }
    });
    rx
}

/// Waits for the next message seen by [`watch_topic`].
async fn next_message(rx: &mut mpsc::UnboundedReceiver<(String, String)>) -> (String, String) {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no message received")
        .expect("watcher stopped")
}

// ============================================================================
// MqttDispatcher Tests
// ============================================================================

mod mqtt_dispatcher {
    use super::*;

    #[tokio::test]
    async fn publish_to_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let mut messages = watch_topic(port, "fan/#").await;

        let dispatcher = MqttDispatcher::connect(format!("mqtt://127.0.0.1:{port}"), "hcfan_test")
            .unwrap();
        assert_eq!(dispatcher.client_id(), "hcfan_test");

        let response = dispatcher
            .dispatch(&Action::mqtt("fan/speed", "2"))
            .await
            .unwrap();
        assert!(response.body().is_empty());

        assert_eq!(
            next_message(&mut messages).await,
            ("fan/speed".to_string(), "2".to_string())
        );
    }

    #[tokio::test]
    async fn connect_with_tcp_scheme() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let result = MqttDispatcher::connect(format!("tcp://127.0.0.1:{port}"), "hcfan_tcp");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn connect_with_credentials() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let dispatcher = MqttDispatcher::builder()
            .broker(format!("mqtt://127.0.0.1:{port}"))
            .credentials("user", "p@ss")
            .keep_alive(Duration::from_secs(10))
            .build()
            .unwrap();

        assert!(dispatcher.client_id().starts_with("hcfan_"));
        dispatcher
            .dispatch(&Action::mqtt("lamp/toggle", "1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn http_action_is_rejected() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let dispatcher =
            MqttDispatcher::connect(format!("mqtt://127.0.0.1:{port}"), "hcfan_http").unwrap();
        let result = dispatcher.dispatch(&Action::http("http://fan/1")).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn missing_broker_fails() {
        let result = MqttDispatcher::builder().client_id("hcfan").build();
        assert!(result.is_err());
    }
}

// ============================================================================
// Bridge Tests
// ============================================================================

mod bridge {
    use super::*;

    #[tokio::test]
    async fn fan_publishes_through_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let config = Config::from_json(&format!(
            r#"{{
                "broker_uri": "mqtt://127.0.0.1:{port}",
                "client_id": "hcfan_bridge",
                "fans": [{{
                    "name": "Fan",
                    "speeds": [
                        {{ "speed": 33, "topic": "fan/speed", "payload": "1" }},
                        {{ "speed": 66, "topic": "fan/speed", "payload": "2" }},
                        {{ "speed": 100, "topic": "fan/speed", "payload": "3" }}
                    ]
                }}]
            }}"#
        ))
        .unwrap();

        let mut messages = watch_topic(port, "fan/speed").await;

        let bridge = Bridge::connect(&config).unwrap();
        let fan = bridge.primary().unwrap();

        fan.write(Characteristic::RotationSpeed, CharacteristicValue::Number(70.0))
            .await;

        // 70 is closer to 66 than to 100
        assert_eq!(
            next_message(&mut messages).await,
            ("fan/speed".to_string(), "2".to_string())
        );
        assert_eq!(
            fan.read(Characteristic::RotationSpeed),
            Some(CharacteristicValue::Number(70.0))
        );
    }
}
