use httpmock::prelude::*;
use myparcel_client::{
    Address, Carrier, Client, CreatedShipment, DeliveryType, Error, Options, PackageType,
    Shipment, ValidationError,
};
use serde_json::{Value, json};
use std::time::Duration;

const CONTENT_TYPE: &str = "application/vnd.shipment+json;version=1.1;charset=utf-8";

fn client(server: &MockServer) -> Client {
    Client::builder("test-key")
        .base_url(server.base_url())
        .build()
        .unwrap()
}

fn shipment() -> Shipment {
    Shipment::new(
        Address::new("NL", "Amsterdam", "Damrak", "Piet Jansen")
            .number("12")
            .postal_code("1012LG")
            .email("piet@example.com"),
        Carrier::PostNl,
    )
    .reference("order-1001")
}

fn stored_shipment(id: u64, reference: &str) -> Value {
    json!({
        "id": id,
        "reference_identifier": reference,
        "recipient": {"cc": "NL", "city": "Amsterdam", "street": "Damrak", "number": "12",
                      "postal_code": "1012LG", "person": "Piet Jansen"},
        "options": {"package_type": 1, "delivery_type": 2, "delivery_date": "2024-05-02 00:00:00",
                    "signature": 1, "insurance": {"amount": 0, "currency": "EUR"}},
        "carrier": 1,
        "barcode": format!("3SMYPA{id:09}"),
        "created": "2024-05-01 09:30:00",
        "modified": "2024-05-01 09:30:00",
        "status": 2
    })
}

#[tokio::test]
async fn create_shipment_posts_envelope_with_headers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/shipments")
                .header("authorization", "Bearer test-key")
                .header("content-type", CONTENT_TYPE)
                .header("accept", "application/json")
                .json_body(json!({
                    "data": {"shipments": [{
                        "reference_identifier": "order-1001",
                        "recipient": {"cc": "NL", "city": "Amsterdam", "street": "Damrak",
                                      "number": "12", "postal_code": "1012LG",
                                      "person": "Piet Jansen", "email": "piet@example.com"},
                        "options": {"package_type": 1, "delivery_date": null},
                        "carrier": 1
                    }]}
                }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"data": {"ids": [{"id": 4242, "reference_identifier": "order-1001"}]}}));
        })
        .await;

    let id = client(&server).create_shipment(&shipment()).await.unwrap();

    assert_eq!(id, 4242);
    mock.assert_async().await;
}

#[tokio::test]
async fn create_shipment_accepts_201_created() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/shipments");
            then.status(201)
                .json_body(json!({"data": {"ids": [{"id": 7, "reference_identifier": "order-1001"}]}}));
        })
        .await;

    let id = client(&server).create_shipment(&shipment()).await.unwrap();
    assert_eq!(id, 7);
}

#[tokio::test]
async fn create_shipment_sends_user_agent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/shipments")
                .header("user-agent", "shop-backend/3.1");
            then.status(200)
                .json_body(json!({"data": {"ids": [{"id": 1, "reference_identifier": null}]}}));
        })
        .await;

    let client = Client::builder("test-key")
        .base_url(server.base_url())
        .user_agent("shop-backend/3.1")
        .build()
        .unwrap();
    client.create_shipment(&shipment()).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn remote_rejection_keeps_status_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/shipments");
            then.status(422).body(r#"{"error":"invalid postal code"}"#);
        })
        .await;

    let err = client(&server)
        .create_shipment(&shipment())
        .await
        .unwrap_err();

    match err {
        Error::Remote { status, body } => {
            assert_eq!(status, 422);
            assert!(body.contains(r#"{"error":"invalid postal code"}"#));
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_is_a_remote_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/shipments/1");
            then.status(401).body("Unauthorized");
        })
        .await;

    let err = client(&server).get_shipment(1).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    let client = Client::builder("test-key")
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let result = client.create_shipment(&shipment()).await;

    match result {
        Err(err) => assert!(err.is_transport(), "expected transport error, got {err:?}"),
        Ok(id) => panic!("unreachable host returned id {id}"),
    }
}

#[tokio::test]
async fn expired_deadline_is_a_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/shipments/9");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({"data": {"shipments": [], "results": 0}}));
        })
        .await;

    let err = client(&server)
        .with_timeout(Duration::from_millis(50))
        .get_shipment(9)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn empty_id_list_is_a_decoding_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/shipments");
            then.status(200).json_body(json!({"data": {"ids": []}}));
        })
        .await;

    let err = client(&server)
        .create_shipment(&shipment())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decoding(_)));
}

#[tokio::test]
async fn fetch_without_shipments_path_is_a_decoding_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/shipments/12");
            then.status(200).json_body(json!({"data": {}}));
        })
        .await;

    let err = client(&server).get_shipment(12).await.unwrap_err();
    assert!(matches!(err, Error::Decoding(_)), "{err:?}");
}

#[tokio::test]
async fn remote_body_ignores_declared_charset() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/shipments/8");
            then.status(400)
                .header("content-type", "text/plain; charset=iso-8859-1")
                .body("adres onbekend: café");
        })
        .await;

    let err = client(&server).get_shipment(8).await.unwrap_err();

    match err {
        Error::Remote { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "adres onbekend: café");
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn success_with_unexpected_body_is_a_decoding_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/shipments");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let err = client(&server)
        .create_shipment(&shipment())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decoding(_)));
}

#[tokio::test]
async fn create_shipments_returns_every_id() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/shipments");
            then.status(201).json_body(json!({"data": {"ids": [
                {"id": 10, "reference_identifier": "a"},
                {"id": 11, "reference_identifier": "b"}
            ]}}));
        })
        .await;

    let batch = [shipment().reference("a"), shipment().reference("b")];
    let created = client(&server).create_shipments(&batch).await.unwrap();

    assert_eq!(
        created,
        vec![
            CreatedShipment {
                id: 10,
                reference_identifier: Some("a".to_string())
            },
            CreatedShipment {
                id: 11,
                reference_identifier: Some("b".to_string())
            },
        ]
    );
}

#[tokio::test]
async fn invalid_shipment_is_rejected_before_sending() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/shipments");
            then.status(200)
                .json_body(json!({"data": {"ids": [{"id": 1, "reference_identifier": null}]}}));
        })
        .await;

    let mailbox = shipment().options(Options {
        signature: true,
        ..Options::new(PackageType::Mailbox)
    });
    let err = client(&server).create_shipment(&mailbox).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::OptionsNotAllowed { .. })
    ));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn local_validation_can_be_left_to_the_api() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/shipments");
            then.status(422).body(r#"{"errors":[{"code":3212,"message":"delivery_date required"}]}"#);
        })
        .await;

    let client = Client::builder("test-key")
        .base_url(server.base_url())
        .validate_locally(false)
        .build()
        .unwrap();
    let mut shipment = shipment();
    shipment.options.delivery_type = Some(DeliveryType::Morning);

    let err = client.create_shipment(&shipment).await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    mock.assert_async().await;
}

#[tokio::test]
async fn base64_mode_encodes_bearer_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/shipments/3")
                .header("authorization", "Bearer dGVzdC1rZXk=");
            then.status(200)
                .json_body(json!({"data": {"shipments": [], "results": 0}}));
        })
        .await;

    let client = Client::builder("test-key")
        .base_url(server.base_url())
        .base64_api_key(true)
        .build()
        .unwrap();
    client.get_shipment(3).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn get_shipment_returns_all_records() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/shipments/100")
                .header("authorization", "Bearer test-key")
                .header("accept", "application/json");
            then.status(200).json_body(json!({
                "data": {
                    "shipments": [stored_shipment(100, "order-1"), stored_shipment(101, "order-2")],
                    "results": 2
                }
            }));
        })
        .await;

    let result = client(&server).get_shipment(100).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.results, 2);
    assert_eq!(result.shipments.len() as u64, result.results);

    let first = &result.shipments[0];
    assert_eq!(first.id, Some(100));
    assert_eq!(first.barcode.as_deref(), Some("3SMYPA000000100"));
    assert_eq!(first.options.delivery_type, Some(DeliveryType::Standard));
    assert!(first.options.signature);
    assert_eq!(first.created.to_string(), "2024-05-01 09:30:00");
    assert_eq!(
        result.shipments[1].reference_identifier.as_deref(),
        Some("order-2")
    );
}

#[tokio::test]
async fn rotated_client_uses_new_key() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/shipments/5")
                .header("authorization", "Bearer rotated-key");
            then.status(200)
                .json_body(json!({"data": {"shipments": [], "results": 0}}));
        })
        .await;

    let rotated = client(&server)
        .to_builder()
        .api_key("rotated-key")
        .build()
        .unwrap();
    rotated.get_shipment(5).await.unwrap();

    mock.assert_async().await;
}
