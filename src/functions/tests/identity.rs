use uuid::Uuid;

use super::*;
use crate::types::{
    DigitalTwinRef, Property, PropertyDefinition, PropertyMeta, TokenInfo, TypedValue,
};

const SUBJECT_ID: &str = "9c1f7b1e-8e0a-4a52-9d6b-4b4c6a3f2e11";
const TENANT_ID: &str = "1b2e3c4d-5f60-4172-8394-a5b6c7d8e9f0";

fn uuid_bytes(id: &str) -> Vec<u8> {
    Uuid::parse_str(id).unwrap().as_bytes().to_vec()
}

fn token_info() -> TokenInfo {
    TokenInfo {
        subject: Some(DigitalTwinRef {
            id: uuid_bytes(SUBJECT_ID),
            tenant_id: uuid_bytes(TENANT_ID),
        }),
        expire_time: Some(decision_time()),
        token_claims: json!({"scope": "read"}).as_object().cloned().unwrap(),
        ..TokenInfo::default()
    }
}

#[tokio::test]
async fn test_identity_of_an_active_token() {
    let mock = Arc::new(MockIdentity {
        introspection: TokenIntrospection {
            active: true,
            token_info: Some(token_info()),
        },
        ..MockIdentity::default()
    });
    let builtins = identity_builtins(mock.clone());

    let result = builtins
        .call("indy.identity", &[json!(ACCESS_TOKEN)])
        .await
        .unwrap();

    insta::with_settings!({sort_maps => true}, {
        insta::assert_json_snapshot!(result, @r#"
        {
          "active": true,
          "appSpaceId": "",
          "applicationId": "",
          "customerId": "",
          "error": null,
          "expire": 1596874088,
          "impersonatedId": "",
          "sessionClaims": {},
          "subjectId": "9c1f7b1e-8e0a-4a52-9d6b-4b4c6a3f2e11",
          "tenantId": "1b2e3c4d-5f60-4172-8394-a5b6c7d8e9f0",
          "tokenClaims": {
            "scope": "read"
          }
        }
        "#);
    });
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_identity_of_an_inactive_token() {
    let builtins = identity_builtins(Arc::new(MockIdentity::default()));
    let result = builtins
        .call("indy.identity", &[json!("expired")])
        .await
        .unwrap();
    assert_eq!(result, json!({"error": null, "active": false}));
}

#[tokio::test]
async fn test_identity_with_a_broken_uuid_aborts() {
    let mut info = token_info();
    info.customer_id = vec![1, 2, 3];
    let mock = Arc::new(MockIdentity {
        introspection: TokenIntrospection {
            active: true,
            token_info: Some(info),
        },
        ..MockIdentity::default()
    });
    let err = identity_builtins(mock)
        .call("indy.identity", &[json!(ACCESS_TOKEN)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BuiltinError::InvalidUuid { field: "CustomerId", .. }
    ));
}

#[tokio::test]
async fn test_identity_rejected_token_is_a_value() {
    let mock = Arc::new(MockIdentity {
        failure: Some(StatusError::new(StatusCode::Unauthenticated, "token expired").into()),
        ..MockIdentity::default()
    });
    let result = identity_builtins(mock)
        .call("indy.identity", &[json!(ACCESS_TOKEN)])
        .await
        .unwrap();
    assert_eq!(
        result,
        json!({"error": {"message": "token expired", "code": 16, "codeName": "Unauthenticated"}})
    );
}

#[tokio::test]
async fn test_identity_properties() {
    let mock = Arc::new(MockIdentity {
        properties: DigitalTwinProperties {
            token_info: Some(token_info()),
            properties: vec![Property {
                id: "prop-1".to_string(),
                definition: PropertyDefinition {
                    context: "ctx".to_string(),
                    property: "email".to_string(),
                    property_type: "email".to_string(),
                },
                meta: PropertyMeta {
                    assurance_level: 2,
                    primary: true,
                    verification_time: Some(decision_time()),
                    ..PropertyMeta::default()
                },
                value: Some(TypedValue::from("alice@example.com")),
            }],
        },
        ..MockIdentity::default()
    });
    let builtins = identity_builtins(mock.clone());

    let result = builtins
        .call(
            "indy.identity_properties",
            &[json!(ACCESS_TOKEN), json!(["email", "name"])],
        )
        .await
        .unwrap();

    assert_eq!(result["error"], Value::Null);
    assert_eq!(result["token_info"]["active"], true);
    assert_eq!(result["token_info"]["subjectId"], SUBJECT_ID);
    insta::with_settings!({sort_maps => true}, {
        insta::assert_json_snapshot!(result["properties"], @r#"
        [
          {
            "definition": {
              "context": "ctx",
              "property": "email",
              "type": "email"
            },
            "id": "prop-1",
            "meta": {
              "assuranceLevel": 2,
              "issuer": "",
              "primary": true,
              "verificationTime": "2020-08-08T08:08:08Z",
              "verifier": ""
            },
            "value": "alice@example.com"
          }
        ]
        "#);
    });

    assert_eq!(
        *mock.requested_properties.lock().unwrap(),
        vec![vec!["email".to_string(), "name".to_string()]]
    );
}

#[tokio::test]
async fn test_identity_properties_without_token_info() {
    let builtins = identity_builtins(Arc::new(MockIdentity::default()));
    let result = builtins
        .call("indy.identity_properties", &[json!(ACCESS_TOKEN), json!([])])
        .await
        .unwrap();
    assert_eq!(
        result,
        json!({"error": null, "token_info": {}, "properties": []})
    );
}

#[tokio::test]
async fn test_identity_without_endpoint() {
    let builtins = Builtins::new(ApiGeneration::Subject, Clients::new());
    let err = builtins
        .call("indy.identity", &[json!(ACCESS_TOKEN)])
        .await
        .unwrap_err();
    assert!(err.is_service_error());
    assert_eq!(err.to_string(), "missing endpoint");
}
