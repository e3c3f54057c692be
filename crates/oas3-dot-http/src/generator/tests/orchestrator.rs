use std::{collections::HashSet, path::PathBuf};

use http::Method;

use super::support::{json_body, operation, operation_with, parse_spec, service};
use crate::generator::{
  descriptor::AuthRequirement,
  host::{OpenApiSource, StaticSource},
  metrics::GenerationWarning,
  orchestrator::{GenerateOptions, Orchestrator},
  types::TypeGraph,
};

fn paths(files: &[crate::generator::modules::RenderedFile]) -> Vec<PathBuf> {
  files.iter().map(|file| file.path.clone()).collect()
}

#[test]
fn test_single_operation_yields_single_document() {
  let source = StaticSource {
    services: vec![service("Demo", vec![operation("test", Method::GET, "/")])],
    types: TypeGraph::new(),
  };

  let output = Orchestrator::new(source, GenerateOptions::default()).generate().unwrap();

  assert_eq!(output.files.len(), 1);
  assert_eq!(output.files[0].path, PathBuf::from("Demo/pets_test_get.http"));
  assert!(output.files[0].contents.starts_with("### test\n"));
  assert_eq!(output.stats.services, 1);
  assert_eq!(output.stats.documents_generated, 1);
  assert!(output.stats.warnings.is_empty());
}

#[test]
fn test_colliding_stems_get_suffixes() {
  let source = StaticSource {
    services: vec![service(
      "Demo",
      vec![
        operation("list", Method::GET, "/pets"),
        operation("list", Method::GET, "/pets/all"),
      ],
    )],
    types: TypeGraph::new(),
  };

  let output = Orchestrator::new(source, GenerateOptions::default()).generate().unwrap();

  assert_eq!(
    paths(&output.files),
    vec![
      PathBuf::from("Demo/pets_list_get.http"),
      PathBuf::from("Demo/pets_list_get2.http"),
    ]
  );
}

#[test]
fn test_only_and_exclude_skip_operations() {
  let operations = vec![
    operation("list", Method::GET, "/pets"),
    operation("create", Method::POST, "/pets"),
    operation("remove", Method::DELETE, "/pets/{id}"),
  ];
  let source = StaticSource {
    services: vec![service("Demo", operations)],
    types: TypeGraph::new(),
  };
  let options = GenerateOptions::builder()
    .only(HashSet::from(["list".to_string(), "remove".to_string()]))
    .exclude(HashSet::from(["remove".to_string()]))
    .build();

  let output = Orchestrator::new(source, options).generate().unwrap();

  assert_eq!(paths(&output.files), vec![PathBuf::from("Demo/pets_list_get.http")]);
  assert_eq!(output.stats.operations_seen, 3);
  assert_eq!(
    output.stats.warnings,
    vec![
      GenerationWarning::SkippedOperation {
        operation: "create".to_string(),
        reason: "not selected by --only".to_string(),
      },
      GenerationWarning::SkippedOperation {
        operation: "remove".to_string(),
        reason: "excluded by --exclude".to_string(),
      },
    ]
  );
}

#[test]
fn test_service_auth_applies_to_operations() {
  let mut demo = service("Demo", vec![operation("list", Method::GET, "/pets")]);
  demo.authentication = AuthRequirement::Required;
  let source = StaticSource {
    services: vec![demo],
    types: TypeGraph::new(),
  };

  let output = Orchestrator::new(source, GenerateOptions::default()).generate().unwrap();

  assert!(output.files[0].contents.contains("Authorization: Bearer {{authToken}}"));
}

#[test]
fn test_models_are_emitted_once_per_record() {
  let mut types = TypeGraph::new();
  let string = types.scalar("string");
  let address = types.record(None, [("street", string)]);
  let order = types.record(Some("Order"), [("shipTo", address), ("billTo", address)]);
  let operations = vec![
    operation_with(
      "create",
      Method::POST,
      "/orders",
      vec![],
      Some(json_body(order)),
      AuthRequirement::None,
    ),
    operation_with(
      "replace",
      Method::PUT,
      "/orders/{id}",
      vec![],
      Some(json_body(order)),
      AuthRequirement::None,
    ),
  ];
  let source = StaticSource {
    services: vec![service("Shop", operations)],
    types,
  };
  let options = GenerateOptions::builder().emit_models(true).build();

  let output = Orchestrator::new(source, options).generate().unwrap();

  assert_eq!(
    paths(&output.files),
    vec![
      PathBuf::from("Shop/pets_create_post.http"),
      PathBuf::from("Shop/pets_replace_put.http"),
      PathBuf::from("Shop/models/Order.jsonc"),
      PathBuf::from("Shop/models/OrderShipTo.jsonc"),
    ]
  );
  assert_eq!(output.stats.models_generated, 2);
  assert_eq!(output.stats.bodies_synthesized, 2);

  let order_model = &output.files[2];
  assert!(
    order_model
      .contents
      .starts_with("// import OrderShipTo from \"./OrderShipTo.jsonc\"\n{"),
    "got:\n{}",
    order_model.contents
  );
}

#[test]
fn test_models_skipped_without_flag() {
  let mut types = TypeGraph::new();
  let string = types.scalar("string");
  let pet = types.record(Some("Pet"), [("name", string)]);
  let source = StaticSource {
    services: vec![service(
      "Demo",
      vec![operation_with(
        "create",
        Method::POST,
        "/pets",
        vec![],
        Some(json_body(pet)),
        AuthRequirement::None,
      )],
    )],
    types,
  };

  let output = Orchestrator::new(source, GenerateOptions::default()).generate().unwrap();

  assert_eq!(output.files.len(), 1);
  assert_eq!(output.stats.models_generated, 0);
}

#[test]
fn test_openapi_end_to_end() {
  let spec = parse_spec(
    r##"{
      "openapi": "3.0.3",
      "info": { "title": "Orders", "version": "1" },
      "paths": {
        "/orders/{orderId}": {
          "patch": {
            "operationId": "patchOrder",
            "tags": ["orders"],
            "parameters": [
              { "name": "orderId", "in": "path", "required": true, "schema": { "type": "string" } },
              { "name": "notify", "in": "query", "schema": { "type": "boolean" } }
            ],
            "requestBody": {
              "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/OrderPatch" } }
              }
            },
            "responses": { "200": { "description": "ok" } }
          }
        }
      },
      "components": {
        "schemas": {
          "OrderPatch": {
            "type": "object",
            "properties": {
              "quantity": { "type": "integer", "format": "int32" },
              "state": { "type": "string", "enum": ["open", "closed"] }
            }
          }
        }
      }
    }"##,
  );
  let options = GenerateOptions::builder()
    .emit_models(true)
    .source_label("orders.json".to_string())
    .build();

  let output = Orchestrator::new(OpenApiSource::new(&spec), options).generate().unwrap();

  let expected = "\
### patchOrder

// Variables section - defines variables to use in the request
@host = localhost
@port = 8080
@baseUrl = http://{{host}}{{#if port}}:{{port}}{{/if}}

// Path parameters
@orderId = REPLACE_WITH_ORDERID_VALUE

// Query parameters
@notify = REPLACE_WITH_NOTIFY_VALUE

PATCH {{baseUrl}}/orders/{{orderId}}?notify={{notify}}
Content-Type: application/json

{
 \"quantity\": 42, // Scalar int32
 \"state\": \"open\", // Union type: open | closed
}";
  assert_eq!(output.files[0].path, PathBuf::from("Orders/orders_patchOrder_patch.http"));
  assert_eq!(output.files[0].contents, expected);

  let model = &output.files[1];
  assert_eq!(model.path, PathBuf::from("Orders/models/OrderPatch.jsonc"));
  assert!(
    model
      .contents
      .starts_with("// import { OrderPatch } from \"orders.json#/components/schemas/OrderPatch\"\n{"),
    "got:\n{}",
    model.contents
  );
}
