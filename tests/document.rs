use indexmap::IndexMap;
use oas_builder::*;
use pretty_assertions::assert_eq;

fn info() -> Info {
    Info::new(InfoConfig {
        title: "Store".into(),
        version: "1.0.0".into(),
        ..Default::default()
    })
    .unwrap()
}

fn op(operation_id: &str) -> Operation {
    Operation::new(OperationConfig {
        operation_id: Some(operation_id.into()),
        responses: IndexMap::from([(
            "200".to_string(),
            Response::described("OK").unwrap().into(),
        )]),
        ..Default::default()
    })
    .unwrap()
}

fn get(template: &str, operation_id: &str) -> Path {
    Path::new(PathConfig {
        template: template.into(),
        get: Some(op(operation_id)),
        ..Default::default()
    })
    .unwrap()
}

fn document(paths: Vec<Path>) -> AppResult<Api> {
    Api::new(ApiConfig {
        paths,
        ..ApiConfig::new(info())
    })
}

#[test]
fn test_placeholder_names_do_not_distinguish_paths() {
    let err = document(vec![
        get("/pets/{id}", "getPet"),
        get("/owners", "listOwners"),
        get("/pets/{petId}", "showPet"),
    ])
    .unwrap_err();
    assert_eq!(
        err,
        AppError::DuplicatePathTemplate {
            first: "/pets/{id}".into(),
            second: "/pets/{petId}".into(),
        }
    );
}

#[test]
fn test_literal_segments_distinguish_paths() {
    assert!(document(vec![
        get("/pets/{id}", "getPet"),
        get("/pets/mine", "myPets"),
        get("/pets/{id}/toys", "petToys"),
    ])
    .is_ok());
}

#[test]
fn test_duplicate_operation_id_reports_both_locations() {
    let second = Path::new(PathConfig {
        template: "/owners".into(),
        get: Some(op("listOwners")),
        post: Some(op("listPets")),
        ..Default::default()
    })
    .unwrap();
    let err = document(vec![get("/pets", "listPets"), second]).unwrap_err();
    assert_eq!(
        format!("{err}"),
        "Duplicate operationId 'listPets' at paths[1].post (first declared at paths[0].get)"
    );
}

#[test]
fn test_path_collision_is_reported_before_operation_ids() {
    let err = document(vec![get("/a/{x}", "same"), get("/a/{y}", "same")]).unwrap_err();
    assert!(matches!(err, AppError::DuplicatePathTemplate { .. }));
}

#[test]
fn test_callback_operation_ids_take_part() {
    let yaml = r#"
openapi: 3.0.3
info:
  title: Hooks
  version: "1"
paths:
  /subscribe:
    post:
      operationId: subscribe
      responses:
        "201":
          description: Subscribed
      callbacks:
        onEvent:
          "{$request.body#/callbackUrl}":
            post:
              operationId: subscribe
              responses:
                "200":
                  description: Received
"#;
    let err = serde_yaml::from_str::<Api>(yaml).unwrap_err();
    assert!(format!("{err}").contains(
        r#"Duplicate operationId 'subscribe' at paths[0].post.callbacks.onEvent["{$request.body#/callbackUrl}"].post"#
    ));
}

#[test]
fn test_local_errors_are_located_under_their_path_key() {
    let yaml = r#"
openapi: 3.0.3
info:
  title: Store
  version: "1"
paths:
  /pets/{petId}:
    get:
      parameters:
        - name: id
          in: path
          required: true
      responses:
        "200":
          description: OK
"#;
    let err = serde_yaml::from_str::<Api>(yaml).unwrap_err();
    assert!(format!("{err}").contains(
        r#"paths["/pets/{petId}"].get.parameters[0].name: 'id' is not one of [petId]"#
    ));
}

#[test]
fn test_request_body_on_delete_is_advisory() {
    let yaml = r#"
openapi: 3.0.3
info:
  title: Store
  version: "1"
paths:
  /pets:
    delete:
      requestBody:
        content:
          application/json: {}
      responses:
        "204":
          description: Deleted
"#;
    let api: Api = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(api.advisories().len(), 1);
    assert_eq!(
        api.advisories()[0].kind,
        AdvisoryKind::RequestBodyOnBodilessMethod(HttpMethod::Delete)
    );
    let out = serde_json::to_value(&api).unwrap();
    assert!(out.get("advisories").is_none());
}

#[test]
fn test_construction_is_idempotent() {
    let build = || document(vec![get("/pets", "listPets"), get("/pets/{id}", "getPet")]).unwrap();
    let first = build();
    let second = build();
    assert_eq!(first, second);
    assert!(!std::ptr::eq(first.paths().as_ptr(), second.paths().as_ptr()));
}

#[test]
fn test_optional_path_parameter_is_located() {
    let yaml = r#"
openapi: 3.0.3
info:
  title: Store
  version: "1"
paths:
  /pets/{petId}:
    get:
      parameters:
        - name: petId
          in: path
          required: false
      responses:
        "200":
          description: OK
"#;
    let err = serde_yaml::from_str::<Api>(yaml).unwrap_err();
    assert!(format!("{err}").contains("parameters[0].required: 'false' is not one of [true]"));
}

#[test]
fn test_repeated_path_key_is_rejected() {
    let json = r#"{
        "openapi": "3.0.3",
        "info": {"title": "Store", "version": "1"},
        "paths": {
            "/a": {"get": {"responses": {"200": {"description": "one"}}}},
            "/a": {"post": {"responses": {"200": {"description": "two"}}}}
        }
    }"#;
    let err = serde_json::from_str::<Api>(json).unwrap_err();
    assert!(format!("{err}").starts_with(r#"paths["/a"]: duplicate key '/a'"#));
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_entities_are_send_and_sync() {
    assert_send_sync::<Api>();
    assert_send_sync::<Path>();
    assert_send_sync::<Schema>();
    assert_send_sync::<RefOr<Parameter>>();
    assert_send_sync::<AppError>();
}

#[test]
fn test_parts_built_on_separate_threads() {
    let (pets, owners) = std::thread::scope(|scope| {
        let pets = scope.spawn(|| get("/pets", "listPets"));
        let owners = scope.spawn(|| get("/owners", "listOwners"));
        (pets.join().unwrap(), owners.join().unwrap())
    });
    let api = document(vec![pets, owners]).unwrap();
    assert!(api.operation_by_id("listOwners").is_some());

    let shared = &api;
    let copies: Vec<serde_json::Value> = std::thread::scope(|scope| {
        let readers: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || serde_json::to_value(shared).unwrap()))
            .collect();
        readers.into_iter().map(|reader| reader.join().unwrap()).collect()
    });
    assert!(copies.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(copies[0]["paths"]["/owners"]["get"]["operationId"], "listOwners");
}
