use indexmap::IndexMap;
use oas_builder::dsl::*;
use oas_builder::*;
use pretty_assertions::assert_eq;

fn pets_ref() -> RefOr<Schema> {
    Reference::component("schemas", "Pets").unwrap().into()
}

fn json_response(description: &str, schema: RefOr<Schema>) -> RefOr<Response> {
    response(ResponseConfig {
        description: description.into(),
        content: IndexMap::from([("application/json".to_string(), MediaType::with_schema(schema))]),
    })
    .unwrap()
    .into()
}

fn error_response() -> (String, RefOr<Response>) {
    let error = Reference::component("schemas", "Error").unwrap();
    ("default".to_string(), json_response("unexpected error", error.into()))
}

fn petstore() -> AppResult<Api> {
    let limit = parameter(ParameterConfig {
        name: "limit".into(),
        location: ParameterLocation::Query,
        description: Some("How many items to return at one time (max 100)".into()),
        schema: Some(
            schema(SchemaConfig {
                schema_type: Some(SchemaType::Integer),
                format: Some("int32".into()),
                ..Default::default()
            })?
            .into(),
        ),
        ..Default::default()
    })?;

    let list_pets = operation(OperationConfig {
        summary: Some("List all pets".into()),
        operation_id: Some("listPets".into()),
        tags: vec!["pets".into()],
        parameters: vec![limit.into()],
        responses: IndexMap::from([
            ("200".to_string(), json_response("A paged array of pets", pets_ref())),
            error_response(),
        ]),
        ..Default::default()
    })?;

    let create_pets = operation(OperationConfig {
        summary: Some("Create a pet".into()),
        operation_id: Some("createPets".into()),
        tags: vec!["pets".into()],
        responses: IndexMap::from([
            ("201".to_string(), response(ResponseConfig {
                description: "Null response".into(),
                ..Default::default()
            })?.into()),
            error_response(),
        ]),
        ..Default::default()
    })?;

    let show_pet = operation(OperationConfig {
        summary: Some("Info for a specific pet".into()),
        operation_id: Some("showPetById".into()),
        tags: vec!["pets".into()],
        parameters: vec![Parameter::new(ParameterConfig {
            name: "petId".into(),
            location: ParameterLocation::Path,
            required: true,
            description: Some("The id of the pet to retrieve".into()),
            schema: Some(Schema::of_type(SchemaType::String)?.into()),
            ..Default::default()
        })?
        .into()],
        responses: IndexMap::from([
            (
                "200".to_string(),
                json_response(
                    "Expected response to a valid request",
                    Reference::component("schemas", "Pet")?.into(),
                ),
            ),
            error_response(),
        ]),
        ..Default::default()
    })?;

    api(ApiConfig {
        openapi: "3.0.0".into(),
        servers: vec![server(ServerConfig {
            url: "http://petstore.swagger.io/v1".into(),
            ..Default::default()
        })?],
        paths: vec![
            path(PathConfig {
                template: "/pets".into(),
                get: Some(list_pets),
                post: Some(create_pets),
                ..Default::default()
            })?,
            path(PathConfig {
                template: "/pets/{petId}".into(),
                get: Some(show_pet),
                ..Default::default()
            })?,
        ],
        ..ApiConfig::new(info(InfoConfig {
            version: "1.0.0".into(),
            title: "Swagger Petstore".into(),
            license: Some(license(LicenseConfig {
                name: "MIT".into(),
                url: None,
            })?),
            ..Default::default()
        })?)
    })
}

#[test]
fn test_petstore_builds() {
    let api = petstore().unwrap();
    assert_eq!(api.paths().len(), 2);
    assert!(api.advisories().is_empty());
    assert_eq!(
        api.effective_servers()[0].default_url(),
        "http://petstore.swagger.io/v1"
    );
}

#[test]
fn test_petstore_serializes_like_the_reference_document() {
    let expected = r##"
openapi: 3.0.0
info:
  title: Swagger Petstore
  license:
    name: MIT
  version: 1.0.0
servers:
  - url: http://petstore.swagger.io/v1
paths:
  /pets:
    get:
      tags: [pets]
      summary: List all pets
      operationId: listPets
      parameters:
        - name: limit
          in: query
          description: How many items to return at one time (max 100)
          schema:
            type: integer
            format: int32
      responses:
        "200":
          description: A paged array of pets
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Pets"
        default:
          description: unexpected error
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Error"
    post:
      tags: [pets]
      summary: Create a pet
      operationId: createPets
      responses:
        "201":
          description: Null response
        default:
          description: unexpected error
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Error"
  /pets/{petId}:
    get:
      tags: [pets]
      summary: Info for a specific pet
      operationId: showPetById
      parameters:
        - name: petId
          in: path
          required: true
          description: The id of the pet to retrieve
          schema:
            type: string
      responses:
        "200":
          description: Expected response to a valid request
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Pet"
        default:
          description: unexpected error
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Error"
"##;
    let expected: serde_json::Value = serde_yaml::from_str(expected).unwrap();
    let actual = serde_json::to_value(petstore().unwrap()).unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn test_petstore_reads_back() {
    let api = petstore().unwrap();
    let yaml = serde_yaml::to_string(&api).unwrap();
    let parsed: Api = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, api);
    assert_eq!(
        parsed.operation_by_id("showPetById").map(|(p, m, _)| (p.template(), m)),
        Some(("/pets/{petId}", HttpMethod::Get))
    );
}
