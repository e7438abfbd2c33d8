use apidesign_core::{
    parse_design_yaml, validate_design, ActionDefinition, ApiDefinition, AttributeDefinition,
    DataType, ResourceDefinition, ResponseDefinition, RouteDefinition, VersionScope,
};
use pretty_assertions::assert_eq;

#[test]
fn test_widget_wildcard_becomes_path_param() {
    let mut api = ApiDefinition::new("shop");
    api.add_resource(
        ResourceDefinition::new("widgets").with_action(
            ActionDefinition::new("show").with_route(RouteDefinition::get("/widgets/:id")),
        ),
    )
    .unwrap();
    let api = api.finalize();

    let widgets = &api.resources["widgets"];
    let show = &widgets.actions["show"];
    let params = show.params.as_ref().unwrap();
    assert_eq!(params.field("id").unwrap().data_type, DataType::String);
    assert!(params.is_non_zero("id"));
    assert!(show.query_params().unwrap().field("id").is_none());
    assert_eq!(
        show.path_params(widgets, &api, &api.default_scope).field_names(),
        vec!["id"]
    );
}

#[test]
fn test_resource_response_completed_by_global() {
    let mut api = ApiDefinition::new("shop");
    api.add_response(ResponseDefinition::new("OK", 200)).unwrap();
    api.add_resource(
        ResourceDefinition::new("widgets")
            .with_response(ResponseDefinition::new("OK", 0))
            .with_action(
                ActionDefinition::new("show")
                    .with_route(RouteDefinition::get("/:id"))
                    .with_response(ResponseDefinition::new("OK", 0)),
            ),
    )
    .unwrap();
    let api = api.finalize();
    let ok = &api.resources["widgets"].actions["show"].responses["OK"];
    assert_eq!(ok.name, "OK");
    assert_eq!(ok.status, 200);
}

#[test]
fn test_action_fields_are_never_overridden() {
    let mut api = ApiDefinition::new("shop");
    api.add_response(
        ResponseDefinition::new("Created", 299)
            .with_description("global")
            .with_header("Location", AttributeDefinition::string()),
    )
    .unwrap();
    api.add_resource(
        ResourceDefinition::new("widgets").with_action(
            ActionDefinition::new("create")
                .with_route(RouteDefinition::post(""))
                .with_response(
                    ResponseDefinition::new("Created", 0)
                        .with_description("mine")
                        .with_header("Location", AttributeDefinition::new(DataType::Integer)),
                ),
        ),
    )
    .unwrap();
    let api = api.finalize();
    let created = &api.resources["widgets"].actions["create"].responses["Created"];
    assert_eq!(created.status, 299);
    assert_eq!(created.description, "mine");
    assert_eq!(
        created
            .headers
            .as_ref()
            .unwrap()
            .field("Location")
            .unwrap()
            .data_type,
        DataType::Integer
    );
}

#[test]
fn test_nested_resource_full_path() {
    let mut api = ApiDefinition::new("family");
    api.add_resource(
        ResourceDefinition::new("child")
            .with_parent("parent")
            .with_base_path("/children")
            .with_action(ActionDefinition::new("show").with_route(RouteDefinition::get("/:childID"))),
    )
    .unwrap();
    api.add_resource(
        ResourceDefinition::new("parent")
            .with_base_path("/parents")
            .with_action(ActionDefinition::new("show").with_route(RouteDefinition::get("/:parentID"))),
    )
    .unwrap();
    assert!(validate_design(&api).is_ok());
    let api = api.finalize();
    let child = &api.resources["child"];
    assert_eq!(
        child.full_path(&api, &api.default_scope),
        "/parents/:parentID/children"
    );
    let show = &child.actions["show"];
    let params = show.params.as_ref().unwrap();
    assert_eq!(params.field_names(), vec!["parentID", "childID"]);
    assert!(params.is_non_zero("parentID"));
}

#[test]
fn test_enumeration_is_alphabetical() {
    let mut api = ApiDefinition::new("zoo");
    for name in ["zebra", "apple", "mango"] {
        api.add_resource(ResourceDefinition::new(name)).unwrap();
    }
    let api = api.finalize();
    let mut names = Vec::new();
    api.iterate_resources(|r| {
        names.push(r.name.clone());
        Ok::<_, String>(())
    })
    .unwrap();
    assert_eq!(names, vec!["apple", "mango", "zebra"]);
}

#[test]
fn test_visitor_error_is_returned_unchanged() {
    #[derive(Debug, PartialEq)]
    struct Stop(&'static str);

    let mut api = ApiDefinition::new("zoo");
    for name in ["zebra", "apple", "mango"] {
        api.add_resource(ResourceDefinition::new(name)).unwrap();
    }
    let mut visited = 0;
    let res = api.iterate_resources(|r| {
        visited += 1;
        if r.name == "apple" {
            Err(Stop("apple"))
        } else {
            Ok(())
        }
    });
    assert_eq!(res, Err(Stop("apple")));
    assert_eq!(visited, 1);
}

#[test]
fn test_versioned_routes_partition() {
    let mut api = ApiDefinition::new("shop");
    api.add_version(VersionScope::new("1.0").with_base_path("/v1"))
        .unwrap();
    api.add_version(VersionScope::new("2.0").with_base_path("/v2/:region"))
        .unwrap();
    api.add_resource(
        ResourceDefinition::new("widgets")
            .with_version("1.0")
            .with_version("2.0")
            .with_base_path("/widgets")
            .with_action(
                ActionDefinition::new("list")
                    .with_route(RouteDefinition::get(""))
                    .with_param("region", AttributeDefinition::string())
                    .with_param("page", AttributeDefinition::new(DataType::Integer)),
            ),
    )
    .unwrap();
    let api = api.finalize();
    let list = &api.resources["widgets"].actions["list"];
    let params = list.params.as_ref().unwrap();
    // path parameter under 2.0 only, still never a query parameter
    assert!(params.is_non_zero("region"));
    assert_eq!(list.query_params().unwrap().field_names(), vec!["page"]);
}

#[test]
fn test_document_round_trip_through_finalization() {
    let yaml = r#"
name: cellar
base_path: /api
resources:
  accounts:
    base_path: /accounts
    actions:
      show:
        routes: [{ verb: GET, path: "/:accountID" }]
  bottles:
    parent_name: accounts
    base_path: /bottles
    actions:
      show:
        routes: [{ verb: GET, path: "/:bottleID" }]
        params:
          type:
            object:
              view: { type: string }
"#;
    let api = parse_design_yaml(yaml).unwrap();
    validate_design(&api).unwrap();
    let api = api.finalize();
    let bottles = &api.resources["bottles"];
    assert_eq!(
        bottles.uri_template(&api, &api.default_scope),
        "/api/accounts/:accountID/bottles/:bottleID"
    );
    let show = &bottles.actions["show"];
    assert_eq!(
        show.params.as_ref().unwrap().field_names(),
        vec!["view", "accountID", "bottleID"]
    );
    assert_eq!(show.query_params().unwrap().field_names(), vec!["view"]);

    let json = api.to_json_value().unwrap();
    assert_eq!(json["resources"]["bottles"]["parent_name"], "accounts");
}

#[test]
fn test_collection_response_validates_and_finalizes() {
    let yaml = r#"
name: cellar
media_types:
  application/vnd.bottle+json:
    type_name: Bottle
    attribute:
      type:
        object:
          id: { type: integer }
collections:
  - application/vnd.bottle+json
resources:
  bottles:
    base_path: /bottles
    actions:
      list:
        routes: [{ verb: GET, path: "" }]
        responses:
          OK:
            media_type: "application/vnd.bottle+json; type=collection"
"#;
    let api = parse_design_yaml(yaml).unwrap();
    validate_design(&api).unwrap();
    let api = api.finalize();
    let collection = api
        .media_type_with_identifier("application/vnd.bottle+json; type=collection")
        .unwrap();
    assert_eq!(collection.user_type.type_name, "BottleCollection");
}
