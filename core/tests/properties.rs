use apidesign_core::design::extract_wildcards;
use apidesign_core::{
    canonical_identifier, ActionDefinition, ApiDefinition, AttributeDefinition, ResourceDefinition,
    RouteDefinition, VersionScope,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        "[a-z]{1,6}".prop_map(|s| format!(":{}", s)),
        Just(String::new()),
        Just(".".to_string()),
    ]
}

fn path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 0..4).prop_map(|segs| format!("/{}", segs.join("/")))
}

fn design(
    base: String,
    parent_route: String,
    route: String,
    declared: Vec<String>,
) -> ApiDefinition {
    let mut api = ApiDefinition::new("props");
    api.default_scope.base_path = base;
    api.add_version(VersionScope::new("1.0").with_base_path("/v1/:tenant"))
        .unwrap();
    api.add_resource(
        ResourceDefinition::new("parent")
            .with_base_path("/parents")
            .with_action(ActionDefinition::new("show").with_route(RouteDefinition::get(parent_route))),
    )
    .unwrap();
    let mut action = ActionDefinition::new("act").with_route(RouteDefinition::get(route));
    for name in declared {
        action = action.with_param(name, AttributeDefinition::string());
    }
    api.add_resource(
        ResourceDefinition::new("child")
            .with_parent("parent")
            .with_base_path("/children")
            .with_action(action),
    )
    .unwrap();
    api
}

proptest! {
    #[test]
    fn prop_full_path_is_stable(base in path(), parent_route in path(), route in path()) {
        let api = design(base, parent_route, route, Vec::new());
        let child = &api.resources["child"];
        for scope in api.scopes() {
            let once = child.full_path(&api, scope);
            prop_assert_eq!(child.full_path(&api, scope), once.clone());
            prop_assert!(!once.contains("//"));
        }
    }

    #[test]
    fn prop_params_partition(
        base in path(),
        parent_route in path(),
        route in path(),
        declared in prop::collection::vec("[a-z]{1,6}", 0..4),
    ) {
        let api = design(base, parent_route, route, declared.clone()).finalize();
        let child = &api.resources["child"];
        let act = &child.actions["act"];

        let mut wildcards = BTreeSet::new();
        for scope in api.scopes() {
            for r in &act.routes {
                wildcards.extend(extract_wildcards(&r.full_path(child, &api, scope)));
            }
        }

        let params: BTreeSet<String> = act
            .params
            .as_ref()
            .map(|p| p.field_names().into_iter().collect())
            .unwrap_or_default();
        let query: BTreeSet<String> = act
            .query_params()
            .map(|p| p.field_names().into_iter().collect())
            .unwrap_or_default();

        // every wildcard is declared after finalization
        prop_assert!(wildcards.is_subset(&params));
        prop_assert!(query.is_disjoint(&wildcards));
        let union: BTreeSet<String> = query.union(&wildcards).cloned().collect();
        prop_assert_eq!(union, params.clone());
        for name in &declared {
            prop_assert!(params.contains(name));
        }
        for name in &wildcards {
            prop_assert!(act.params.as_ref().unwrap().is_non_zero(name));
        }
    }

    #[test]
    fn prop_canonical_identifier_idempotent(
        sub in "[a-z]{1,8}(\\.[a-z]{1,5})?",
        suffix in prop_oneof![Just(""), Just("+json"), Just("+xml")],
        param in prop_oneof![Just(""), Just("; Charset=utf-8"), Just("; type=collection")],
    ) {
        let id = format!("application/{}{}{}", sub, suffix, param);
        let canonical = canonical_identifier(&id);
        prop_assert_eq!(canonical_identifier(&canonical), canonical.clone());
        let bare = format!("application/{}{}", sub, param);
        prop_assert_eq!(canonical, canonical_identifier(&bare));
    }
}
