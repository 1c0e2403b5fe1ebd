use super::*;
use std::collections::HashMap;

fn info(name: &str, deps: &[&str], load_order: i64) -> ComponentInfo {
    ComponentInfo {
        name: name.to_string(),
        display_name: name.to_string(),
        description: String::new(),
        version: "1.0.0".to_string(),
        author: "test".to_string(),
        website: String::new(),
        dependencies: deps.iter().map(|s| s.to_string()).collect(),
        soft_dependencies: Vec::new(),
        aetherius_version: ">=1.0.0".to_string(),
        category: "general".to_string(),
        permissions: Vec::new(),
        config_schema: HashMap::new(),
        default_config: HashMap::new(),
        tags: Vec::new(),
        license: "MIT".to_string(),
        min_ram: 0,
        load_order,
        provides_web_interface: false,
        web_routes: Vec::new(),
        api_endpoints: Vec::new(),
    }
}

fn set(infos: Vec<ComponentInfo>) -> HashMap<String, ComponentInfo> {
    infos.into_iter().map(|i| (i.name.clone(), i)).collect()
}

#[test]
fn orders_dependencies_before_dependents() {
    let infos = set(vec![info("web", &["database"], 0), info("database", &[], 0)]);
    let order = topological_order(&infos).expect("acyclic");
    assert_eq!(order, vec!["database".to_string(), "web".to_string()]);
}

#[test]
fn ties_break_on_load_order_then_name() {
    let infos = set(vec![info("b", &[], 5), info("a", &[], 1), info("c", &[], 1)]);
    let order = topological_order(&infos).expect("acyclic");
    assert_eq!(order, vec!["a".to_string(), "c".to_string(), "b".to_string()]);
}

#[test]
fn rejects_a_cycle() {
    let infos = set(vec![info("a", &["b"], 0), info("b", &["a"], 0)]);
    let err = topological_order(&infos).expect_err("cyclic");
    assert!(matches!(err, ComponentError::CircularDependency(_)));
}

#[test]
fn ignores_a_dependency_on_an_unknown_component() {
    let infos = set(vec![info("a", &["ghost"], 0)]);
    let order = topological_order(&infos).expect("unknown deps are dropped, not fatal");
    assert_eq!(order, vec!["a".to_string()]);
}
