use super::*;

fn minimal_info() -> ComponentInfo {
    ComponentInfo {
        name: "web".to_string(),
        display_name: "Web".to_string(),
        description: "a component".to_string(),
        version: "1.0.0".to_string(),
        author: "alice".to_string(),
        website: String::new(),
        dependencies: Vec::new(),
        soft_dependencies: Vec::new(),
        aetherius_version: ">=1.0.0".to_string(),
        category: "general".to_string(),
        permissions: Vec::new(),
        config_schema: HashMap::new(),
        default_config: HashMap::new(),
        tags: Vec::new(),
        license: "MIT".to_string(),
        min_ram: 0,
        load_order: 0,
        provides_web_interface: false,
        web_routes: Vec::new(),
        api_endpoints: Vec::new(),
    }
}

#[test]
fn validate_accepts_a_fully_populated_info() {
    assert!(minimal_info().validate().is_ok());
}

#[test]
fn validate_rejects_a_missing_required_field() {
    let mut info = minimal_info();
    info.author = String::new();
    assert!(info.validate().is_err());
}

#[test]
fn discovered_component_starts_in_the_discovered_state() {
    let component = Component::discovered(minimal_info(), std::path::PathBuf::from("/tmp/web"));
    assert_eq!(component.state, ComponentState::Discovered);
    assert!(component.failure_reason.is_none());
}

#[test]
fn mark_failed_records_the_reason() {
    let mut component = Component::discovered(minimal_info(), std::path::PathBuf::from("/tmp/web"));
    component.mark_failed("missing dependency database");
    assert_eq!(component.state, ComponentState::Failed);
    assert_eq!(component.failure_reason.as_deref(), Some("missing dependency database"));
}
