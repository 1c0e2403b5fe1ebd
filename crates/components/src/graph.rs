// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency-graph ordering: Kahn's algorithm over hard dependencies,
//! ties broken by `(load_order, name)`.

use crate::errors::ComponentError;
use aetherius_core::ComponentInfo;
use std::collections::{BTreeMap, HashMap};

/// Returns component names in an order where every hard dependency comes
/// before its dependents. Dependencies on a name outside `infos` are
/// logged and otherwise ignored, matching discovery-time partial sets.
pub fn topological_order(infos: &HashMap<String, ComponentInfo>) -> Result<Vec<String>, ComponentError> {
    let mut forward: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = infos.keys().map(|n| (n.as_str(), 0)).collect();

    for info in infos.values() {
        for dep in &info.dependencies {
            if infos.contains_key(dep) {
                forward.entry(dep.as_str()).or_default().push(info.name.as_str());
                *in_degree.get_mut(info.name.as_str()).expect("name registered above") += 1;
            } else {
                tracing::warn!(component = %info.name, dependency = %dep, "depends on unknown component");
            }
        }
    }

    // BTreeMap keyed on (load_order, name) keeps the ready queue ordered
    // without a sort-on-every-pop, and ties break on name ascending.
    let mut ready: BTreeMap<(i64, String), ()> = BTreeMap::new();
    for name in in_degree.iter().filter(|(_, deg)| **deg == 0).map(|(n, _)| *n) {
        let info = &infos[name];
        ready.insert((info.load_order, name.to_string()), ());
    }

    let mut order = Vec::with_capacity(infos.len());
    while let Some((&(_, ref name), _)) = ready.iter().next().map(|(k, v)| (k, *v)) {
        let name = name.clone();
        ready.remove(&(infos[&name].load_order, name.clone()));
        order.push(name.clone());

        if let Some(dependents) = forward.get(name.as_str()) {
            for &dependent in dependents {
                let degree = in_degree.get_mut(dependent).expect("dependent registered above");
                *degree -= 1;
                if *degree == 0 {
                    let info = &infos[dependent];
                    ready.insert((info.load_order, dependent.to_string()), ());
                }
            }
        }
    }

    if order.len() != infos.len() {
        let stuck = infos
            .keys()
            .find(|name| !order.contains(name))
            .cloned()
            .unwrap_or_default();
        return Err(ComponentError::CircularDependency(stuck));
    }

    Ok(order)
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
