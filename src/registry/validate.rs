// src/registry/validate.rs

use anyhow::{anyhow, Result};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::registry::entry::Entry;
use crate::registry::store::Registry;

/// Pre-flight diagnostic pass over a registry's static operation graph.
///
/// Checks:
/// - every declared dependency refers to a registered alias
/// - no operation depends on itself
/// - the declared dependency graph has no cycles
///
/// The resolver detects cycles dynamically per resolution path regardless;
/// this pass exists so setup code can surface declaration mistakes before
/// the first resolve. A registry that fails validation can still serve
/// requests that avoid the offending subgraph.
pub fn validate_registry<V>(registry: &Registry<V>) -> Result<()>
where
    V: Clone + Send + Sync + 'static,
{
    validate_references(registry)?;
    validate_acyclic(registry)?;
    Ok(())
}

fn validate_references<V>(registry: &Registry<V>) -> Result<()>
where
    V: Clone + Send + Sync + 'static,
{
    for (alias, entry) in registry.entries() {
        let Entry::Operation(op) = entry else {
            continue;
        };
        for dep in op.dependencies() {
            if dep.as_str() == alias {
                return Err(anyhow!("operation '{}' cannot depend on itself", alias));
            }
            if registry.lookup(dep).is_none() {
                return Err(anyhow!(
                    "operation '{}' has unknown dependency '{}'",
                    alias,
                    dep
                ));
            }
        }
    }
    Ok(())
}

fn validate_acyclic<V>(registry: &Registry<V>) -> Result<()>
where
    V: Clone + Send + Sync + 'static,
{
    // Edge direction: dependency -> dependent, matching resolution order.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for (alias, _) in registry.entries() {
        graph.add_node(alias);
    }

    for (alias, entry) in registry.entries() {
        let Entry::Operation(op) = entry else {
            continue;
        };
        for dep in op.dependencies() {
            graph.add_edge(dep.as_str(), alias, ());
        }
    }

    // A topological sort fails exactly when there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(anyhow!(
                "cycle detected in operation graph involving '{}'",
                node
            ))
        }
    }
}
