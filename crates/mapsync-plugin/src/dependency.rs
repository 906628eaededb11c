//! Dependency checker: pure functions over a snapshot of the plugin store.
//!
//! The store hands these functions a slice of [`DependencyNode`]s so the
//! rules can be evaluated (and tested) without touching plugin instances.

use std::collections::HashSet;

use crate::error::PluginError;

/// Dependency-relevant view of one registered plugin.
#[derive(Debug, Clone, Copy)]
pub struct DependencyNode<'a> {
    /// Plugin name.
    pub name: &'a str,
    /// Declared dependencies, in declaration order.
    pub dependencies: &'a [String],
    /// Whether the plugin is currently enabled.
    pub enabled: bool,
}

/// Returns the first declared dependency that is not in the enabled set.
pub fn first_missing_dependency(dependencies: &[String], enabled: &[String]) -> Option<String> {
    dependencies
        .iter()
        .find(|dep| !enabled.iter().any(|name| name == *dep))
        .cloned()
}

/// Returns every registered plugin that lists `name` as a dependency, sorted.
pub fn dependents_of(nodes: &[DependencyNode<'_>], name: &str) -> Vec<String> {
    let mut dependents: Vec<String> = nodes
        .iter()
        .filter(|node| node.dependencies.iter().any(|dep| dep == name))
        .map(|node| node.name.to_string())
        .collect();
    dependents.sort();
    dependents
}

/// Like [`dependents_of`], restricted to enabled plugins.
pub fn enabled_dependents_of(nodes: &[DependencyNode<'_>], name: &str) -> Vec<String> {
    let mut dependents: Vec<String> = nodes
        .iter()
        .filter(|node| node.enabled && node.dependencies.iter().any(|dep| dep == name))
        .map(|node| node.name.to_string())
        .collect();
    dependents.sort();
    dependents
}

/// Orders `requested` so that every requested dependency precedes its
/// dependents.
///
/// Dependencies that are already enabled, or that were not requested, impose
/// no ordering; `enable` reports them if they are still missing. Unknown
/// names are kept in place so `enable` can report them. Duplicates are
/// dropped. Apart from dependency constraints the requested order is kept.
pub fn resolve_enable_order(
    nodes: &[DependencyNode<'_>],
    requested: &[String],
) -> Result<Vec<String>, PluginError> {
    let wanted: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let mut order = Vec::with_capacity(requested.len());
    let mut done: HashSet<String> = HashSet::new();
    let mut stack: Vec<String> = Vec::new();

    for name in requested {
        visit(nodes, &wanted, name, &mut stack, &mut done, &mut order)?;
    }

    Ok(order)
}

fn visit(
    nodes: &[DependencyNode<'_>],
    wanted: &HashSet<&str>,
    name: &str,
    stack: &mut Vec<String>,
    done: &mut HashSet<String>,
    order: &mut Vec<String>,
) -> Result<(), PluginError> {
    if done.contains(name) {
        return Ok(());
    }

    if let Some(start) = stack.iter().position(|entry| entry == name) {
        let mut plugins = stack[start..].to_vec();
        plugins.push(name.to_string());
        return Err(PluginError::DependencyCycle { plugins });
    }

    stack.push(name.to_string());

    if let Some(node) = nodes.iter().find(|node| node.name == name) {
        for dep in node.dependencies {
            let dep_enabled = nodes.iter().any(|n| n.name == dep && n.enabled);
            if wanted.contains(dep.as_str()) && !dep_enabled {
                visit(nodes, wanted, dep, stack, done, order)?;
            }
        }
    }

    stack.pop();
    done.insert(name.to_string());
    order.push(name.to_string());
    Ok(())
}
