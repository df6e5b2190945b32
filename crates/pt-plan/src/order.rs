//! Sizing and performance evaluation order.
//!
//! For a connection `u -> v` the supplier `u` depends on the consumer `v`:
//! a source is sized for the demand of everything it feeds, so consumers come
//! first. The sizing relation keeps only connections whose two ports take part
//! in sizing; the performance relation keeps all of them.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use pt_core::InstanceId;
use pt_graph::Graph;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

/// One step of performance evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Singleton(InstanceId),
    /// Members of one loop, sorted; the external solver iterates them together.
    CycleGroup(Vec<InstanceId>),
}

impl Stage {
    pub fn members(&self) -> &[InstanceId] {
        match self {
            Stage::Singleton(id) => std::slice::from_ref(id),
            Stage::CycleGroup(ids) => ids,
        }
    }

    pub fn is_cycle_group(&self) -> bool {
        matches!(self, Stage::CycleGroup(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationPlan {
    pub sizing_order: Vec<InstanceId>,
    pub performance_stages: Vec<Stage>,
}

impl EvaluationPlan {
    pub fn cycle_groups(&self) -> impl Iterator<Item = &[InstanceId]> + '_ {
        self.performance_stages
            .iter()
            .filter(|s| s.is_cycle_group())
            .map(Stage::members)
    }

    /// Performance order with every cycle group expanded in place.
    pub fn flatten(&self) -> Vec<InstanceId> {
        self.performance_stages
            .iter()
            .flat_map(|s| s.members().iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Sizing,
    Performance,
}

/// Dependency graph over instance indices; an edge `a -> b` means `a` is evaluated before `b`.
fn dependencies(graph: &Graph, relation: Relation) -> DiGraph<usize, ()> {
    let index = graph.index();
    let mut deps = DiGraph::with_capacity(index.len(), graph.connections().len());
    for i in 0..index.len() {
        deps.add_node(i);
    }
    for connection in graph.connections() {
        if relation == Relation::Sizing {
            let in_sizing = |port| graph.port(port).is_some_and(|p| p.sizing);
            if !(in_sizing(&connection.from) && in_sizing(&connection.to)) {
                continue;
            }
        }
        if let (Some(supplier), Some(consumer)) = (
            index.get(&connection.from.instance),
            index.get(&connection.to.instance),
        ) {
            deps.add_edge(NodeIndex::new(consumer), NodeIndex::new(supplier), ());
        }
    }
    deps
}

/// Strongly connected components that form a loop: more than one member, or a self-loop.
/// Members are sorted and groups are ordered by their smallest member.
fn loops(graph: &Graph, deps: &DiGraph<usize, ()>) -> Vec<Vec<InstanceId>> {
    let mut groups: Vec<Vec<InstanceId>> = tarjan_scc(deps)
        .into_iter()
        .filter(|scc| scc.len() > 1 || deps.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut members: Vec<InstanceId> = scc
                .into_iter()
                .map(|n| graph.index().id(deps[n]).clone())
                .collect();
            members.sort();
            members
        })
        .collect();
    groups.sort();
    groups
}

/// Sizing order: Kahn's algorithm, smallest ready instance id first.
pub fn resolve_sizing(graph: &Graph) -> PlanResult<Vec<InstanceId>> {
    let deps = dependencies(graph, Relation::Sizing);
    let ids = graph.index().ids();

    let mut in_degree: Vec<usize> = vec![0; ids.len()];
    for edge in deps.raw_edges() {
        in_degree[edge.target().index()] += 1;
    }
    let mut ready: BTreeSet<(&InstanceId, usize)> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, d)| **d == 0)
        .map(|(i, _)| (&ids[i], i))
        .collect();

    let mut order = Vec::with_capacity(ids.len());
    while let Some((id, i)) = ready.pop_first() {
        order.push(id.clone());
        for next in deps.neighbors(NodeIndex::new(i)) {
            let j = next.index();
            in_degree[j] -= 1;
            if in_degree[j] == 0 {
                ready.insert((&ids[j], j));
            }
        }
    }

    if order.len() < ids.len() {
        let members = loops(graph, &deps).into_iter().next().unwrap_or_default();
        return Err(PlanError::IllegalCycle { members });
    }
    tracing::debug!(graph = graph.name(), order = order.len(), "resolved sizing order");
    Ok(order)
}

/// Performance stages: the condensation of the performance relation in topological order.
///
/// Among stages with no relative dependency the one whose best-ranked member
/// comes first is emitted first. Rank is the position in `hint` when given,
/// ascending instance id otherwise.
pub fn performance_stages(graph: &Graph, hint: Option<&[InstanceId]>) -> PlanResult<Vec<Stage>> {
    let deps = dependencies(graph, Relation::Performance);
    let n = graph.index().len();

    for group in loops(graph, &deps) {
        let illegal = group.iter().any(|id| {
            graph
                .instance(id)
                .is_some_and(|inst| !inst.category.allows_cycles())
        });
        if illegal {
            return Err(PlanError::IllegalCycle { members: group });
        }
    }

    let rank = match hint {
        Some(hint) => hint_rank(graph, &deps, hint)?,
        None => id_rank(graph),
    };

    // Stage index of every instance.
    let sccs = tarjan_scc(&deps);
    let mut component = vec![0usize; n];
    for (c, scc) in sccs.iter().enumerate() {
        for node in scc {
            component[node.index()] = c;
        }
    }

    let mut successors: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); sccs.len()];
    let mut in_degree = vec![0usize; sccs.len()];
    for edge in deps.raw_edges() {
        let (a, b) = (component[edge.source().index()], component[edge.target().index()]);
        if a != b && successors[a].insert(b) {
            in_degree[b] += 1;
        }
    }

    let priority: Vec<usize> = sccs
        .iter()
        .map(|scc| scc.iter().map(|n| rank[n.index()]).min().unwrap_or(usize::MAX))
        .collect();
    let mut ready: BTreeSet<(usize, usize)> = (0..sccs.len())
        .filter(|c| in_degree[*c] == 0)
        .map(|c| (priority[c], c))
        .collect();

    let mut stages = Vec::with_capacity(sccs.len());
    while let Some((_, c)) = ready.pop_first() {
        let scc = &sccs[c];
        let is_loop = scc.len() > 1 || deps.contains_edge(scc[0], scc[0]);
        let mut members: Vec<InstanceId> = scc
            .iter()
            .map(|node| graph.index().id(node.index()).clone())
            .collect();
        members.sort();
        stages.push(if is_loop {
            Stage::CycleGroup(members)
        } else {
            Stage::Singleton(members.remove(0))
        });
        for &next in &successors[c] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.insert((priority[next], next));
            }
        }
    }

    Ok(stages)
}

/// Full evaluation plan: sizing order plus performance stages.
pub fn resolve_performance(
    graph: &Graph,
    hint: Option<&[InstanceId]>,
) -> PlanResult<EvaluationPlan> {
    let sizing_order = resolve_sizing(graph)?;
    let performance_stages = performance_stages(graph, hint)?;
    tracing::info!(
        graph = graph.name(),
        stages = performance_stages.len(),
        cycle_groups = performance_stages.iter().filter(|s| s.is_cycle_group()).count(),
        "resolved evaluation plan"
    );
    Ok(EvaluationPlan {
        sizing_order,
        performance_stages,
    })
}

fn id_rank(graph: &Graph) -> Vec<usize> {
    let ids = graph.index().ids();
    let mut sorted: Vec<usize> = (0..ids.len()).collect();
    sorted.sort_by(|a, b| ids[*a].cmp(&ids[*b]));
    let mut rank = vec![0; ids.len()];
    for (position, i) in sorted.into_iter().enumerate() {
        rank[i] = position;
    }
    rank
}

/// Position of every instance in the hint, after checking that the hint is a
/// permutation of the instances that never puts a dependent before a dependency
/// outside its own loop.
fn hint_rank(
    graph: &Graph,
    deps: &DiGraph<usize, ()>,
    hint: &[InstanceId],
) -> PlanResult<Vec<usize>> {
    let index = graph.index();
    let inconsistent = |reason: String| PlanError::InconsistentHint { reason };

    let mut rank: Vec<Option<usize>> = vec![None; index.len()];
    for (position, id) in hint.iter().enumerate() {
        let i = index
            .get(id)
            .ok_or_else(|| inconsistent(format!("'{id}' is not an instance")))?;
        if rank[i].replace(position).is_some() {
            return Err(inconsistent(format!("'{id}' is listed twice")));
        }
    }
    let rank: Vec<usize> = rank
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.ok_or_else(|| inconsistent(format!("'{}' is missing", index.id(i)))))
        .collect::<PlanResult<_>>()?;

    let mut component: HashMap<usize, usize> = HashMap::new();
    for (c, scc) in tarjan_scc(deps).into_iter().enumerate() {
        for node in scc {
            component.insert(node.index(), c);
        }
    }
    for edge in deps.raw_edges() {
        let (before, after) = (edge.source().index(), edge.target().index());
        if component.get(&before) != component.get(&after) && rank[before] > rank[after] {
            return Err(inconsistent(format!(
                "'{}' is placed before '{}', which it depends on",
                index.id(after),
                index.id(before)
            )));
        }
    }
    Ok(rank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_registry::Registry;
    use pt_schema::{ArchitectureDoc, ComponentDef, ConnectionDef};

    fn ids(list: &[&str]) -> Vec<InstanceId> {
        list.iter().map(|s| InstanceId::from(*s)).collect()
    }

    fn chain() -> ArchitectureDoc {
        let mut doc = ArchitectureDoc::new("chain");
        for (id, tag) in [
            ("battery", "battery_pack"),
            ("bus", "DC_bus"),
            ("inverter", "inverter"),
            ("motor", "PMSM"),
            ("prop", "propeller"),
        ] {
            doc.components.push(ComponentDef::new(id, tag));
        }
        for (a, p, b, q) in [
            ("battery", "dc_out", "bus", "input_1"),
            ("bus", "output_1", "inverter", "dc_in"),
            ("inverter", "ac_out", "motor", "ac_in"),
            ("motor", "shaft_out", "prop", "shaft_in"),
        ] {
            doc.connections.push(ConnectionDef::new(a, p, b, q));
        }
        doc
    }

    fn graph(doc: &ArchitectureDoc) -> Graph {
        pt_graph::build(doc, &Registry::standard()).unwrap()
    }

    #[test]
    fn loads_are_sized_first() {
        let order = resolve_sizing(&graph(&chain())).unwrap();
        assert_eq!(order, ids(&["prop", "motor", "inverter", "bus", "battery"]));
    }

    #[test]
    fn motor_generator_loop_is_illegal() {
        let mut doc = ArchitectureDoc::new("loop");
        doc.components.push(ComponentDef::new("motor", "PMSM"));
        doc.components.push(ComponentDef::new("generator", "generator"));
        doc.connections
            .push(ConnectionDef::new("motor", "shaft_out", "generator", "shaft_in"));
        doc.connections
            .push(ConnectionDef::new("generator", "ac_out", "motor", "ac_in"));
        let g = graph(&doc);

        let expected = PlanError::IllegalCycle {
            members: ids(&["generator", "motor"]),
        };
        assert_eq!(resolve_sizing(&g).unwrap_err(), expected);
        assert_eq!(performance_stages(&g, None).unwrap_err(), expected);
    }

    #[test]
    fn bus_ring_is_a_legal_performance_loop() {
        let mut doc = ArchitectureDoc::new("ring");
        doc.components.push(ComponentDef::new("bus_a", "DC_bus"));
        doc.components.push(ComponentDef::new("bus_b", "DC_bus"));
        doc.connections
            .push(ConnectionDef::new("bus_a", "output_1", "bus_b", "input_1"));
        doc.connections
            .push(ConnectionDef::new("bus_b", "output_1", "bus_a", "input_1"));
        let g = graph(&doc);

        assert!(matches!(resolve_sizing(&g), Err(PlanError::IllegalCycle { .. })));
        let stages = performance_stages(&g, None).unwrap();
        assert_eq!(stages, [Stage::CycleGroup(ids(&["bus_a", "bus_b"]))]);
    }

    #[test]
    fn hint_must_be_a_permutation() {
        let g = graph(&chain());
        let short = ids(&["prop", "motor"]);
        assert!(matches!(
            performance_stages(&g, Some(&short)),
            Err(PlanError::InconsistentHint { .. })
        ));
        let twice = ids(&["prop", "motor", "inverter", "bus", "bus"]);
        assert!(matches!(
            performance_stages(&g, Some(&twice)),
            Err(PlanError::InconsistentHint { .. })
        ));
    }

    #[test]
    fn hint_against_dependencies_is_rejected() {
        let g = graph(&chain());
        let backwards = ids(&["battery", "bus", "inverter", "motor", "prop"]);
        let err = performance_stages(&g, Some(&backwards)).unwrap_err();
        assert!(matches!(err, PlanError::InconsistentHint { .. }), "{err}");
    }

    #[test]
    fn flatten_and_groups() {
        let plan = EvaluationPlan {
            sizing_order: vec![],
            performance_stages: vec![
                Stage::Singleton("a".into()),
                Stage::CycleGroup(ids(&["b", "c"])),
            ],
        };
        assert_eq!(plan.flatten(), ids(&["a", "b", "c"]));
        assert_eq!(plan.cycle_groups().collect::<Vec<_>>(), [ids(&["b", "c"]).as_slice()]);
    }
}
