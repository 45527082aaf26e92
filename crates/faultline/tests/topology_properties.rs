//! Property tests for the topology store and the analysis engines.

use faultline::analysis::{
    affected_closure, analyze_failure_domains, analyze_health, analyze_impact, partition,
};
use faultline::domain::{Component, ComponentId, ComponentStatus, ComponentType};
use faultline::topology::Topology;
use petgraph::unionfind::UnionFind;
use petgraph::visit::{Dfs, Reversed};
use proptest::prelude::*;
use std::collections::BTreeSet;

const MAX_NODES: usize = 10;

fn id(i: usize) -> ComponentId {
    ComponentId::new(format!("c{i}"))
}

fn status_strategy() -> impl Strategy<Value = ComponentStatus> {
    prop::sample::select(ComponentStatus::ALL.to_vec())
}

/// A node count, one status per node, and edges `(dependent, dependency)`.
fn topology_strategy() -> impl Strategy<Value = (Vec<ComponentStatus>, Vec<(usize, usize)>)> {
    (1..=MAX_NODES).prop_flat_map(|n| {
        (
            prop::collection::vec(status_strategy(), n),
            prop::collection::vec((0..n, 0..n), 0..n * 3),
        )
    })
}

fn build(statuses: &[ComponentStatus], edges: &[(usize, usize)]) -> Topology {
    let mut topology = Topology::new();
    for (i, status) in statuses.iter().enumerate() {
        topology.add_component(Component::new(id(i), ComponentType::Service).with_status(*status));
    }
    for &(from, to) in edges {
        topology.add_relationship(&id(from), &id(to));
    }
    topology
}

#[derive(Debug, Clone)]
enum Op {
    Add(usize, Vec<usize>),
    Remove(usize),
    Link(usize, usize),
    Unlink(usize, usize),
    Status(usize, ComponentStatus),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Ids range a little past the live set so unknown-id no-ops are exercised.
    let ids = 0..MAX_NODES + 2;
    prop_oneof![
        (ids.clone(), prop::collection::vec(ids.clone(), 0..4)).prop_map(|(i, deps)| Op::Add(i, deps)),
        ids.clone().prop_map(Op::Remove),
        (ids.clone(), ids.clone()).prop_map(|(a, b)| Op::Link(a, b)),
        (ids.clone(), ids.clone()).prop_map(|(a, b)| Op::Unlink(a, b)),
        (ids, status_strategy()).prop_map(|(i, s)| Op::Status(i, s)),
    ]
}

fn apply(topology: &mut Topology, op: &Op) {
    match op {
        Op::Add(i, deps) => topology.add_component(
            Component::new(id(*i), ComponentType::Container).depends_on(deps.iter().map(|d| id(*d))),
        ),
        Op::Remove(i) => {
            topology.remove_component(&id(*i));
        }
        Op::Link(a, b) => {
            topology.add_relationship(&id(*a), &id(*b));
        }
        Op::Unlink(a, b) => {
            topology.remove_relationship(&id(*a), &id(*b));
        }
        Op::Status(i, s) => {
            topology.update_status(&id(*i), *s);
        }
    }
}

proptest! {
    #[test]
    fn prop_mutations_keep_edges_bidirectional(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut topology = Topology::new();
        for op in &ops {
            apply(&mut topology, op);
            prop_assert!(topology.is_consistent(), "asymmetric after {:?}", op);
        }
    }

    #[test]
    fn prop_removal_leaves_no_reference(
        (statuses, edges) in topology_strategy(),
        victim in 0..MAX_NODES,
    ) {
        let mut topology = build(&statuses, &edges);
        let victim = id(victim % statuses.len());

        topology.remove_component(&victim);

        prop_assert!(!topology.contains(&victim));
        for component in topology.components() {
            prop_assert!(!component.dependency_ids.contains(&victim));
            prop_assert!(!component.dependent_ids.contains(&victim));
        }
    }

    #[test]
    fn prop_add_relationship_is_idempotent(
        (statuses, edges) in topology_strategy(),
        a in 0..MAX_NODES,
        b in 0..MAX_NODES,
    ) {
        let mut topology = build(&statuses, &edges);
        let (a, b) = (id(a % statuses.len()), id(b % statuses.len()));

        topology.add_relationship(&a, &b);
        let edges_once = topology.edge_count();
        let changed = topology.add_relationship(&a, &b);

        prop_assert!(!changed);
        prop_assert_eq!(topology.edge_count(), edges_once);
    }

    #[test]
    fn prop_closure_matches_reverse_dfs(
        (statuses, edges) in topology_strategy(),
        source in 0..MAX_NODES,
    ) {
        let topology = build(&statuses, &edges);
        let source = id(source % statuses.len());

        let closure = affected_closure(&topology, &source).unwrap();

        let view = topology.to_graph();
        let start = view.node(&source).unwrap();
        let reversed = Reversed(&view.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut expected = BTreeSet::new();
        while let Some(node) = dfs.next(reversed) {
            expected.insert(view.graph[node].clone());
        }

        let actual: BTreeSet<ComponentId> = closure.sorted_ids().into_iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_impact_is_well_formed(
        (statuses, edges) in topology_strategy(),
        source in 0..MAX_NODES,
    ) {
        let topology = build(&statuses, &edges);
        let source = id(source % statuses.len());

        let result = analyze_impact(&topology, &source);

        prop_assert!((0.0..=1.0).contains(&result.impact_score));
        prop_assert!(result.affected_components.contains(&source));
        prop_assert!(result.affected_components.windows(2).all(|w| w[0] < w[1]));

        // Failure domains partition the affected set.
        let mut covered: Vec<ComponentId> = result.failure_domains.concat();
        covered.sort();
        prop_assert_eq!(covered, result.affected_components.clone());
    }

    #[test]
    fn prop_partition_independent_of_edge_order(
        (statuses, edges, shuffled) in topology_strategy().prop_flat_map(|(statuses, edges)| {
            let shuffled = Just(edges.clone()).prop_shuffle();
            (Just(statuses), Just(edges), shuffled)
        }),
    ) {
        let first = build(&statuses, &edges);
        let second = build(&statuses, &shuffled);
        let all: Vec<ComponentId> = (0..statuses.len()).map(id).collect();

        let mut reversed_ids = all.clone();
        reversed_ids.reverse();

        let expected = partition(&first, &all);
        prop_assert_eq!(&partition(&second, &all), &expected);
        prop_assert_eq!(&partition(&first, &reversed_ids), &expected);

        let forward = analyze_failure_domains(&first, &all);
        let backward = analyze_failure_domains(&second, &reversed_ids);
        prop_assert_eq!(forward.domain_sets(), backward.domain_sets());
        prop_assert_eq!(forward.domain_sets().len(), expected.len());
    }

    #[test]
    fn prop_partition_matches_union_find(
        (statuses, edges) in topology_strategy(),
        mask in prop::collection::vec(any::<bool>(), MAX_NODES),
    ) {
        let topology = build(&statuses, &edges);
        let subset: Vec<usize> = (0..statuses.len()).filter(|&i| mask[i]).collect();
        let subset_ids: Vec<ComponentId> = subset.iter().map(|&i| id(i)).collect();

        let mut reference = UnionFind::<usize>::new(statuses.len());
        for &(a, b) in &edges {
            if mask[a] && mask[b] {
                reference.union(a, b);
            }
        }

        let domains = partition(&topology, &subset_ids);
        let domain_of = |component: &ComponentId| {
            domains.iter().position(|d| d.contains(component))
        };
        for &a in &subset {
            for &b in &subset {
                prop_assert_eq!(
                    domain_of(&id(a)) == domain_of(&id(b)),
                    reference.equiv(a, b),
                    "c{} / c{}", a, b
                );
            }
        }
    }

    #[test]
    fn prop_health_is_union_of_unhealthy_closures((statuses, edges) in topology_strategy()) {
        let topology = build(&statuses, &edges);

        let result = analyze_health(&topology);

        let mut expected = BTreeSet::new();
        let mut sources = 0;
        for (i, status) in statuses.iter().enumerate() {
            if status.is_problematic() {
                sources += 1;
                let closure = affected_closure(&topology, &id(i)).unwrap();
                expected.extend(closure.sorted_ids());
            }
        }

        prop_assert_eq!(result.affected_set(), expected);
        prop_assert_eq!(result.failure_domains.len(), sources);
        prop_assert!((0.0..=1.0).contains(&result.impact_score));
    }
}
