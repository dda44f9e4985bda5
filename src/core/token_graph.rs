use super::types::{Graph, Pair, RoutePlan};
use std::collections::{HashMap, HashSet, VecDeque};

impl Graph {
    pub fn new() -> Self {
        Graph {
            edges: HashMap::new(),
        }
    }

    /// Build the adjacency from the current usable pair set. Total and
    /// idempotent; an empty pair set yields an empty graph.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = &'a Pair>,
    {
        let mut graph = Graph::new();
        for pair in pairs {
            graph.add_edge(&pair.token0, &pair.token1);
        }
        graph
    }

    // Add edge for both directions since the graph is undirected
    fn add_edge(&mut self, from: &str, to: &str) {
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        self.edges
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges
            .get(from)
            .is_some_and(|neighbors| neighbors.contains(to))
    }

    /// Find a route from `from` to `to`, both already normalized to
    /// contract addresses (the native coin maps to its wrapped token
    /// before this is called).
    ///
    /// Priority: same token (identity), direct pair, one hop through
    /// the bridging token, then a breadth-first search expanded only
    /// one level from the source. Routes longer than 3 nodes are never
    /// produced; fragmented liquidity beyond a single intermediate hop
    /// is unsupported.
    pub fn find_route(&self, from: &str, to: &str, bridge: &str) -> Option<RoutePlan> {
        if from == to {
            return Some(RoutePlan::Identity);
        }

        if self.has_edge(from, to) {
            return Some(RoutePlan::Hops(vec![from.to_string(), to.to_string()]));
        }

        if from != bridge && to != bridge && self.has_edge(from, bridge) && self.has_edge(bridge, to)
        {
            return Some(RoutePlan::Hops(vec![
                from.to_string(),
                bridge.to_string(),
                to.to_string(),
            ]));
        }

        self.bfs_route(from, to)
    }

    // Depth-capped BFS: only neighbors of the source are expanded, so
    // reachable destinations sit within two edges of the source.
    fn bfs_route(&self, from: &str, to: &str) -> Option<RoutePlan> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(from);
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(from);
        let mut parent: HashMap<&str, &str> = HashMap::new();

        while let Some(current) = queue.pop_front() {
            let Some(neighbors) = self.edges.get(current) else {
                continue;
            };
            for neighbor in neighbors {
                if visited.contains(neighbor.as_str()) {
                    continue;
                }
                visited.insert(neighbor);
                parent.insert(neighbor, current);
                if neighbor == to {
                    let mut tokens = vec![to.to_string()];
                    let mut cursor = to;
                    while let Some(prev) = parent.get(cursor) {
                        tokens.push(prev.to_string());
                        cursor = prev;
                    }
                    tokens.reverse();
                    if tokens.len() <= 3 {
                        return Some(RoutePlan::Hops(tokens));
                    }
                    return None;
                }
                // Expand only nodes adjacent to the source.
                if current == from {
                    queue.push_back(neighbor);
                }
            }
        }
        None
    }
}
