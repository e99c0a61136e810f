use horizon::search::{OverflowPolicy, ParallelSearch, SearchConfig, Searchable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

const LIVENESS: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Default)]
struct NodeSpec {
    children: Vec<usize>,
    goal: bool,
    score: i64,
    panics: bool,
}

/// A tree described by a table of nodes; entry 0 is the root.
struct Tree {
    nodes: Vec<NodeSpec>,
    delay: Duration,
    expansions_by_depth: Vec<AtomicU64>,
}

impl Tree {
    fn new(nodes: Vec<NodeSpec>) -> Arc<Self> {
        Self::with_delay(nodes, Duration::ZERO)
    }

    fn with_delay(nodes: Vec<NodeSpec>, delay: Duration) -> Arc<Self> {
        let expansions_by_depth = (0..16).map(|_| AtomicU64::new(0)).collect();
        Arc::new(Self {
            nodes,
            delay,
            expansions_by_depth,
        })
    }

    fn root(self: &Arc<Self>) -> TreeNode {
        TreeNode {
            tree: Arc::clone(self),
            index: 0,
            depth: 0,
        }
    }

    fn expansions_at(&self, depth: usize) -> u64 {
        self.expansions_by_depth[depth].load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct TreeNode {
    tree: Arc<Tree>,
    index: usize,
    depth: usize,
}

impl TreeNode {
    fn spec(&self) -> &NodeSpec {
        &self.tree.nodes[self.index]
    }
}

impl Searchable for TreeNode {
    fn expand(&self, emit: &mut dyn FnMut(Self)) {
        if !self.tree.delay.is_zero() {
            thread::sleep(self.tree.delay);
        }
        if self.spec().panics {
            panic!("node {} failed to expand", self.index);
        }
        self.tree.expansions_by_depth[self.depth].fetch_add(1, Ordering::SeqCst);
        for &child in &self.spec().children {
            emit(TreeNode {
                tree: Arc::clone(&self.tree),
                index: child,
                depth: self.depth + 1,
            });
        }
    }

    fn is_goal(&self) -> bool {
        self.spec().goal
    }

    fn score(&self) -> i64 {
        self.spec().score
    }
}

fn node(children: &[usize]) -> NodeSpec {
    NodeSpec {
        children: children.to_vec(),
        ..Default::default()
    }
}

fn goal(score: i64) -> NodeSpec {
    NodeSpec {
        goal: true,
        score,
        ..Default::default()
    }
}

/// A chain of `length` non-goal nodes, each with `fanout` leaves hanging off.
fn comb(length: usize, fanout: usize) -> Vec<NodeSpec> {
    let mut nodes = Vec::new();
    for spine in 0..length {
        let first_leaf = nodes.len() + 1;
        let mut children: Vec<usize> = (first_leaf..first_leaf + fanout).collect();
        let next_spine = first_leaf + fanout;
        if spine + 1 < length {
            children.push(next_spine);
        }
        nodes.push(node(&children));
        nodes.extend((0..fanout).map(|_| node(&[])));
    }
    nodes
}

fn scores(found: &[TreeNode]) -> Vec<i64> {
    found.iter().map(|n| n.score()).collect()
}

#[test]
fn test_two_goal_children_ranked() {
    let tree = Tree::new(vec![node(&[1, 2]), goal(5), goal(10)]);
    let search = ParallelSearch::new(SearchConfig::new(4, 1, 2)).unwrap();
    search.start([tree.root()]).unwrap();

    assert_eq!(scores(&search.wait_for_found_timeout(LIVENESS)), vec![10, 5]);
}

#[test]
fn test_goal_root_at_depth_zero() {
    let root = NodeSpec {
        children: vec![1],
        goal: true,
        score: 1,
        ..Default::default()
    };
    let tree = Tree::new(vec![root, goal(99)]);
    let search = ParallelSearch::new(SearchConfig::new(2, 0, 1)).unwrap();
    search.start([tree.root()]).unwrap();

    assert_eq!(scores(&search.wait_for_found_timeout(LIVENESS)), vec![1]);
    assert_eq!(tree.expansions_at(0), 0);
}

#[test]
fn test_no_goal_reports_every_depth() {
    let tree = Tree::new(comb(5, 2));
    let search = ParallelSearch::new(SearchConfig::new(3, 3, 2)).unwrap();
    search.start([tree.root()]).unwrap();

    assert!(search.wait_for_found_timeout(LIVENESS).is_empty());
    assert!(search.wait_for_exhaustion(LIVENESS));

    let stats = search.statistics();
    assert_eq!(stats.depths_completed, 4);
    assert_eq!(stats.processed_per_depth, vec![1, 3, 3, 3]);
    assert!(stats.exhausted);
}

#[test]
fn test_nodes_at_depth_limit_never_expanded() {
    let tree = Tree::new(comb(6, 3));
    let search = ParallelSearch::new(SearchConfig::new(4, 2, 1)).unwrap();
    search.start([tree.root()]).unwrap();

    assert!(search.wait_for_exhaustion(LIVENESS));
    assert_eq!(tree.expansions_at(0), 1);
    assert_eq!(tree.expansions_at(1), 4);
    assert_eq!(tree.expansions_at(2), 0);
    assert_eq!(search.statistics().processed_per_depth, vec![1, 4, 4]);
}

#[test]
fn test_processed_counts_match_random_tree() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let depth_limit = 5;

    // Grow a random tree level by level, remembering each node's depth.
    let mut nodes = vec![NodeSpec::default()];
    let mut per_depth = vec![1u64];
    let mut frontier = vec![0usize];
    for _ in 0..depth_limit {
        let mut next = Vec::new();
        for parent in frontier {
            let fanout = rng.random_range(0..4);
            for _ in 0..fanout {
                nodes.push(NodeSpec::default());
                let child = nodes.len() - 1;
                nodes[parent].children.push(child);
                next.push(child);
            }
        }
        per_depth.push(next.len() as u64);
        frontier = next;
    }

    let tree = Tree::new(nodes);
    let search = ParallelSearch::new(SearchConfig::new(8, depth_limit, 1)).unwrap();
    search.start([tree.root()]).unwrap();
    assert!(search.wait_for_exhaustion(LIVENESS));

    let stats = search.statistics();
    assert_eq!(stats.processed_per_depth, per_depth);
    assert_eq!(stats.total_processed(), tree.nodes.len() as u64);
}

#[test]
fn test_completed_depths_have_final_counts() {
    let tree = Tree::with_delay(comb(4, 3), Duration::from_millis(5));
    let search = ParallelSearch::new(SearchConfig::new(2, 4, 1)).unwrap();
    search.start([tree.root()]).unwrap();

    let mut snapshots = Vec::new();
    while !search.wait_for_exhaustion(Duration::from_millis(1)) {
        snapshots.push(search.statistics());
    }
    let last = search.statistics();
    assert_eq!(last.depths_completed, 5);

    for snapshot in snapshots {
        for depth in 0..snapshot.depths_completed {
            assert_eq!(
                snapshot.processed_per_depth[depth], last.processed_per_depth[depth],
                "depth {} reported complete before its count was final",
                depth
            );
        }
    }
}

#[test]
fn test_panicking_node_still_completes_search() {
    let failing = NodeSpec {
        children: vec![4, 5],
        panics: true,
        ..Default::default()
    };
    let tree = Tree::new(vec![
        node(&[1, 2, 3]),
        failing,
        node(&[6]),
        node(&[]),
        goal(100),
        goal(100),
        goal(7),
    ]);
    let search = ParallelSearch::new(SearchConfig::new(2, 2, 4)).unwrap();
    search.start([tree.root()]).unwrap();

    // Only the surviving branch delivers; the failed node's children are lost.
    assert_eq!(scores(&search.wait_for_found_timeout(LIVENESS)), vec![7]);
    assert!(search.wait_for_exhaustion(LIVENESS));

    let stats = search.statistics();
    assert_eq!(stats.processed_per_depth, vec![1, 3, 1]);
    assert_eq!(stats.depths_completed, 3);
    assert!(stats.exhausted);
}

#[test]
fn test_overflow_discard_drops_extra_goals() {
    let tree = Tree::new(vec![node(&[1, 2, 3]), goal(1), goal(2), goal(3)]);
    let config = SearchConfig::new(3, 1, 1).with_overflow_policy(OverflowPolicy::Discard);
    let search = ParallelSearch::new(config).unwrap();
    search.start([tree.root()]).unwrap();

    assert_eq!(search.wait_for_found_timeout(LIVENESS).len(), 1);
    assert!(search.wait_for_exhaustion(LIVENESS));

    // One goal was delivered; the queue may have taken one more after the drain.
    let discarded = search.statistics().goals_discarded;
    assert!((1..=2).contains(&discarded), "discarded {}", discarded);
}

#[test]
fn test_overflow_block_parks_extra_goals() {
    let tree = Tree::new(vec![node(&[1, 2, 3]), goal(1), goal(2), goal(3)]);
    let config = SearchConfig::new(3, 1, 1).with_overflow_policy(OverflowPolicy::Block);
    let search = ParallelSearch::new(config).unwrap();
    search.start([tree.root()]).unwrap();

    assert_eq!(search.wait_for_found_timeout(LIVENESS).len(), 1);

    // Only one slot ever frees up, so one goal holder stays blocked and depth
    // 1 never completes.
    let stats = search.statistics();
    assert_eq!(stats.goals_discarded, 0);
    assert!(!search.wait_for_exhaustion(Duration::from_millis(200)));
    assert_eq!(search.statistics().depths_completed, 1);
}
