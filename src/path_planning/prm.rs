//! Probabilistic Road-Map (PRM) generation around circular obstacles
//!
//! Samples collision-free points in a rectangle, adds them as nodes of an
//! existing [`Graph`] and links them with visibility-checked edges weighted
//! by their length. The augmented graph is then searched with
//! [`AStarPlanner`](crate::path_planning::AStarPlanner).
//!
//! Samples are rejected when they fall within one obstacle *diameter* of an
//! obstacle center, while edges only have to clear the true radius. Sampled
//! nodes therefore keep a margin from obstacles that edges do not.

use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::common::geometry::{distance, is_visible};
use crate::common::{Bounds, Obstacle, PlanningError, PlanningResult, Point2D, RoadmapBuilder};
use crate::graph::{EdgeInsertion, Graph};

/// Where the generator's random seed comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngSeed {
    Fixed(u64),
    /// Draw a fresh seed; the drawn value is still reported
    Entropy,
}

impl RngSeed {
    /// The concrete seed to use
    pub fn resolve(&self) -> u64 {
        match self {
            RngSeed::Fixed(seed) => *seed,
            RngSeed::Entropy => rand::random(),
        }
    }
}

/// Configuration for PRM generation
#[derive(Debug, Clone)]
pub struct PrmConfig {
    /// Number of free samples to add
    pub n_sample: usize,
    /// Cap on successful links per connection pass for one node
    pub max_links_per_node: usize,
    /// Sampling rectangle
    pub bounds: Bounds,
    /// Limit on point draws, `None` for 1000 draws per requested sample
    pub max_sample_attempts: Option<usize>,
    pub seed: RngSeed,
}

impl Default for PrmConfig {
    fn default() -> Self {
        Self {
            n_sample: 10,
            max_links_per_node: 3,
            bounds: Bounds::default(),
            max_sample_attempts: None,
            seed: RngSeed::Fixed(1234),
        }
    }
}

impl PrmConfig {
    pub fn sample_attempt_limit(&self) -> usize {
        self.max_sample_attempts
            .unwrap_or_else(|| self.n_sample.saturating_mul(1000))
    }

    /// Seeded generator together with the seed it was built from
    pub fn make_rng(&self) -> (StdRng, u64) {
        let seed = self.seed.resolve();
        (StdRng::seed_from_u64(seed), seed)
    }

    fn validate(&self) -> PlanningResult<()> {
        if !self.bounds.is_valid() {
            return Err(PlanningError::InvalidParameter(format!(
                "sampling bounds {:?} must be finite with min <= max",
                self.bounds
            )));
        }
        Ok(())
    }
}

/// Result of one visibility-checked connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Added,
    /// Edge existed already; counts as a successful link
    Existing,
    Blocked,
}

impl LinkOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, LinkOutcome::Blocked)
    }
}

/// Tallies of connection attempts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub added: usize,
    pub existing: usize,
    pub blocked: usize,
    pub self_links: usize,
}

impl LinkStats {
    pub fn successes(&self) -> usize {
        self.added + self.existing
    }

    fn merge(&mut self, other: LinkStats) {
        self.added += other.added;
        self.existing += other.existing;
        self.blocked += other.blocked;
        self.self_links += other.self_links;
    }
}

/// Summary of a roadmap generation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadmapReport {
    /// Seed used, when the generator created its own rng
    pub seed: Option<u64>,
    /// Ids of the sampled nodes in generation order
    pub sampled: Vec<String>,
    pub rejected_samples: usize,
    pub links: LinkStats,
}

/// PRM roadmap generator
#[derive(Debug, Clone, Default)]
pub struct RoadmapGenerator {
    config: PrmConfig,
}

impl RoadmapGenerator {
    pub fn new(config: PrmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PrmConfig {
        &self.config
    }

    /// Generate with an rng seeded from the configuration
    pub fn generate_seeded(&self, graph: &mut Graph) -> PlanningResult<RoadmapReport> {
        let (mut rng, seed) = self.config.make_rng();
        info!("PRM random seed {}", seed);
        let mut report = self.generate(graph, &mut rng)?;
        report.seed = Some(seed);
        Ok(report)
    }

    /// Sample `n_sample` free points into `graph` and connect them.
    ///
    /// On `SamplingExhausted` the graph is left untouched.
    pub fn generate<R: Rng>(&self, graph: &mut Graph, rng: &mut R) -> PlanningResult<RoadmapReport> {
        self.config.validate()?;
        let k = self.config.max_links_per_node;

        let existing: Vec<usize> = (0..graph.node_count()).collect();
        let (points, rejected_samples) = self.sample_free_points(graph.obstacles(), rng)?;

        let mut next_id = graph.node_count() + 1;
        let mut generated = Vec::with_capacity(points.len());
        let mut sampled = Vec::with_capacity(points.len());
        for p in points {
            while graph.contains(&next_id.to_string()) {
                next_id += 1;
            }
            let id = next_id.to_string();
            generated.push(graph.add_node(&id, p, 0.0)?);
            sampled.push(id);
            next_id += 1;
        }

        let mut links = LinkStats::default();
        for &node in &existing {
            links.merge(Self::try_connect_closest_k(graph, node, generated.clone(), k)?);
        }
        for (i, &node) in generated.iter().enumerate() {
            let pool: Vec<usize> = existing
                .iter()
                .chain(&generated[i + 1..])
                .copied()
                .collect();
            links.merge(Self::try_connect_closest_k(graph, node, pool, k)?);
        }

        info!(
            "PRM added {} nodes ({} rejected draws) and {} edges ({} blocked, {} already present); graph has {} nodes, {} edges",
            sampled.len(),
            rejected_samples,
            links.added,
            links.blocked,
            links.existing,
            graph.node_count(),
            graph.edge_count()
        );

        Ok(RoadmapReport {
            seed: None,
            sampled,
            rejected_samples,
            links,
        })
    }

    /// Draw points uniformly in the bounds until enough lie outside every exclusion zone
    fn sample_free_points<R: Rng>(&self, obstacles: &[Obstacle], rng: &mut R) -> PlanningResult<(Vec<Point2D>, usize)> {
        let requested = self.config.n_sample;
        let limit = self.config.sample_attempt_limit();
        let b = &self.config.bounds;
        let ux = Uniform::new_inclusive(b.min.x, b.max.x);
        let uy = Uniform::new_inclusive(b.min.y, b.max.y);

        let mut points = Vec::with_capacity(requested);
        let mut attempts = 0;
        while points.len() < requested {
            if attempts >= limit {
                return Err(PlanningError::SamplingExhausted {
                    placed: points.len(),
                    requested,
                    attempts,
                });
            }
            attempts += 1;
            let p = Point2D::new(ux.sample(rng), uy.sample(rng));
            if obstacles.iter().any(|o| o.excludes_sample(&p)) {
                continue;
            }
            points.push(p);
        }
        let placed = points.len();
        Ok((points, attempts - placed))
    }

    /// Link `a` and `b` if the segment between them clears every obstacle
    pub fn try_connect(graph: &mut Graph, a: usize, b: usize) -> PlanningResult<LinkOutcome> {
        if a == b {
            let id = graph.node(a).map(|n| n.id.clone()).unwrap_or_default();
            return Err(PlanningError::SelfConnectionAttempt(id));
        }
        let (pa, pb) = match (graph.node(a), graph.node(b)) {
            (Some(na), Some(nb)) => (na.position, nb.position),
            _ => {
                return Err(PlanningError::InvalidParameter(format!(
                    "link ({}, {}) out of range for {} nodes",
                    a,
                    b,
                    graph.node_count()
                )))
            }
        };
        if !is_visible(&pa, &pb, graph.obstacles()) {
            return Ok(LinkOutcome::Blocked);
        }
        Ok(match graph.add_edge(a, b, distance(&pa, &pb))? {
            EdgeInsertion::Inserted => LinkOutcome::Added,
            EdgeInsertion::AlreadyPresent => LinkOutcome::Existing,
        })
    }

    /// Try candidates from `pool` nearest first until `max_links` links succeed.
    ///
    /// Every tried candidate leaves the pool whether or not the link
    /// succeeded. Self links are logged and skipped.
    pub fn try_connect_closest_k(
        graph: &mut Graph,
        node: usize,
        mut pool: Vec<usize>,
        max_links: usize,
    ) -> PlanningResult<LinkStats> {
        let mut stats = LinkStats::default();
        let origin = match graph.node(node) {
            Some(n) => n.position,
            None => return Ok(stats),
        };

        while stats.successes() < max_links {
            let nearest = pool
                .iter()
                .enumerate()
                .filter_map(|(k, &c)| graph.node(c).map(|n| (k, origin.distance(&n.position))))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            let Some((k, _)) = nearest else { break };
            let candidate = pool.remove(k);

            match Self::try_connect(graph, node, candidate) {
                Ok(LinkOutcome::Added) => stats.added += 1,
                Ok(LinkOutcome::Existing) => stats.existing += 1,
                Ok(LinkOutcome::Blocked) => stats.blocked += 1,
                Err(e @ PlanningError::SelfConnectionAttempt(_)) => {
                    error!("{}", e);
                    stats.self_links += 1;
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            "node '{}': {} links added, {} existing, {} blocked",
            graph.nodes()[node].id,
            stats.added,
            stats.existing,
            stats.blocked
        );
        Ok(stats)
    }
}

impl RoadmapBuilder for RoadmapGenerator {
    type Report = RoadmapReport;

    fn build<R: Rng>(&self, graph: &mut Graph, rng: &mut R) -> PlanningResult<RoadmapReport> {
        self.generate(graph, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::records::{format_edge, format_node, format_obstacle, to_lines};
    use crate::path_planning::AStarPlanner;
    use approx::assert_relative_eq;

    fn two_node_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_node("1", Point2D::new(-0.45, 0.0), 0.0).unwrap();
        graph.add_node("2", Point2D::new(0.45, 0.0), 0.0).unwrap();
        graph
    }

    fn star_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_node("o", Point2D::origin(), 0.0).unwrap();
        for i in 1..=5 {
            graph.add_node(&format!("n{}", i), Point2D::new(i as f64, 0.5), 0.0).unwrap();
        }
        graph
    }

    #[test]
    fn test_obstacle_blocks_connection() {
        let mut graph = Graph::new();
        let a = graph.add_node("1", Point2D::new(0.0, 0.0), 0.0).unwrap();
        let b = graph.add_node("2", Point2D::new(10.0, 0.0), 0.0).unwrap();
        graph.add_obstacle(Obstacle::new(5.0, 0.0, 4.0));

        assert_eq!(RoadmapGenerator::try_connect(&mut graph, a, b).unwrap(), LinkOutcome::Blocked);
        assert_eq!(graph.edge_count(), 0);
        let stats = RoadmapGenerator::try_connect_closest_k(&mut graph, a, vec![b], 3).unwrap();
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.successes(), 0);
    }

    #[test]
    fn test_self_connection_rejected() {
        let mut graph = star_graph();
        assert!(matches!(
            RoadmapGenerator::try_connect(&mut graph, 0, 0),
            Err(PlanningError::SelfConnectionAttempt(id)) if id == "o"
        ));
        let stats = RoadmapGenerator::try_connect_closest_k(&mut graph, 0, vec![0, 1], 2).unwrap();
        assert_eq!(stats.self_links, 1);
        assert_eq!(stats.added, 1);
        assert!(!graph.has_edge(0, 0));
    }

    #[test]
    fn test_closest_k_takes_nearest_first() {
        let mut graph = star_graph();
        let stats = RoadmapGenerator::try_connect_closest_k(&mut graph, 0, vec![5, 3, 1, 4, 2], 2).unwrap();
        assert_eq!(stats.added, 2);
        assert_eq!(graph.neighbor_ids("o"), Some(vec!["n1", "n2"]));
        assert_relative_eq!(graph.edge_weight(0, 1).unwrap(), 1.25f64.sqrt());
    }

    #[test]
    fn test_closest_k_skips_blocked_candidates() {
        let mut graph = star_graph();
        // blocks o-n1 only
        graph.add_obstacle(Obstacle::new(0.5, 0.25, 0.1));
        let stats = RoadmapGenerator::try_connect_closest_k(&mut graph, 0, vec![1, 2, 3, 4, 5], 2).unwrap();
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.added, 2);
        assert_eq!(graph.neighbor_ids("o"), Some(vec!["n2", "n3"]));
    }

    #[test]
    fn test_existing_edge_counts_as_success() {
        let mut graph = star_graph();
        graph.add_edge(0, 1, 7.0).unwrap();
        let stats = RoadmapGenerator::try_connect_closest_k(&mut graph, 0, vec![1, 2], 1).unwrap();
        assert_eq!(stats.existing, 1);
        assert_eq!(stats.added, 0);
        assert_eq!(graph.edge_weight(0, 1), Some(7.0));
        assert!(!graph.has_edge(0, 2));
    }

    #[test]
    fn test_samples_respect_bounds_and_margin() {
        let mut graph = two_node_graph();
        graph.add_obstacle(Obstacle::new(0.0, 0.0, 0.2));
        graph.add_obstacle(Obstacle::new(0.25, 0.3, 0.1));
        let generator = RoadmapGenerator::new(PrmConfig {
            n_sample: 40,
            max_links_per_node: 4,
            ..Default::default()
        });
        let report = generator.generate_seeded(&mut graph).unwrap();

        assert_eq!(report.seed, Some(1234));
        assert_eq!(report.sampled.len(), 40);
        assert_eq!(graph.node_count(), 42);
        assert_eq!(report.sampled[0], "3");
        assert_eq!(report.links.added, graph.edge_count());
        for id in &report.sampled {
            let p = graph.node_by_id(id).unwrap().position;
            assert!(generator.config().bounds.contains(&p));
            assert!(graph.obstacles().iter().all(|o| !o.excludes_sample(&p)));
        }
        for (a, b, w) in graph.edges() {
            let (pa, pb) = (graph.nodes()[a].position, graph.nodes()[b].position);
            assert!(is_visible(&pa, &pb, graph.obstacles()));
            assert_eq!(w, distance(&pa, &pb));
        }
    }

    #[test]
    fn test_generated_ids_skip_existing() {
        let mut graph = Graph::new();
        graph.add_node("3", Point2D::new(0.0, 0.0), 0.0).unwrap();
        graph.add_node("x", Point2D::new(0.1, 0.0), 0.0).unwrap();
        let generator = RoadmapGenerator::new(PrmConfig {
            n_sample: 3,
            ..Default::default()
        });
        let report = generator.generate(&mut graph, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(report.sampled, vec!["4", "5", "6"]);
    }

    #[test]
    fn test_same_seed_same_roadmap() {
        let config = PrmConfig {
            n_sample: 25,
            max_links_per_node: 3,
            seed: RngSeed::Fixed(99),
            ..Default::default()
        };
        let build = || {
            let mut graph = two_node_graph();
            graph.add_obstacle(Obstacle::new(0.0, 0.0, 0.3));
            RoadmapGenerator::new(config.clone()).generate_seeded(&mut graph).unwrap();
            (
                to_lines(&graph.node_records(), format_node),
                to_lines(&graph.edge_records(), format_edge),
            )
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_sampling_exhausted_leaves_graph_untouched() {
        let mut graph = two_node_graph();
        graph.add_obstacle(Obstacle::new(0.0, 0.0, 10.0));
        let generator = RoadmapGenerator::new(PrmConfig {
            n_sample: 5,
            max_sample_attempts: Some(200),
            ..Default::default()
        });
        let err = generator.generate_seeded(&mut graph).unwrap_err();
        assert!(matches!(
            err,
            PlanningError::SamplingExhausted { placed: 0, requested: 5, attempts: 200 }
        ));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_invalid_bounds() {
        let mut graph = two_node_graph();
        let generator = RoadmapGenerator::new(PrmConfig {
            bounds: Bounds::new(1.0, 0.0, -1.0, 1.0),
            ..Default::default()
        });
        assert!(matches!(
            generator.generate_seeded(&mut graph),
            Err(PlanningError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_overflowing_bounds_are_rejected() {
        let mut graph = two_node_graph();
        let generator = RoadmapGenerator::new(PrmConfig {
            n_sample: 2,
            bounds: Bounds::new(-1e308, -1e308, 1e308, 1e308),
            ..Default::default()
        });
        assert!(matches!(
            generator.generate_seeded(&mut graph),
            Err(PlanningError::InvalidParameter(_))
        ));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_generated_roadmap_reloads_exactly() {
        let mut graph = two_node_graph();
        graph.add_obstacle(Obstacle::new(0.0, 0.3, 0.1));
        let generator = RoadmapGenerator::new(PrmConfig {
            n_sample: 30,
            ..Default::default()
        });
        generator.generate_seeded(&mut graph).unwrap();

        let (reloaded, report) = Graph::from_text(
            &to_lines(&graph.node_records(), format_node),
            &to_lines(&graph.edge_records(), format_edge),
            Some(&to_lines(&graph.obstacle_records(), format_obstacle)),
        );
        assert!(report.is_clean());
        assert_eq!(reloaded.nodes(), graph.nodes());
        assert_eq!(reloaded.obstacles(), graph.obstacles());
        assert_eq!(reloaded.edge_count(), graph.edge_count());
        for node in graph.nodes() {
            assert_eq!(reloaded.neighbor_ids(&node.id), graph.neighbor_ids(&node.id));
        }
        for (a, b, w) in graph.edges() {
            let (ia, ib) = (&graph.nodes()[a].id, &graph.nodes()[b].id);
            assert_eq!(reloaded.edge_weight_by_id(ia, ib), Some(w));
        }
    }

    #[test]
    fn test_roadmap_is_searchable() {
        // Without obstacles and with a cap above the pool size every attempt links.
        let mut graph = two_node_graph();
        let generator = RoadmapGenerator::new(PrmConfig {
            n_sample: 8,
            max_links_per_node: 20,
            ..Default::default()
        });
        let report = generator.build(&mut graph, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(report.sampled.len(), 8);
        assert_eq!(report.rejected_samples, 0);
        assert_eq!(graph.edge_count(), 2 * 8 + 8 * 7 / 2);
        assert_eq!(report.links.added, graph.edge_count());
        assert!(!graph.has_edge(0, 1));

        let path = AStarPlanner::default()
            .find_path(&graph, "1", "2")
            .unwrap()
            .into_path();
        assert_eq!(path.len(), 3);
        assert!(path.cost >= 0.9);
        assert_relative_eq!(path.cost, graph.path_cost(&path.nodes).unwrap());
    }
}
