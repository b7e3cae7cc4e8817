//! Multi-objective evolutionary route search.
//!
//! An NSGA-II style genetic algorithm over variable-length genomes. A genome
//! lists the intermediate nodes of a route; the full route is
//! `start + genome + goal`. Each individual is scored on (time, cost,
//! transfers). Genomes that step over a missing edge get the same penalty on
//! all three objectives, so any feasible route dominates them.
//!
//! This module implements:
//! - Random variable-length initialization
//! - Cut-and-splice crossover with length truncation
//! - Replace / append / delete mutation
//! - Non-dominated sorting with crowding distance for survival
//! - An unbounded archive of non-dominated routes

use crate::error::{Result, RouterError};
use crate::network::{NodeIndex, TransportGraph};
use crate::route::{route_metrics, Route, RouteSummary};
use crate::search::archive::{Objectives, ParetoArchive};
use ordered_float::OrderedFloat;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Objective value given to every objective of an infeasible genome
pub const DEFAULT_PENALTY: f64 = 10_000.0;

/// Evolutionary search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Population size
    pub population_size: usize,
    /// Number of generations
    pub generations: usize,
    /// Maximum number of intermediate nodes in a genome
    pub max_intermediate_len: usize,
    /// Crossover probability per pair
    pub crossover_prob: f64,
    /// Mutation probability per individual
    pub mutation_prob: f64,
    /// Penalty objective value for infeasible genomes
    pub penalty: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        EvolutionConfig {
            population_size: 40,
            generations: 40,
            max_intermediate_len: 4,
            crossover_prob: 0.9,
            mutation_prob: 0.3,
            penalty: DEFAULT_PENALTY,
            seed: 42,
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(RouterError::InvalidConfig("population size must be positive".into()));
        }
        for (name, p) in [("crossover", self.crossover_prob), ("mutation", self.mutation_prob)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(RouterError::InvalidConfig(format!("{name} probability {p} is outside [0, 1]")));
            }
        }
        if !(self.penalty.is_finite() && self.penalty > 0.0) {
            return Err(RouterError::InvalidConfig("penalty must be a positive number".into()));
        }
        Ok(())
    }
}

/// Intermediate nodes of a candidate route, with a cached fitness
#[derive(Debug, Clone)]
pub struct Genome {
    genes: Vec<NodeIndex>,
    fitness: Option<Objectives>,
}

impl Genome {
    pub fn new(genes: Vec<NodeIndex>) -> Self {
        Genome { genes, fitness: None }
    }

    pub fn genes(&self) -> &[NodeIndex] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Cached objectives, `None` until evaluated or after a change
    pub fn fitness(&self) -> Option<Objectives> {
        self.fitness
    }

    pub fn invalidate(&mut self) {
        self.fitness = None;
    }
}

/// Genomes are the same solution when their genes match
impl PartialEq for Genome {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

/// Mutation moves, chosen with equal probability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Replace one gene with a random node
    Replace,
    /// Append a random node if under the length bound
    Append,
    /// Delete one gene
    Delete,
}

/// Everything the genetic operators need to know about one query
#[derive(Debug, Clone)]
pub struct GenomeContext<'g> {
    graph: &'g TransportGraph,
    start: NodeIndex,
    goal: NodeIndex,
    max_len: usize,
    candidates: Vec<NodeIndex>,
    penalty: Objectives,
}

impl<'g> GenomeContext<'g> {
    pub fn new(
        graph: &'g TransportGraph,
        start: NodeIndex,
        goal: NodeIndex,
        max_len: usize,
        penalty: f64,
    ) -> Result<Self> {
        graph.try_node(start)?;
        graph.try_node(goal)?;
        let candidates = (0..graph.node_count()).filter(|&n| n != start && n != goal).collect();

        Ok(GenomeContext {
            graph,
            start,
            goal,
            max_len,
            candidates,
            penalty: Objectives::uniform(penalty),
        })
    }

    pub fn graph(&self) -> &'g TransportGraph {
        self.graph
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn penalty(&self) -> Objectives {
        self.penalty
    }

    /// `start + genes + goal`
    pub fn full_route(&self, genes: &[NodeIndex]) -> Vec<NodeIndex> {
        let mut route = Vec::with_capacity(genes.len() + 2);
        route.push(self.start);
        route.extend_from_slice(genes);
        route.push(self.goal);
        route
    }

    fn random_gene<R: Rng>(&self, rng: &mut R) -> Option<NodeIndex> {
        self.candidates.choose(rng).copied()
    }

    /// Uniform length in `0..=max_len`, uniform genes among non-endpoint nodes
    pub fn random_genome<R: Rng>(&self, rng: &mut R) -> Genome {
        let len = if self.candidates.is_empty() { 0 } else { rng.gen_range(0..=self.max_len) };
        let genes = (0..len).filter_map(|_| self.random_gene(rng)).collect();
        Genome::new(genes)
    }

    /// Swap the suffixes after independent cut points, truncating both
    /// children to the length bound.
    pub fn crossover<R: Rng>(&self, a: &mut Genome, b: &mut Genome, rng: &mut R) {
        let cut_a = rng.gen_range(0..=a.genes.len());
        let cut_b = rng.gen_range(0..=b.genes.len());

        let tail_a = a.genes.split_off(cut_a);
        let tail_b = b.genes.split_off(cut_b);
        a.genes.extend(tail_b);
        b.genes.extend(tail_a);

        a.genes.truncate(self.max_len);
        b.genes.truncate(self.max_len);
        a.invalidate();
        b.invalidate();
    }

    /// Apply one randomly chosen mutation move
    pub fn mutate<R: Rng>(&self, genome: &mut Genome, rng: &mut R) -> MutationKind {
        let kind = match rng.gen_range(0..3) {
            0 => MutationKind::Replace,
            1 => MutationKind::Append,
            _ => MutationKind::Delete,
        };

        match kind {
            MutationKind::Replace => {
                if !genome.genes.is_empty() {
                    let pos = rng.gen_range(0..genome.genes.len());
                    if let Some(node) = self.random_gene(rng) {
                        genome.genes[pos] = node;
                    }
                }
            }
            MutationKind::Append => {
                if genome.genes.len() < self.max_len {
                    if let Some(node) = self.random_gene(rng) {
                        genome.genes.push(node);
                    }
                }
            }
            MutationKind::Delete => {
                if !genome.genes.is_empty() {
                    let pos = rng.gen_range(0..genome.genes.len());
                    genome.genes.remove(pos);
                }
            }
        }

        genome.invalidate();
        kind
    }

    /// (time, cost, transfers) of the full route, or the penalty vector if a
    /// step has no edge
    pub fn evaluate(&self, genes: &[NodeIndex]) -> Objectives {
        match route_metrics(self.graph, &self.full_route(genes)) {
            Ok(m) => Objectives::new(m.total_time, m.total_cost, m.transfers as f64),
            Err(_) => self.penalty,
        }
    }

    /// Cached fitness, computed first if it was invalidated
    pub fn ensure_evaluated(&self, genome: &mut Genome) -> Objectives {
        match genome.fitness {
            Some(fitness) => fitness,
            None => {
                let fitness = self.evaluate(&genome.genes);
                genome.fitness = Some(fitness);
                fitness
            }
        }
    }
}

/// Split indices into successive non-dominated fronts (front 0 first)
pub fn non_dominated_fronts(objectives: &[Objectives]) -> Vec<Vec<usize>> {
    let n = objectives.len();
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut dominated_count = vec![0usize; n];
    let mut fronts: Vec<Vec<usize>> = vec![Vec::new()];

    for p in 0..n {
        for q in 0..n {
            if p == q {
                continue;
            }
            if objectives[p].dominates(&objectives[q]) {
                dominates[p].push(q);
            } else if objectives[q].dominates(&objectives[p]) {
                dominated_count[p] += 1;
            }
        }
        if dominated_count[p] == 0 {
            fronts[0].push(p);
        }
    }

    let mut i = 0;
    while !fronts[i].is_empty() {
        let mut next = Vec::new();
        for &p in &fronts[i] {
            for &q in &dominates[p] {
                dominated_count[q] -= 1;
                if dominated_count[q] == 0 {
                    next.push(q);
                }
            }
        }
        fronts.push(next);
        i += 1;
    }
    fronts.pop();

    fronts
}

/// Crowding distance of every member of `front`, in front order.
/// Boundary members of each objective get an infinite distance.
pub fn crowding_distances(front: &[usize], objectives: &[Objectives]) -> Vec<f64> {
    let n = front.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let mut distance = vec![0.0; n];
    for m in 0..3 {
        let value = |k: usize| objectives[front[k]].as_array()[m];
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&k| OrderedFloat(value(k)));

        distance[order[0]] = f64::INFINITY;
        distance[order[n - 1]] = f64::INFINITY;

        let range = value(order[n - 1]) - value(order[0]);
        if range <= 0.0 {
            continue;
        }
        for w in 1..n - 1 {
            distance[order[w]] += (value(order[w + 1]) - value(order[w - 1])) / range;
        }
    }

    distance
}

/// Front rank and crowding distance of every individual
fn rank_and_crowding(objectives: &[Objectives]) -> (Vec<usize>, Vec<f64>) {
    let mut rank = vec![0; objectives.len()];
    let mut crowding = vec![0.0; objectives.len()];

    for (r, front) in non_dominated_fronts(objectives).iter().enumerate() {
        let distances = crowding_distances(front, objectives);
        for (k, &i) in front.iter().enumerate() {
            rank[i] = r;
            crowding[i] = distances[k];
        }
    }

    (rank, crowding)
}

/// A non-dominated feasible route
#[derive(Debug, Clone, PartialEq)]
pub struct ParetoRoute {
    pub route: Route,
    pub objectives: Objectives,
    /// Intermediate nodes that produced the route
    pub genes: Vec<NodeIndex>,
}

impl ParetoRoute {
    pub fn summary(&self, graph: &TransportGraph) -> RouteSummary {
        self.route.summary(graph, "pareto")
    }
}

/// Evolutionary search over one start/goal query
pub struct EvolutionarySearch<'g> {
    config: EvolutionConfig,
    ctx: GenomeContext<'g>,
    rng: ChaCha8Rng,
    population: Vec<Genome>,
    archive: ParetoArchive<Genome>,
    generation: usize,
}

impl<'g> EvolutionarySearch<'g> {
    pub fn new(graph: &'g TransportGraph, start: NodeIndex, goal: NodeIndex, config: EvolutionConfig) -> Result<Self> {
        config.validate()?;
        let ctx = GenomeContext::new(graph, start, goal, config.max_intermediate_len, config.penalty)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(EvolutionarySearch {
            config,
            ctx,
            rng,
            population: Vec::new(),
            archive: ParetoArchive::new(),
            generation: 0,
        })
    }

    fn initialize_population(&mut self) {
        self.generation = 0;
        self.archive = ParetoArchive::new();
        self.population = (0..self.config.population_size)
            .map(|_| self.ctx.random_genome(&mut self.rng))
            .collect();

        let ctx = &self.ctx;
        for genome in self.population.iter_mut() {
            ctx.ensure_evaluated(genome);
        }
        self.update_archive();

        let feasible = self.population.iter().filter(|g| g.fitness != Some(self.ctx.penalty)).count();
        log::debug!(
            "Initialized population: {} (feasible: {}, infeasible: {})",
            self.population.len(),
            feasible,
            self.population.len() - feasible
        );
    }

    /// Offer the evaluated, feasible part of the population to the archive
    fn update_archive(&mut self) -> usize {
        let penalty = self.ctx.penalty;
        self.archive.update(
            self.population
                .iter()
                .filter_map(|g| g.fitness.map(|f| (f, g)))
                .filter(|(f, _)| *f != penalty),
        )
    }

    /// Binary tournament on (rank, crowding distance)
    fn crowded_tournament(&mut self, rank: &[usize], crowding: &[f64]) -> usize {
        let n = rank.len();
        let a = self.rng.gen_range(0..n);
        let b = self.rng.gen_range(0..n);

        if rank[a] != rank[b] {
            return if rank[a] < rank[b] { a } else { b };
        }
        if crowding[a] != crowding[b] {
            return if crowding[a] > crowding[b] { a } else { b };
        }
        if self.rng.gen_bool(0.5) {
            a
        } else {
            b
        }
    }

    /// Keep `population_size` individuals of `pool`, filling by front and
    /// breaking the last front by crowding distance.
    fn select_survivors(&mut self, pool: Vec<Genome>, objectives: &[Objectives]) -> Vec<Genome> {
        let target = self.config.population_size;
        let mut chosen: Vec<usize> = Vec::with_capacity(target);

        for front in non_dominated_fronts(objectives) {
            if chosen.len() + front.len() <= target {
                chosen.extend(front);
                if chosen.len() == target {
                    break;
                }
                continue;
            }

            let distances = crowding_distances(&front, objectives);
            let mut order: Vec<usize> = (0..front.len()).collect();
            // random order among equal distances
            order.shuffle(&mut self.rng);
            order.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]));

            let remaining = target - chosen.len();
            chosen.extend(order.into_iter().take(remaining).map(|k| front[k]));
            break;
        }

        let mut slots: Vec<Option<Genome>> = pool.into_iter().map(Some).collect();
        chosen.into_iter().filter_map(|i| slots[i].take()).collect()
    }

    /// Create the next generation
    fn evolve(&mut self) {
        let ctx = &self.ctx;
        let objectives: Vec<Objectives> = self.population.iter_mut().map(|g| ctx.ensure_evaluated(g)).collect();
        let (rank, crowding) = rank_and_crowding(&objectives);

        let mut offspring = Vec::with_capacity(self.population.len());
        for _ in 0..self.population.len() {
            let parent = self.crowded_tournament(&rank, &crowding);
            offspring.push(self.population[parent].clone());
        }

        for pair in offspring.chunks_mut(2) {
            if let [a, b] = pair {
                if self.rng.gen::<f64>() < self.config.crossover_prob {
                    self.ctx.crossover(a, b, &mut self.rng);
                }
            }
        }

        for genome in offspring.iter_mut() {
            if self.rng.gen::<f64>() < self.config.mutation_prob {
                self.ctx.mutate(genome, &mut self.rng);
            }
        }

        let mut pool = std::mem::take(&mut self.population);
        pool.extend(offspring);
        let ctx = &self.ctx;
        let objectives: Vec<Objectives> = pool.iter_mut().map(|g| ctx.ensure_evaluated(g)).collect();

        self.population = self.select_survivors(pool, &objectives);
        let admitted = self.update_archive();
        self.generation += 1;

        if self.generation % 10 == 0 || self.generation == 1 || self.generation == self.config.generations {
            log::debug!(
                "Generation {}: archive size {} (+{}), diversity {:.2}",
                self.generation,
                self.archive.len(),
                admitted,
                self.population_diversity()
            );
        }
    }

    /// Run all generations and return the feasible non-dominated routes,
    /// sorted by time, then cost, then transfers
    pub fn run(&mut self) -> Result<Vec<ParetoRoute>> {
        if self.ctx.start == self.ctx.goal {
            // the empty route dominates every loop back to the start
            let route = Route::from_path(self.ctx.graph, vec![self.ctx.start])?;
            return Ok(vec![ParetoRoute { route, objectives: Objectives::uniform(0.0), genes: Vec::new() }]);
        }

        let start = Instant::now();
        self.initialize_population();

        while self.generation < self.config.generations {
            self.evolve();
        }

        let routes = self.pareto_routes()?;
        log::info!(
            "Evolutionary search {} -> {}: {} Pareto routes after {} generations in {:.3}s",
            self.ctx.graph.node_id(self.ctx.start),
            self.ctx.graph.node_id(self.ctx.goal),
            routes.len(),
            self.generation,
            start.elapsed().as_secs_f64()
        );
        Ok(routes)
    }

    /// Archive members that are not penalized, as routes
    pub fn pareto_routes(&self) -> Result<Vec<ParetoRoute>> {
        let penalty = self.ctx.penalty();
        let mut routes = Vec::new();

        for (objectives, genome) in self.archive.iter() {
            if *objectives == penalty {
                continue;
            }
            let route = Route::from_path(self.ctx.graph, self.ctx.full_route(genome.genes()))?;
            routes.push(ParetoRoute { route, objectives: *objectives, genes: genome.genes().to_vec() });
        }

        routes.sort_by_key(|r| {
            (
                OrderedFloat(r.objectives.time),
                OrderedFloat(r.objectives.cost),
                OrderedFloat(r.objectives.transfers),
            )
        });
        Ok(routes)
    }

    pub fn current_generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    pub fn archive(&self) -> &ParetoArchive<Genome> {
        &self.archive
    }

    /// Average number of differing gene positions between individuals,
    /// counting length differences
    pub fn population_diversity(&self) -> f64 {
        let sample = self.population.len().min(20);
        if sample < 2 {
            return 0.0;
        }

        let mut total_diff = 0.0;
        let mut count = 0;
        for i in 0..sample {
            for j in i + 1..sample {
                let a = self.population[i].genes();
                let b = self.population[j].genes();
                let diff = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count() + a.len().abs_diff(b.len());
                total_diff += diff as f64;
                count += 1;
            }
        }

        total_diff / count as f64
    }
}

/// Run an evolutionary search with its own context and random source
pub fn evolutionary_search(
    graph: &TransportGraph,
    start: NodeIndex,
    goal: NodeIndex,
    config: &EvolutionConfig,
) -> Result<Vec<ParetoRoute>> {
    EvolutionarySearch::new(graph, start, goal, config.clone())?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Node;
    use crate::search::test_graphs::{line_graph, sample_city};

    fn small_config(max_len: usize, seed: u64) -> EvolutionConfig {
        EvolutionConfig {
            population_size: 20,
            generations: 15,
            max_intermediate_len: max_len,
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn test_penalty_for_missing_edge() {
        let g = line_graph();
        let ctx = GenomeContext::new(&g, 0, 2, 4, DEFAULT_PENALTY).unwrap();
        assert_eq!(ctx.evaluate(&[]), Objectives::uniform(DEFAULT_PENALTY));
        assert_eq!(ctx.evaluate(&[1, 1]), Objectives::uniform(DEFAULT_PENALTY));
        assert_eq!(ctx.evaluate(&[1]), Objectives::new(10.0, 2.0, 0.0));
    }

    #[test]
    fn test_line_graph_converges_to_single_route() {
        let g = line_graph();
        for max_len in [1, 2] {
            let routes = evolutionary_search(&g, 0, 2, &small_config(max_len, 7)).unwrap();
            assert_eq!(routes.len(), 1);
            assert_eq!(routes[0].route.node_ids(&g), vec!["N1", "N2", "N3"]);
            assert_eq!(routes[0].objectives, Objectives::new(10.0, 2.0, 0.0));
        }
    }

    #[test]
    fn test_no_intermediates_on_line_graph_is_empty() {
        let g = line_graph();
        let routes = evolutionary_search(&g, 0, 2, &small_config(0, 7)).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn test_start_equals_goal_is_single_node_route() {
        let g = line_graph();
        let routes = evolutionary_search(&g, 0, 0, &EvolutionConfig::default()).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].route.nodes(), &[0]);
        assert_eq!(routes[0].objectives, Objectives::uniform(0.0));
        assert!(routes[0].genes.is_empty());
    }

    #[test]
    fn test_unreachable_goal_keeps_archive_empty() {
        let mut g = line_graph();
        let island = g.add_node(Node::new("N4", "N4", 9.0, 9.0)).unwrap();

        let mut search = EvolutionarySearch::new(&g, 0, island, small_config(3, 4)).unwrap();
        let routes = search.run().unwrap();
        assert!(routes.is_empty());
        assert!(search.archive().is_empty());
    }

    #[test]
    fn test_archive_is_non_dominated_and_feasible() {
        let g = sample_city();
        let a = g.node_index("A").unwrap();
        let f = g.node_index("F").unwrap();

        for seed in [1, 2, 3] {
            let config = EvolutionConfig { seed, ..Default::default() };
            let mut search = EvolutionarySearch::new(&g, a, f, config).unwrap();
            let routes = search.run().unwrap();
            assert!(!routes.is_empty());

            let members: Vec<Objectives> = search.archive().iter().map(|(o, _)| *o).collect();
            for (i, x) in members.iter().enumerate() {
                for (j, y) in members.iter().enumerate() {
                    if i != j {
                        assert!(!x.dominates(y));
                    }
                }
            }

            for r in &routes {
                let m = r.route.metrics();
                assert_eq!(r.objectives, Objectives::new(m.total_time, m.total_cost, m.transfers as f64));
                assert_eq!(r.route.nodes().first(), Some(&a));
                assert_eq!(r.route.nodes().last(), Some(&f));
                assert!(r.genes.len() <= 4);
            }
        }
    }

    #[test]
    fn test_finds_direct_car_route() {
        let g = sample_city();
        let a = g.node_index("A").unwrap();
        let f = g.node_index("F").unwrap();
        let routes = evolutionary_search(&g, a, f, &EvolutionConfig::default()).unwrap();
        // A -> F by car is the fastest route with no transfers
        assert_eq!(routes[0].route.nodes(), &[a, f]);
        assert_eq!(routes[0].objectives.time, 9.0);
    }

    #[test]
    fn test_same_seed_same_front() {
        let g = sample_city();
        let config = EvolutionConfig { seed: 11, ..Default::default() };
        let first = evolutionary_search(&g, 0, 5, &config).unwrap();
        let second = evolutionary_search(&g, 0, 5, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_operators_respect_bounds() {
        let g = sample_city();
        let ctx = GenomeContext::new(&g, 0, 5, 3, DEFAULT_PENALTY).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for _ in 0..200 {
            let mut a = ctx.random_genome(&mut rng);
            let mut b = ctx.random_genome(&mut rng);
            assert!(a.len() <= 3);
            assert!(a.genes().iter().all(|&n| n != 0 && n != 5));

            ctx.ensure_evaluated(&mut a);
            ctx.ensure_evaluated(&mut b);
            ctx.crossover(&mut a, &mut b, &mut rng);
            assert!(a.len() <= 3 && b.len() <= 3);
            assert!(a.fitness().is_none() && b.fitness().is_none());

            ctx.ensure_evaluated(&mut a);
            let before = a.len();
            let kind = ctx.mutate(&mut a, &mut rng);
            assert!(a.fitness().is_none());
            assert!(a.len() <= 3);
            match kind {
                MutationKind::Replace => assert_eq!(a.len(), before),
                MutationKind::Append => assert!(a.len() == before + 1 || before == 3),
                MutationKind::Delete => assert_eq!(a.len(), before.saturating_sub(1)),
            }
        }
    }

    #[test]
    fn test_cached_fitness_reused() {
        let g = line_graph();
        let ctx = GenomeContext::new(&g, 0, 2, 2, DEFAULT_PENALTY).unwrap();
        let mut genome = Genome::new(vec![1]);
        // a stale cache is returned as-is until invalidated
        genome.fitness = Some(Objectives::uniform(1.0));
        assert_eq!(ctx.ensure_evaluated(&mut genome), Objectives::uniform(1.0));
        genome.invalidate();
        assert_eq!(ctx.ensure_evaluated(&mut genome), Objectives::new(10.0, 2.0, 0.0));
    }

    #[test]
    fn test_fronts_and_crowding() {
        let objs = vec![
            Objectives::new(1.0, 5.0, 0.0),
            Objectives::new(2.0, 2.0, 0.0),
            Objectives::new(5.0, 1.0, 0.0),
            Objectives::new(3.0, 3.0, 0.0),
            Objectives::new(6.0, 6.0, 1.0),
        ];
        let fronts = non_dominated_fronts(&objs);
        assert_eq!(fronts, vec![vec![0, 1, 2], vec![3], vec![4]]);

        let d = crowding_distances(&fronts[0], &objs);
        assert!(d[0].is_infinite());
        assert!(d[2].is_infinite());
        assert!(d[1].is_finite() && d[1] > 0.0);
        assert!(non_dominated_fronts(&[]).is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let g = line_graph();
        let config = EvolutionConfig { population_size: 0, ..Default::default() };
        assert!(EvolutionarySearch::new(&g, 0, 2, config).is_err());
        let config = EvolutionConfig { mutation_prob: 1.5, ..Default::default() };
        assert!(EvolutionarySearch::new(&g, 0, 2, config).is_err());
    }
}
