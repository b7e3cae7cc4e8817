//! Benchmarking and experimentation module.
//!
//! Runs every search on a set of start/goal queries, collects one result row
//! per run and aggregates statistics per algorithm.

use crate::config::SearchConfig;
use crate::error::Result;
use crate::network::{NodeIndex, TransportGraph};
use crate::search::{bounded_round_search, constrained_search, evolutionary_search, EvolutionConfig};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

/// Result of running a single algorithm on a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Algorithm name
    pub algorithm: String,
    /// Query as "from->to"
    pub query: String,
    /// Whether a route was found
    pub feasible: bool,
    /// Travel time of the (fastest) route found
    pub time: Option<f64>,
    /// Cost of that route
    pub cost: Option<f64>,
    /// Transfers of that route
    pub transfers: Option<usize>,
    /// Number of Pareto routes (evolutionary runs only)
    pub front_size: Option<usize>,
    /// Round of the goal arrival (bounded-round search only)
    pub rounds_used: Option<usize>,
    /// Wall-clock runtime in seconds
    pub runtime: f64,
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    /// Algorithm name
    pub algorithm: String,
    /// Number of runs
    pub num_runs: usize,
    /// Number of runs that found a route
    pub num_feasible: usize,
    /// Average travel time of found routes
    pub avg_time: f64,
    /// Standard deviation of travel time
    pub std_time: f64,
    /// Average cost of found routes
    pub avg_cost: f64,
    /// Average runtime
    pub avg_runtime: f64,
    /// Total runtime
    pub total_runtime: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of evolutionary runs (seeds `0..num_runs`) per query
    pub num_runs: usize,
    /// Run evolutionary seeds in parallel
    pub parallel: bool,
    /// Search parameters
    pub search: SearchConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            parallel: true,
            search: SearchConfig::default(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark { config, results: Vec::new() }
    }

    /// Run every algorithm on one query
    pub fn run_query(&mut self, graph: &TransportGraph, start: NodeIndex, goal: NodeIndex) -> Result<()> {
        let query = format!("{}->{}", graph.node_id(start), graph.node_id(goal));
        log::info!("Running benchmark on query: {}", query);

        let clock = Instant::now();
        let found = constrained_search(graph, start, goal, &self.config.search.constrained)?;
        let runtime = clock.elapsed().as_secs_f64();
        self.results.push(AlgorithmResult {
            algorithm: "BestFirst".to_string(),
            query: query.clone(),
            feasible: found.is_some(),
            time: found.as_ref().map(|r| r.total_time()),
            cost: found.as_ref().map(|r| r.total_cost()),
            transfers: found.as_ref().map(|r| r.transfers()),
            front_size: None,
            rounds_used: None,
            runtime,
        });

        let clock = Instant::now();
        let found = bounded_round_search(graph, start, goal, &self.config.search.rounds)?;
        let runtime = clock.elapsed().as_secs_f64();
        self.results.push(AlgorithmResult {
            algorithm: "BoundedRounds".to_string(),
            query: query.clone(),
            feasible: found.is_some(),
            time: found.as_ref().map(|f| f.route.total_time()),
            cost: found.as_ref().map(|f| f.route.total_cost()),
            transfers: found.as_ref().map(|f| f.route.transfers()),
            front_size: None,
            rounds_used: found.as_ref().map(|f| f.rounds_used),
            runtime,
        });

        let runs = self.run_evolutionary(graph, start, goal, &query)?;
        self.results.extend(runs);
        Ok(())
    }

    /// One evolutionary run per seed; every run owns its context and RNG
    fn run_evolutionary(
        &self,
        graph: &TransportGraph,
        start: NodeIndex,
        goal: NodeIndex,
        query: &str,
    ) -> Result<Vec<AlgorithmResult>> {
        let base = &self.config.search.evolution;
        let single = |seed: u64| -> Result<AlgorithmResult> {
            let config = EvolutionConfig { seed, ..base.clone() };
            let clock = Instant::now();
            let front = evolutionary_search(graph, start, goal, &config)?;
            let runtime = clock.elapsed().as_secs_f64();
            let fastest = front.first();

            Ok(AlgorithmResult {
                algorithm: "Evolutionary".to_string(),
                query: query.to_string(),
                feasible: !front.is_empty(),
                time: fastest.map(|p| p.objectives.time),
                cost: fastest.map(|p| p.objectives.cost),
                transfers: fastest.map(|p| p.route.transfers()),
                front_size: Some(front.len()),
                rounds_used: None,
                runtime,
            })
        };

        let seeds: Vec<u64> = (0..self.config.num_runs as u64).collect();
        if self.config.parallel {
            seeds.par_iter().map(|&seed| single(seed)).collect()
        } else {
            seeds.iter().map(|&seed| single(seed)).collect()
        }
    }

    /// Run the benchmark on many queries
    pub fn run_on_queries(&mut self, graph: &TransportGraph, queries: &[(NodeIndex, NodeIndex)]) -> Result<()> {
        for &(start, goal) in queries {
            self.run_query(graph, start, goal)?;
        }
        Ok(())
    }

    /// Compute statistics for each algorithm
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut stats_map: HashMap<String, Vec<&AlgorithmResult>> = HashMap::new();

        for result in &self.results {
            stats_map.entry(result.algorithm.clone()).or_default().push(result);
        }

        let mut statistics = Vec::new();

        for (algo, results) in stats_map {
            let times: Vec<f64> = results.iter().filter_map(|r| r.time).collect();
            let costs: Vec<f64> = results.iter().filter_map(|r| r.cost).collect();
            let runtimes: Vec<f64> = results.iter().map(|r| r.runtime).collect();

            let (avg_time, std_time) = match times.len() {
                0 => (f64::NAN, f64::NAN),
                1 => (times[0], 0.0),
                _ => (times.iter().mean(), times.iter().std_dev()),
            };
            let avg_cost = if costs.is_empty() { f64::NAN } else { costs.iter().mean() };

            statistics.push(AlgorithmStatistics {
                algorithm: algo,
                num_runs: results.len(),
                num_feasible: times.len(),
                avg_time,
                std_time,
                avg_cost,
                avg_runtime: runtimes.iter().mean(),
                total_runtime: runtimes.iter().sum(),
            });
        }

        statistics.sort_by(|a, b| a.avg_time.total_cmp(&b.avg_time));

        statistics
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("     Multimodal Routing Benchmark\n");
        report.push_str("========================================\n");
        report.push_str(&format!("Generated: {}\n\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));

        report.push_str("Algorithm Performance Summary:\n");
        report.push_str("-".repeat(80).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<15} {:>10} {:>12} {:>10} {:>12} {:>14}\n",
            "Algorithm", "Feasible", "Avg Time", "Std", "Avg Cost", "Avg Runtime"
        ));
        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            report.push_str(&format!(
                "{:<15} {:>10} {:>12.2} {:>10.2} {:>12.2} {:>13.4}s\n",
                stat.algorithm,
                format!("{}/{}", stat.num_feasible, stat.num_runs),
                stat.avg_time,
                stat.std_time,
                stat.avg_cost,
                stat.avg_runtime
            ));
        }

        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        report.push_str("\nFastest route per query:\n");

        let mut query_best: HashMap<&str, &AlgorithmResult> = HashMap::new();
        for result in &self.results {
            let Some(time) = result.time else { continue };
            let entry = query_best.entry(result.query.as_str()).or_insert(result);
            if entry.time.is_some_and(|t| time < t) {
                *entry = result;
            }
        }

        let mut queries: Vec<_> = query_best.into_iter().collect();
        queries.sort_by(|a, b| a.0.cmp(b.0));
        for (query, best) in queries {
            report.push_str(&format!(
                "  {}: {:.1} min ({})\n",
                query,
                best.time.unwrap_or(f64::NAN),
                best.algorithm
            ));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }
}

/// Ordered pairs of distinct nodes, at most `limit` of them
pub fn all_queries(graph: &TransportGraph, limit: Option<usize>) -> Vec<(NodeIndex, NodeIndex)> {
    let n = graph.node_count();
    let pairs = (0..n).flat_map(|s| (0..n).filter(move |&g| g != s).map(move |g| (s, g)));
    match limit {
        Some(limit) => pairs.take(limit).collect(),
        None => pairs.collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::test_graphs::sample_city;

    fn quick_config(parallel: bool) -> BenchmarkConfig {
        let mut search = SearchConfig::default();
        search.evolution.population_size = 16;
        search.evolution.generations = 8;
        BenchmarkConfig { num_runs: 3, parallel, search }
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 5);
    }

    #[test]
    fn test_run_query_records_every_algorithm() {
        let g = sample_city();
        let mut bench = Benchmark::new(quick_config(true));
        bench.run_query(&g, 0, 5).unwrap();

        let results = bench.results();
        assert_eq!(results.len(), 2 + 3);
        assert!(results.iter().all(|r| r.query == "A->F" && r.feasible));
        assert_eq!(results[0].time, Some(9.0));

        let stats = bench.compute_statistics();
        assert_eq!(stats.len(), 3);
        let evo = stats.iter().find(|s| s.algorithm == "Evolutionary").unwrap();
        assert_eq!(evo.num_runs, 3);

        let report = bench.generate_report();
        assert!(report.contains("A->F: 9.0 min"));
    }

    #[test]
    fn test_parallel_runs_match_sequential() {
        let g = sample_city();
        let mut parallel = Benchmark::new(quick_config(true));
        let mut sequential = Benchmark::new(quick_config(false));
        parallel.run_query(&g, 2, 6).unwrap();
        sequential.run_query(&g, 2, 6).unwrap();

        let fronts = |b: &Benchmark| -> Vec<(Option<usize>, Option<f64>)> {
            b.results().iter().map(|r| (r.front_size, r.time)).collect()
        };
        assert_eq!(fronts(&parallel), fronts(&sequential));
    }

    #[test]
    fn test_all_queries_and_csv_export() {
        let g = sample_city();
        assert_eq!(all_queries(&g, None).len(), 7 * 6);
        let queries = all_queries(&g, Some(2));
        assert_eq!(queries, vec![(0, 1), (0, 2)]);

        let mut bench = Benchmark::new(quick_config(false));
        bench.run_on_queries(&g, &queries).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        bench.export_to_csv(&path).unwrap();
        bench.export_statistics_csv(dir.path().join("stats.csv")).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<AlgorithmResult> = reader.deserialize().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), bench.results().len());
    }
}
