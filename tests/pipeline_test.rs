use linkrank::algo::ScoreKind;
use linkrank::persistence::artifact::{COL_IND_FILE, VAL_FILE};
use linkrank::{
    compress_hits, inspect_cache, read_scores, run_hits, run_pagerank, Algorithm, RankError,
    RunConfig, SolverSettings, StorageError,
};
use linkrank_algorithms::AlgoError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a SNAP-style edge list and return its path
fn write_dataset(dir: &Path, name: &str, n: usize, edges: &[(i32, i32)]) -> PathBuf {
    let mut text = String::new();
    writeln!(text, "# Directed graph: {}.txt", name).unwrap();
    writeln!(text, "# Generated for tests").unwrap();
    writeln!(text, "# Nodes: {} Edges: {}", n, edges.len()).unwrap();
    writeln!(text, "# FromNodeId\tToNodeId").unwrap();
    for (s, t) in edges {
        writeln!(text, "{}\t{}", s, t).unwrap();
    }
    let path = dir.join(format!("{}.txt", name));
    fs::write(&path, text).unwrap();
    path
}

fn config(tmp: &TempDir, input: PathBuf) -> RunConfig {
    RunConfig::new(input)
        .unwrap()
        .with_cache_root(tmp.path().join("cache"))
        .with_output_dir(tmp.path().join("out"))
}

#[test]
fn test_four_cycle_pagerank_and_cached_rerun() {
    let tmp = TempDir::new().unwrap();
    let input = write_dataset(tmp.path(), "cycle", 4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
    let config = config(&tmp, input.clone());

    let first = run_pagerank(&config).unwrap();
    assert!(!first.cache_hit);
    assert!(first.converged);
    assert_eq!(first.graph.node_count, 4);
    assert_eq!(first.graph.edge_count, 4);
    assert_eq!(first.graph.dangling_count, Some(0));
    assert_eq!(first.cache_dir, tmp.path().join("cache").join("PR_cycle"));
    assert_eq!(first.result_path, tmp.path().join("out").join("cycle.pr"));

    let scores = read_scores(&first.result_path).unwrap();
    assert_eq!(scores.len(), 4);
    for s in &scores {
        assert!((s - 0.25).abs() <= 1e-10);
    }

    // The second run must not touch the text input at all
    fs::remove_file(&input).unwrap();
    let second = run_pagerank(&config).unwrap();
    assert!(second.cache_hit);
    assert_eq!(read_scores(&second.result_path).unwrap(), scores);
}

#[test]
fn test_random_graph_pagerank_sums_to_one() {
    let tmp = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    let n = 300;
    let edges: Vec<(i32, i32)> = (0..2000)
        .map(|_| (rng.gen_range(0..n as i32), rng.gen_range(0..n as i32)))
        .collect();
    let input = write_dataset(tmp.path(), "random", n, &edges);
    let config = config(&tmp, input).with_top_k(Some(5));

    let report = run_pagerank(&config).unwrap();
    assert!((report.score_sum - 1.0).abs() < 1e-9);

    let top = report.top_k.unwrap();
    assert_eq!(top.kind, ScoreKind::PageRank);
    assert_eq!(top.nodes.len(), 5);
    assert!(top.nodes.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(top.report_path, tmp.path().join("out").join("random_pr_k5.csv"));

    let csv = fs::read_to_string(&top.report_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("n1,n2,jac"));
    // 5 choose 2 pairs
    assert_eq!(lines.count(), 10);
}

#[test]
fn test_hits_star_with_jaccard_reports() {
    let tmp = TempDir::new().unwrap();
    let input = write_dataset(tmp.path(), "star", 5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
    let config = config(&tmp, input).with_top_k(Some(2));

    let report = run_hits(&config).unwrap();
    assert!(!report.cache_hit);
    assert!((report.authority_sum - 1.0).abs() < 1e-12);
    assert!((report.hub_sum - 1.0).abs() < 1e-12);

    let authorities = read_scores(&report.authority_path).unwrap();
    let hubs = read_scores(&report.hub_path).unwrap();
    assert_eq!(authorities, vec![0.0, 0.25, 0.25, 0.25, 0.25]);
    assert_eq!(hubs, vec![1.0, 0.0, 0.0, 0.0, 0.0]);

    // Ties go to the lower id; nodes 1 and 2 share their only predecessor
    let top_a = report.top_authorities.unwrap();
    assert_eq!(top_a.nodes.iter().map(|r| r.node).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(
        fs::read_to_string(&top_a.report_path).unwrap(),
        "n1,n2,jac\n1,2,1.000\n"
    );

    let top_h = report.top_hubs.unwrap();
    assert_eq!(top_h.nodes.iter().map(|r| r.node).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(top_h.report_path, tmp.path().join("out").join("star_h_k2.csv"));
    assert_eq!(
        fs::read_to_string(&top_h.report_path).unwrap(),
        "n1,n2,jac\n0,1,0.000\n"
    );
}

#[test]
fn test_corrupt_cache_is_removed_then_rebuilt() {
    let tmp = TempDir::new().unwrap();
    let input = write_dataset(tmp.path(), "chain", 3, &[(0, 1), (1, 2)]);
    let config = config(&tmp, input);
    let cache_dir = config.cache_dir(Algorithm::PageRank);

    run_pagerank(&config).unwrap();
    fs::write(cache_dir.join(VAL_FILE), [0u8; 4]).unwrap();

    let err = run_pagerank(&config).unwrap_err();
    assert!(matches!(
        err,
        RankError::Mapping {
            source: StorageError::Truncated { .. },
            ..
        }
    ));
    assert!(!cache_dir.exists());

    let rebuilt = run_pagerank(&config).unwrap();
    assert!(!rebuilt.cache_hit);
    assert!((rebuilt.score_sum - 1.0).abs() < 1e-9);
}

#[test]
fn test_missing_hits_file_is_reported_as_mapping_failure() {
    let tmp = TempDir::new().unwrap();
    let input = write_dataset(tmp.path(), "pair", 2, &[(0, 1), (1, 0)]);
    let config = config(&tmp, input);

    compress_hits(&config).unwrap();
    let cache_dir = config.cache_dir(Algorithm::Hits);
    fs::remove_file(cache_dir.join(COL_IND_FILE)).unwrap();

    assert!(matches!(
        run_hits(&config),
        Err(RankError::Mapping {
            source: StorageError::Missing(_),
            ..
        })
    ));
    assert!(!cache_dir.exists());
}

#[test]
fn test_malformed_input_leaves_no_cache() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("broken.txt");
    fs::write(&input, "# a\n# b\n# Vertices: 3 Arcs: 2\n# c\n0 1\n1 2\n").unwrap();
    let config = config(&tmp, input);

    assert!(matches!(
        run_pagerank(&config),
        Err(RankError::MalformedInput { line: 3, .. })
    ));
    let cache_dir = config.cache_dir(Algorithm::PageRank);
    assert!(!cache_dir.exists());
    assert!(!cache_dir.with_file_name("PR_broken.partial").exists());
}

#[test]
fn test_top_k_larger_than_graph_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let input = write_dataset(tmp.path(), "small", 3, &[(0, 1), (1, 2), (2, 0)]);
    let config = config(&tmp, input).with_top_k(Some(4));

    assert!(matches!(
        run_pagerank(&config),
        Err(RankError::Algorithm(AlgoError::TopKOutOfRange { k: 4, node_count: 3 }))
    ));
    assert!(!config.pagerank_result_path().exists());
}

#[test]
fn test_iteration_cap_from_settings() {
    let tmp = TempDir::new().unwrap();
    let input = write_dataset(tmp.path(), "dangling", 3, &[(0, 1), (1, 2)]);
    let settings = SolverSettings::from_yaml_str("max_iterations: 2\n").unwrap();
    let config = config(&tmp, input).with_solver(settings).unwrap();

    let report = run_pagerank(&config).unwrap();
    assert_eq!(report.iterations, 2);
    assert!(!report.converged);
    // Dangling mass is redistributed, so the vector still sums to one
    assert!((report.score_sum - 1.0).abs() < 1e-12);
}

#[test]
fn test_inspect_cache() {
    let tmp = TempDir::new().unwrap();
    let input = write_dataset(tmp.path(), "tri", 3, &[(0, 1), (1, 2), (2, 0), (0, 2)]);
    let config = config(&tmp, input);

    assert!(matches!(
        inspect_cache(&config, Algorithm::Hits),
        Err(RankError::Config(_))
    ));

    compress_hits(&config).unwrap();
    let report = inspect_cache(&config, Algorithm::Hits).unwrap();
    assert_eq!(report.graph.node_count, 3);
    assert_eq!(report.graph.edge_count, 4);
    assert_eq!(report.graph.dangling_count, None);
    assert_eq!(report.dataset.as_str(), "tri");
}

#[test]
fn test_reports_serialize_to_json() {
    let tmp = TempDir::new().unwrap();
    let input = write_dataset(tmp.path(), "json", 2, &[(0, 1), (1, 0)]);
    let config = config(&tmp, input).with_top_k(Some(1));

    let report = run_hits(&config).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["dataset"], "json");
    assert_eq!(value["cache_hit"], false);
    assert_eq!(value["graph"]["node_count"], 2);
    assert_eq!(value["top_authorities"]["kind"], "authority");
    assert_eq!(value["top_hubs"]["nodes"][0]["rank"], 1);
}

#[test]
fn test_unwritable_output_dir_is_a_result_write_failure() {
    let tmp = TempDir::new().unwrap();
    let input = write_dataset(tmp.path(), "cycle3", 3, &[(0, 1), (1, 2), (2, 0)]);
    // The output directory would have to live under a regular file
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, b"x").unwrap();
    let config = RunConfig::new(input)
        .unwrap()
        .with_cache_root(tmp.path().join("cache"))
        .with_output_dir(blocker.join("out"));

    let err = run_pagerank(&config).unwrap_err();
    assert!(matches!(
        err,
        RankError::ResultWrite {
            source: StorageError::Io { .. },
            ..
        }
    ));
    assert!(!config.pagerank_result_path().exists());
    // The cache itself was built and stays usable
    assert!(config.cache_dir(Algorithm::PageRank).exists());
}
