mod common;

use buildscope::graph::cache::GraphCache;
use buildscope::graph::scanner::ScanOptions;
use buildscope::graph::DependencyGraph;
use common::WorkspaceFixture;
use std::collections::HashSet;

fn build_graph(fixture: &WorkspaceFixture) -> DependencyGraph {
    let mut graph = DependencyGraph::new(fixture.root().to_path_buf());
    graph.build(&ScanOptions::default()).unwrap();
    graph
}

fn affected(graph: &DependencyGraph, changed: &[&str]) -> HashSet<String> {
    let changed: Vec<String> = changed.iter().map(|s| s.to_string()).collect();
    graph.affected(&changed)
}

#[test]
fn source_change_does_not_propagate() {
    let fixture = WorkspaceFixture::new(&[
        ("a.cpp", "int main() { return 0; }\n"),
        ("b.cpp", "#include \"a.cpp\"\n"),
    ]);
    let graph = build_graph(&fixture);

    // b.cpp includes a.cpp, but source changes never ripple
    let result = affected(&graph, &["a.cpp"]);
    assert_eq!(result, HashSet::from(["a.cpp".to_string()]));
}

#[test]
fn header_change_propagates_transitively() {
    let fixture = WorkspaceFixture::new(&[
        ("a.cpp", "#include \"b.h\"\n"),
        ("b.h", "#include \"c.h\"\n"),
        ("c.h", "struct C {};\n"),
    ]);
    let graph = build_graph(&fixture);

    let result = affected(&graph, &["c.h"]);
    for expected in ["c.h", "b.h", "a.cpp"] {
        assert!(result.contains(expected), "missing {expected}");
    }
}

#[test]
fn include_cycles_terminate() {
    let fixture = WorkspaceFixture::new(&[
        ("x.h", "#include \"y.h\"\n"),
        ("y.h", "#include \"x.h\"\n"),
        ("user.cpp", "#include \"x.h\"\n"),
    ]);
    let graph = build_graph(&fixture);

    let result = affected(&graph, &["y.h"]);
    assert_eq!(
        result,
        HashSet::from([
            "x.h".to_string(),
            "y.h".to_string(),
            "user.cpp".to_string()
        ])
    );
}

#[test]
fn dependent_count_is_direct_only() {
    let fixture = WorkspaceFixture::new(&[
        ("util.h", "\n"),
        ("a.cpp", "#include \"util.h\"\n"),
        ("b.cpp", "#include \"util.h\"\n"),
        ("indirect.h", "#include \"util.h\"\n"),
        ("c.cpp", "#include \"indirect.h\"\n"),
    ]);
    let graph = build_graph(&fixture);

    assert_eq!(graph.dependent_count("util.h"), 3);
    assert_eq!(graph.dependent_count("indirect.h"), 1);
    assert_eq!(graph.dependent_count("c.cpp"), 0);
    assert_eq!(graph.dependent_count("missing.h"), 0);
}

#[test]
fn repeated_build_parses_nothing() {
    let fixture = WorkspaceFixture::new(&[
        ("a.cpp", "#include \"util.h\"\n"),
        ("util.h", "\n"),
    ]);
    let mut graph = DependencyGraph::new(fixture.root().to_path_buf());

    let first = graph.build(&ScanOptions::default()).unwrap();
    assert_eq!(first.parsed, 2);

    let second = graph.build(&ScanOptions::default()).unwrap();
    assert_eq!(second.parsed, 0);
    assert_eq!(second.discovered, 2);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn incremental_reparse_touches_only_changed_file() {
    let fixture = WorkspaceFixture::new(&[
        ("a.cpp", "#include \"x.h\"\n"),
        ("x.h", "#include \"y.h\"\n"),
        ("y.h", "\n"),
    ]);
    let mut graph = DependencyGraph::new(fixture.root().to_path_buf());
    graph.build(&ScanOptions::default()).unwrap();

    fixture.touch("x.h");
    let stats = graph.build(&ScanOptions::default()).unwrap();
    assert_eq!(stats.parsed, 1);

    // Closure identical to what a cold rebuild would produce
    let mut cold = DependencyGraph::new(fixture.root().to_path_buf());
    cold.build(&ScanOptions::default()).unwrap();
    assert_eq!(affected(&graph, &["y.h"]), affected(&cold, &["y.h"]));
}

#[test]
fn removed_files_are_purged() {
    let fixture = WorkspaceFixture::new(&[
        ("a.cpp", "#include \"dead.h\"\n"),
        ("dead.h", "\n"),
    ]);
    let mut graph = DependencyGraph::new(fixture.root().to_path_buf());
    graph.build(&ScanOptions::default()).unwrap();
    assert!(graph.contains("dead.h"));
    assert_eq!(graph.dependent_count("dead.h"), 1);

    std::fs::remove_file(fixture.root().join("dead.h")).unwrap();
    let stats = graph.build(&ScanOptions::default()).unwrap();
    assert_eq!(stats.removed, 1);
    assert!(!graph.contains("dead.h"));
    assert_eq!(graph.dependent_count("dead.h"), 0);
}

#[test]
fn warm_start_restores_queries_without_reparsing() {
    let fixture = WorkspaceFixture::new(&[
        ("a.cpp", "#include \"util.h\"\n"),
        ("b.cpp", "#include \"util.h\"\n"),
        ("util.h", "\n"),
    ]);
    let mut graph = DependencyGraph::new(fixture.root().to_path_buf());
    graph.build(&ScanOptions::default()).unwrap();
    let snapshot = graph.to_cache();
    assert_eq!(snapshot.files.len(), 3);

    let mut warm = DependencyGraph::new(fixture.root().to_path_buf());
    assert!(warm.load_cache(snapshot));
    // Queries work straight from the snapshot
    assert_eq!(warm.dependent_count("util.h"), 2);

    // And a subsequent build re-parses nothing
    let stats = warm.build(&ScanOptions::default()).unwrap();
    assert_eq!(stats.parsed, 0);
}

#[test]
fn cache_for_other_root_is_discarded() {
    let fixture = WorkspaceFixture::new(&[("a.cpp", "\n")]);
    let mut graph = DependencyGraph::new(fixture.root().to_path_buf());

    let foreign = GraphCache {
        root_path: "/somewhere/else".to_string(),
        built_at: "2024-05-01T10:00:00+00:00".to_string(),
        files: std::collections::HashMap::new(),
    };
    assert!(!graph.load_cache(foreign));
    assert_eq!(graph.file_count(), 0);
}

#[test]
fn project_scope_filters_affected_and_denominator() {
    let fixture = WorkspaceFixture::new(&[
        ("shared.h", "\n"),
        ("in_a.cpp", "#include \"shared.h\"\n"),
        ("in_b.cpp", "#include \"shared.h\"\n"),
        ("out_c.cpp", "#include \"shared.h\"\n"),
        ("other.cpp", "\n"),
    ]);
    let mut graph = DependencyGraph::new(fixture.root().to_path_buf());
    let scope: HashSet<String> = ["in_a.cpp", "in_b.cpp", "other.cpp"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    graph.set_project_scope(Some(scope.clone()));
    graph.build(&ScanOptions::default()).unwrap();

    assert_eq!(graph.total_files(), 3);

    let result = affected(&graph, &["shared.h"]);
    assert!(result.is_subset(&scope));
    assert_eq!(
        result,
        HashSet::from(["in_a.cpp".to_string(), "in_b.cpp".to_string()])
    );
}

#[test]
fn changed_paths_outside_graph_still_count_themselves() {
    let fixture = WorkspaceFixture::new(&[("a.cpp", "\n")]);
    let graph = build_graph(&fixture);

    let result = affected(&graph, &["docs/readme.md"]);
    assert_eq!(result, HashSet::from(["docs/readme.md".to_string()]));
}

#[cfg(unix)]
#[test]
fn symlinked_directory_cycle_scans_once() {
    let fixture = WorkspaceFixture::new(&[
        ("src/a.cpp", "#include \"a.h\"\n"),
        ("src/a.h", "\n"),
    ]);
    std::os::unix::fs::symlink(
        fixture.root().join("src"),
        fixture.root().join("src/cycle"),
    )
    .unwrap();

    let mut graph = DependencyGraph::new(fixture.root().to_path_buf());
    let stats = graph.build(&ScanOptions::default()).unwrap();
    assert_eq!(stats.discovered, 2);
    assert_eq!(graph.file_count(), 2);
    assert_eq!(graph.dependent_count("src/a.h"), 1);
}
