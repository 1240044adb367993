mod common;

use buildscope::analysis::ChangeAnalyzer;
use buildscope::config::AnalyzerConfig;
use common::{commit, StaticCommits, WorkspaceFixture};

fn analyzer(fixture: &WorkspaceFixture, config: AnalyzerConfig) -> ChangeAnalyzer {
    ChangeAnalyzer::new(fixture.root(), config).unwrap()
}

#[test]
fn single_file_change() {
    let _lock = common::analysis_lock();
    let fixture = WorkspaceFixture::new(&[
        ("a.cpp", "int a;\n"),
        ("b.cpp", "int b;\n"),
    ]);
    let provider = StaticCommits::new(vec![commit("c1", "touch a", &["a.cpp"])]);

    let report = analyzer(&fixture, AnalyzerConfig::default())
        .analyze(&provider)
        .unwrap();

    assert_eq!(report.total_project_files, 2);
    assert_eq!(report.all_rebuild_files, vec!["a.cpp"]);
    assert_eq!(report.global_impact_pct, 50.0);
    assert_eq!(report.commit_impacts.len(), 1);
    assert_eq!(report.commit_impacts[0].impact_pct, 50.0);
}

#[test]
fn header_fan_out_hits_everything() {
    let _lock = common::analysis_lock();
    let fixture = WorkspaceFixture::new(&[
        ("a.cpp", "#include \"util.h\"\n"),
        ("b.cpp", "#include \"util.h\"\n"),
        ("c.cpp", "#include \"util.h\"\n"),
        ("util.h", "\n"),
    ]);
    let provider = StaticCommits::new(vec![commit("c1", "tweak util", &["util.h"])]);

    let report = analyzer(&fixture, AnalyzerConfig::default())
        .analyze(&provider)
        .unwrap();

    assert_eq!(report.total_project_files, 4);
    assert_eq!(report.total_affected_files, 4);
    assert_eq!(report.global_impact_pct, 100.0);
    assert_eq!(
        report.all_rebuild_files,
        vec!["a.cpp", "b.cpp", "c.cpp", "util.h"]
    );
}

#[test]
fn transitive_header_chain() {
    let _lock = common::analysis_lock();
    let fixture = WorkspaceFixture::new(&[
        ("a.cpp", "#include \"x.h\"\n"),
        ("x.h", "#include \"y.h\"\n"),
        ("y.h", "\n"),
    ]);
    let provider = StaticCommits::new(vec![commit("c1", "edit y", &["y.h"])]);

    let report = analyzer(&fixture, AnalyzerConfig::default())
        .analyze(&provider)
        .unwrap();

    for expected in ["y.h", "x.h", "a.cpp"] {
        assert!(
            report.all_rebuild_files.iter().any(|f| f == expected),
            "missing {expected}"
        );
    }
}

#[test]
fn project_scope_narrows_denominator_and_results() {
    let _lock = common::analysis_lock();
    // Ten files on disk; the project builds four of them. shared.h is
    // included by six, three of which are in scope.
    let fixture = WorkspaceFixture::new(&[
        ("shared.h", "\n"),
        ("in1.cpp", "#include \"shared.h\"\n"),
        ("in2.cpp", "#include \"shared.h\"\n"),
        ("in3.cpp", "#include \"shared.h\"\n"),
        ("out1.cpp", "#include \"shared.h\"\n"),
        ("out2.cpp", "#include \"shared.h\"\n"),
        ("out3.cpp", "#include \"shared.h\"\n"),
        ("in4.cpp", "int other;\n"),
        ("out4.cpp", "int other;\n"),
        ("out5.cpp", "int other;\n"),
        (
            "scoped.vcxproj",
            r#"<Project>
  <ItemGroup>
    <ClCompile Include="in1.cpp" />
    <ClCompile Include="in2.cpp" />
    <ClCompile Include="in3.cpp" />
    <ClCompile Include="in4.cpp" />
  </ItemGroup>
</Project>"#,
        ),
    ]);
    let provider = StaticCommits::new(vec![commit("c1", "edit shared", &["shared.h"])]);

    let config = AnalyzerConfig {
        project_file: "scoped.vcxproj".to_string(),
        ..AnalyzerConfig::default()
    };
    let report = analyzer(&fixture, config).analyze(&provider).unwrap();

    assert_eq!(report.total_project_files, 4);
    assert_eq!(report.total_affected_files, 3);
    assert_eq!(report.all_rebuild_files, vec!["in1.cpp", "in2.cpp", "in3.cpp"]);
    assert_eq!(report.global_impact_pct, 75.0);
}

#[test]
fn no_incoming_commits_is_zero_impact() {
    let _lock = common::analysis_lock();
    let fixture = WorkspaceFixture::new(&[("a.cpp", "\n")]);
    let provider = StaticCommits::new(vec![]);

    let report = analyzer(&fixture, AnalyzerConfig::default())
        .analyze(&provider)
        .unwrap();

    assert!(report.commit_impacts.is_empty());
    assert_eq!(report.global_impact_pct, 0.0);
    assert_eq!(report.total_affected_files, 0);
    assert!(report.all_rebuild_files.is_empty());
}

#[test]
fn non_cpp_workspace_falls_back_to_tracked_count() {
    let _lock = common::analysis_lock();
    let fixture = WorkspaceFixture::new(&[
        ("README.md", "# app\n"),
        ("app.py", "print('hi')\n"),
    ]);
    let provider = StaticCommits::with_tracked_files(
        vec![commit("c1", "docs", &["README.md", "app.py"])],
        20,
    );

    let report = analyzer(&fixture, AnalyzerConfig::default())
        .analyze(&provider)
        .unwrap();

    assert_eq!(report.total_project_files, 20);
    assert_eq!(report.total_affected_files, 2);
    assert_eq!(report.global_impact_pct, 10.0);
    // No C/C++ graph: changed files are not expanded
    assert_eq!(report.commit_impacts[0].rebuild_files.len(), 2);
}

#[test]
fn multiple_commits_union_drives_global_impact() {
    let _lock = common::analysis_lock();
    let fixture = WorkspaceFixture::new(&[
        ("a.cpp", "#include \"u.h\"\n"),
        ("b.cpp", "#include \"u.h\"\n"),
        ("c.cpp", "int c;\n"),
        ("d.cpp", "int d;\n"),
        ("u.h", "\n"),
    ]);
    let provider = StaticCommits::new(vec![
        commit("c1", "edit header", &["u.h"]),
        commit("c2", "edit c", &["c.cpp"]),
        // a.cpp is already in c1's closure; the union must not double-count
        commit("c3", "edit a", &["a.cpp"]),
    ]);

    let report = analyzer(&fixture, AnalyzerConfig::default())
        .analyze(&provider)
        .unwrap();

    assert_eq!(report.commit_impacts.len(), 3);
    assert_eq!(report.commit_impacts[0].rebuild_files.len(), 3); // u.h, a.cpp, b.cpp
    assert_eq!(report.commit_impacts[1].rebuild_files.len(), 1);
    assert_eq!(report.commit_impacts[2].rebuild_files.len(), 1);
    assert_eq!(report.total_affected_files, 4);
    assert_eq!(report.total_project_files, 5);
    assert_eq!(report.global_impact_pct, 80.0);
}

#[test]
fn short_ids_surface_in_commit_impacts() {
    let _lock = common::analysis_lock();
    let fixture = WorkspaceFixture::new(&[("a.cpp", "\n")]);
    let provider = StaticCommits::new(vec![commit("deadbeefcafe", "m", &["a.cpp"])]);

    let report = analyzer(&fixture, AnalyzerConfig::default())
        .analyze(&provider)
        .unwrap();

    let commit = &report.commit_impacts[0].commit;
    assert_eq!(commit.short_id, "deadbeef");
    assert_eq!(commit.full_id.len(), 40);
}
