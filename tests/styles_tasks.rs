//! End-to-end tests for the stylesheet build tasks.
//!
//! Each test sets up a throwaway project directory, runs the library-level
//! tasks against it, and inspects the produced output.

use std::fs;
use std::io::{BufRead, BufReader};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use stylemill::clean::clean;
use stylemill::config::StyleConfig;
use stylemill::lint::run_lint;
use stylemill::reload::{ReloadHandle, ReloadServer};
use stylemill::task::{run_styles, StylePipeline, TaskContext};
use tempfile::TempDir;

/// Create a project directory with the given stylesheet files and a context
/// using the default configuration.
fn project(files: &[(&str, &str)]) -> (TempDir, TaskContext) {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("styles")).unwrap();

    for (name, content) in files {
        let path = temp.path().join("styles").join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    let ctx = TaskContext::new(StyleConfig::default(), temp.path().to_path_buf());
    (temp, ctx)
}

#[test]
fn build_produces_css_and_source_map() {
    let (temp, ctx) = project(&[("a.scss", "body {\n  margin: 0;\n  padding: 0;\n}\n")]);

    let report = StylePipeline::new(ctx).build().unwrap();
    assert!(report.is_success());
    assert_eq!(report.success_count(), 1);

    let css = fs::read_to_string(temp.path().join("dist/css/a.css")).unwrap();
    assert!(css.contains("margin"));
    assert!(css.contains("sourceMappingURL=a.css.map"));

    let map = fs::read_to_string(temp.path().join("dist/css/a.css.map")).unwrap();
    assert!(map.contains("mappings"));
}

#[test]
fn zero_match_globs_complete_without_error() {
    let (_temp, ctx) = project(&[]);

    let lint_report = run_lint(&ctx, false).unwrap();
    assert_eq!(lint_report.files_checked, 0);

    let build_report = StylePipeline::new(ctx.clone()).build().unwrap();
    assert!(build_report.is_success());
    assert!(build_report.files.is_empty());

    let removed = clean(&ctx).unwrap();
    // The fresh dest directory created by the build is the only thing there
    assert!(removed.len() <= 1);
}

#[test]
fn styles_builds_even_with_lint_violations() {
    let (temp, ctx) = project(&[
        ("bad.scss", ".bad { color: red !important; }\n"),
        ("good.scss", ".good { color: #abc; }\n"),
    ]);

    let outcome = run_styles(&ctx, None, &ReloadHandle::disconnected()).unwrap();

    let lint = outcome.lint.expect("lint should have completed");
    assert!(lint.error_count() > 0, "fixture should trip the no-important rule");

    assert!(outcome.build.is_success());
    assert!(temp.path().join("dist/css/bad.css").exists());
    assert!(temp.path().join("dist/css/good.css").exists());
}

#[test]
fn build_continues_past_broken_files() {
    let (temp, ctx) = project(&[
        ("broken.scss", ".a { color: ; }\n"),
        ("good.scss", ".b { margin: 0; }\n"),
    ]);

    let report = StylePipeline::new(ctx).build().unwrap();
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.success_count(), 1);
    assert!(temp.path().join("dist/css/good.css").exists());
    assert!(!temp.path().join("dist/css/broken.css").exists());
}

#[test]
fn minify_flag_shrinks_output_and_keeps_prefixes() {
    let source = ".row {\n  display: flex;\n  color: #ffffff;\n  margin: 0px 0px 0px 0px;\n}\n\
                  .column {\n  display: flex;\n  color: #ffffff;\n}\n";

    let mut config = StyleConfig::default();
    config.targets.safari = Some("8".to_string());
    config.targets.ios = Some("8".to_string());

    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("styles")).unwrap();
    fs::write(temp.path().join("styles/grid.scss"), source).unwrap();

    let ctx = TaskContext::new(config, temp.path().to_path_buf());

    StylePipeline::new(ctx.clone()).build().unwrap();
    let pretty = fs::read_to_string(temp.path().join("dist/css/grid.css")).unwrap();

    StylePipeline::new(ctx).with_minify(true).build().unwrap();
    let minified = fs::read_to_string(temp.path().join("dist/css/grid.css")).unwrap();

    assert!(minified.len() <= pretty.len());
    assert!(pretty.contains("-webkit-"), "expected prefixes in pretty output:\n{}", pretty);
    assert!(minified.contains("-webkit-"), "expected prefixes in minified output:\n{}", minified);
}

#[test]
fn clean_twice_is_a_noop_the_second_time() {
    let (temp, ctx) = project(&[("a.scss", "body { margin: 0; }\n")]);

    StylePipeline::new(ctx.clone()).build().unwrap();
    assert!(temp.path().join("dist/css/a.css").exists());

    let first = clean(&ctx).unwrap();
    assert_eq!(first.len(), 1);
    assert!(!temp.path().join("dist/css").exists());

    let second = clean(&ctx).unwrap();
    assert!(second.is_empty());
}

#[test]
fn incremental_lint_skips_unchanged_files() {
    let (_temp, ctx) = project(&[
        ("a.scss", ".a { color: #abc; }\n"),
        ("b.scss", ".b { margin: 0; }\n"),
    ]);

    let first = run_lint(&ctx, false).unwrap();
    assert_eq!(first.files_checked, 2);

    let second = run_lint(&ctx, false).unwrap();
    assert_eq!(second.files_checked, 0);
    assert!(second.is_clean());
}

#[test]
fn build_notifies_connected_reload_clients() {
    let (_temp, ctx) = project(&[("a.scss", "body { margin: 0; }\n")]);

    let server = ReloadServer::bind(0).unwrap();
    let client = TcpStream::connect(server.local_addr()).unwrap();

    for _ in 0..50 {
        if server.client_count() > 0 {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }

    let report = StylePipeline::new(ctx).with_reload(server.handle()).build().unwrap();
    assert!(report.is_success());

    let mut reader = BufReader::new(client);
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    assert!(line.contains("\"event\":\"update\""));
    assert!(line.contains("a.css"));
}

#[test]
fn partials_are_linted_but_not_compiled() {
    let (temp, ctx) = project(&[
        ("_tokens.scss", "$ink: #ABCDEF;\n"),
        ("main.scss", "@use \"tokens\";\nbody { color: tokens.$ink; }\n"),
    ]);

    let lint = run_lint(&ctx, false).unwrap();
    assert_eq!(lint.files_checked, 2);
    assert_eq!(lint.warning_count(), 1, "uppercase hex in the partial should warn");

    let report = StylePipeline::new(ctx).build().unwrap();
    assert!(report.is_success());
    assert_eq!(report.files.len(), 1);
    assert!(temp.path().join("dist/css/main.css").exists());
    assert!(!temp.path().join("dist/css/_tokens.css").exists());
}
