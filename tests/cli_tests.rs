use clap::Parser;
use visual_edit::{
    VisualEditOptions,
    cli::{
        commands::{cmd_inject, cmd_replay, cmd_tag, load_scripts},
        config::{Cli, Commands, resolve_options},
    },
    tagger::tree_model::MarkupNode,
};

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_tag_minimal() {
    let cli = Cli::parse_from(["visual-edit", "tag", "--input", "tree.json", "--path", "src/App.tsx"]);
    match cli.command {
        Commands::Tag {
            input,
            path,
            output,
            exclude,
            source_root,
        } => {
            assert_eq!(input, "tree.json");
            assert_eq!(path, "src/App.tsx");
            assert!(output.is_none());
            assert!(exclude.is_empty());
            assert!(source_root.is_none());
        }
        _ => panic!("Expected Tag command"),
    }
}

#[test]
fn cli_parse_tag_all_args() {
    let cli = Cli::parse_from([
        "visual-edit",
        "tag",
        "--input",
        "tree.json",
        "--path",
        "app/Main.tsx",
        "-o",
        "out.json",
        "--exclude",
        "generated/",
        "--exclude",
        "vendor",
        "--source-root",
        "app",
    ]);
    match cli.command {
        Commands::Tag {
            output,
            exclude,
            source_root,
            ..
        } => {
            assert_eq!(output.as_deref(), Some("out.json"));
            assert_eq!(exclude, vec!["generated/".to_string(), "vendor".to_string()]);
            assert_eq!(source_root.as_deref(), Some("app"));
        }
        _ => panic!("Expected Tag command"),
    }
}

#[test]
fn cli_parse_inject_defaults() {
    let cli = Cli::parse_from(["visual-edit", "inject", "--html", "index.html"]);
    match cli.command {
        Commands::Inject {
            html,
            mode,
            command,
            output,
        } => {
            assert_eq!(html, "index.html");
            assert_eq!(mode, "development");
            assert_eq!(command, "build");
            assert!(output.is_none());
        }
        _ => panic!("Expected Inject command"),
    }
}

#[test]
fn cli_parse_replay_and_globals() {
    let cli = Cli::parse_from([
        "visual-edit",
        "-vv",
        "--config",
        "custom.yaml",
        "replay",
        "--script",
        "scripts/",
        "--trace",
        "trace.jsonl",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    match cli.command {
        Commands::Replay { script, trace } => {
            assert_eq!(script, "scripts/");
            assert_eq!(trace.as_deref(), Some("trace.jsonl"));
        }
        _ => panic!("Expected Replay command"),
    }
}

#[test]
fn cli_parse_config_command() {
    let cli = Cli::parse_from(["visual-edit", "config"]);
    assert!(matches!(cli.command, Commands::Config));
    assert_eq!(cli.verbose, 0);
}

// ============================================================================
// Option Resolution
// ============================================================================

#[test]
fn tag_flags_override_options_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("visual-edit.yaml");
    std::fs::write(&config_path, "source_root: web\nshow_badge: true\n").unwrap();
    let config_arg = config_path.to_str().unwrap();

    let cli = Cli::parse_from([
        "visual-edit",
        "--config",
        config_arg,
        "tag",
        "--input",
        "t.json",
        "--path",
        "app/App.tsx",
        "--source-root",
        "app",
        "--exclude",
        "legacy/",
    ]);
    let options = resolve_options(&cli);

    assert_eq!(options.source_root, "app");
    assert_eq!(options.exclude, vec!["legacy/".to_string()]);
    assert!(options.show_badge);
}

#[test]
fn other_commands_use_file_values() {
    let cli = Cli::parse_from(["visual-edit", "--config", "does_not_exist.yaml", "config"]);
    assert_eq!(resolve_options(&cli), VisualEditOptions::default());
}

// ============================================================================
// Command Tests
// ============================================================================

#[test]
fn cmd_tag_writes_tagged_tree() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tree.json");
    let output = dir.path().join("tagged.json");
    std::fs::write(
        &input,
        r#"[{ "kind": "element", "name": "p", "loc": { "line": 3, "column": 4 },
              "children": [{ "kind": "text", "value": "hi" }] }]"#,
    )
    .unwrap();

    cmd_tag(
        &VisualEditOptions::default(),
        input.to_str().unwrap(),
        "src/Hello.tsx",
        output.to_str(),
    )
    .unwrap();

    let tagged: Vec<MarkupNode> = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    match &tagged[0] {
        MarkupNode::Element(el) => {
            assert_eq!(el.attribute("data-source-location"), Some("Hello:3:4"));
            assert_eq!(el.attribute("data-dynamic-content"), Some("false"));
        }
        other => panic!("Expected element, got {:?}", other),
    }
}

#[test]
fn cmd_tag_reports_missing_input() {
    let result = cmd_tag(&VisualEditOptions::default(), "no/such/tree.json", "src/App.tsx", None);
    assert!(result.is_err());
}

#[test]
fn cmd_inject_writes_document() {
    let dir = tempfile::tempdir().unwrap();
    let html = dir.path().join("index.html");
    let output = dir.path().join("out.html");
    std::fs::write(&html, "<body></body>").unwrap();

    cmd_inject(
        &VisualEditOptions::default(),
        html.to_str().unwrap(),
        "development",
        "build",
        output.to_str(),
    )
    .unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("window.__VISUAL_EDIT_CONFIG__"));
    assert!(written.ends_with("</body>"));
}

const PASSING_SCRIPT: &str = r#"
name: "B hover"
page:
  nodes:
    - { id: 1, tag: div, location: "App:1:0", rect: { top: 50, left: 0, width: 100, height: 20 } }
options:
  default_enabled: true
  persist_state: false
steps:
  - action: hover
    node: 1
  - action: expect
    assertions:
      - { type: hover_count, expected: 1 }
"#;

#[test]
fn load_scripts_from_directory_sorted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.yaml"), PASSING_SCRIPT).unwrap();
    std::fs::write(
        dir.path().join("a.yml"),
        "name: \"A idle\"\nsteps:\n  - action: expect\n    assertions:\n      - { type: phase, expected: idle }\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a script").unwrap();

    let scripts = load_scripts(dir.path().to_str().unwrap()).unwrap();

    let names: Vec<&str> = scripts.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["A idle", "B hover"]);
}

#[test]
fn cmd_replay_reports_overall_result() {
    let dir = tempfile::tempdir().unwrap();
    let passing = dir.path().join("pass.yaml");
    std::fs::write(&passing, PASSING_SCRIPT).unwrap();
    assert!(cmd_replay(passing.to_str().unwrap(), None).unwrap());

    let failing = dir.path().join("fail.yaml");
    std::fs::write(&failing, PASSING_SCRIPT.replace("expected: 1", "expected: 3")).unwrap();
    assert!(!cmd_replay(failing.to_str().unwrap(), None).unwrap());
}

#[test]
fn cmd_replay_on_empty_directory_passes() {
    let dir = tempfile::tempdir().unwrap();
    assert!(cmd_replay(dir.path().to_str().unwrap(), None).unwrap());
}
