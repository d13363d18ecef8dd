use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_maze-drive"))
        .args(args)
        .output()
        .expect("failed to launch maze-drive")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 output")
}

#[test]
fn drives_generated_maze_to_finish() {
    let output = run(&[
        "--seed",
        "7",
        "--chunk-size",
        "3",
        "--chunks-x",
        "2",
        "--chunks-z",
        "2",
        "--finish",
        "corner",
        "--drive",
    ]);

    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    assert!(text.contains(" S "));
    assert!(text.contains(" F "));
    assert!(text.contains("reached finish at"));
}

#[test]
fn exported_maze_imports_identically() {
    let exported = run(&["--seed", "-19", "--finish", "center", "--export"]);
    assert!(exported.status.success(), "{exported:?}");
    let exported_text = stdout(&exported);
    let mut lines = exported_text.lines();
    let transfer = lines.next().expect("transfer string").to_owned();
    let drawing: Vec<&str> = lines.collect();
    assert!(transfer.starts_with("maze:v1:3x3:"));

    let imported = run(&["--import", &transfer]);
    assert!(imported.status.success(), "{imported:?}");
    let imported_text = stdout(&imported);

    assert_eq!(imported_text.lines().collect::<Vec<_>>(), drawing);
}

#[test]
fn oversized_chunk_is_refused_without_allocating() {
    let output = run(&["--chunk-size", "1048576", "--quiet"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to generate maze"), "{stderr}");
    assert!(stderr.contains("too large"), "{stderr}");
}

#[test]
fn invalid_size_fails_with_context() {
    let output = run(&["--chunk-size", "0"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to generate maze"), "{stderr}");
}
