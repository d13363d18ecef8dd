use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "maze-drive"])
        .status()
        .expect("failed to invoke cargo check for maze-drive CLI binary");

    assert!(
        status.success(),
        "maze-drive binary must type-check against the generation, nav-graph and movement crates"
    );
}
