use std::process::Command;

mod common;

#[test]
fn test_help_lists_subcommands() {
    let output = Command::new(common::bin()).arg("--help").output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["run", "interfaces", "check"] {
        assert!(
            stdout.contains(subcommand),
            "help output should list the '{}' subcommand; got:\n{}",
            subcommand,
            stdout
        );
    }
}

#[test]
fn test_no_subcommand_fails() {
    let output = Command::new(common::bin()).output().unwrap();
    assert!(!output.status.success());
}
