use std::path::Path;
use std::process::{Command, Output};

const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
  <g inkscape:label="arena"><path id="loop" d="M 0 0 L 4 0 L 4 4 L 0 4 Z"/></g>
</svg>"#;

fn arenascript(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_arenascript"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

fn setup(script: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("env")).unwrap();
    std::fs::write(dir.path().join("env/arena.svg"), SVG).unwrap();
    std::fs::write(dir.path().join("env/run.txt"), script).unwrap();
    dir
}

#[test]
fn converts_script_relative_to_its_directory() {
    let dir = setup("load-svg arena.svg 0.5\nsample-perimeter-from-svg-path loop\n");
    let out = arenascript(&["--no-flatten", "env/run.txt", "3", "4"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    // length 8 after scaling, trajectory 3 of 4 starts at arc length 4
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "set-arena-size 100.000000\n\
         goto 0.000000 -0.000000\n\
         goto 2.000000 -0.000000\n\
         goto 2.000000 -2.000000\n\
         goto 2.000000 -2.000000\n"
    );
}

#[test]
fn failure_exits_nonzero_with_message() {
    let dir = setup("goto 1 1\nfrobnicate\n");
    let out = arenascript(&["--no-flatten", "env/run.txt"], dir.path());
    assert!(!out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "goto 1 1\n");
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("line 2"), "{}", stderr);
    assert!(stderr.contains("unknown command 'frobnicate'"), "{}", stderr);
}

#[test]
fn broken_flattener_is_reported() {
    let dir = setup("load-svg arena.svg 1\n");
    let out = arenascript(&["--flattener", "/nonexistent/flatten", "env/run.txt"], dir.path());
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("/nonexistent/flatten"), "{}", stderr);
}
