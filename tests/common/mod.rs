// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::{TempDir, tempdir};

/// A line-oriented stand-in for a book-generating chess engine.
///
/// Understands both `setoption name <K> value <V>` and `set option <K>=<V>`,
/// `uci`, `isready`, `save`, `quit`, plus test hooks: `exit <n>`,
/// `sleep <secs>`, `say <text>` (stdout) and `warn <text>` (stderr).
const FAKE_ENGINE: &str = r#"#!/bin/sh
format=epd
epd_path=book.epd
book_path=book
variant=chess
while IFS= read -r line; do
  case "$line" in
    "setoption name BookFormat value "*) format=${line#setoption name BookFormat value } ;;
    "setoption name EPDPath value "*) epd_path=${line#setoption name EPDPath value } ;;
    "setoption name BookPath value "*) book_path=${line#setoption name BookPath value } ;;
    "setoption name UCI_Variant value "*) variant=${line#setoption name UCI_Variant value } ;;
    "set option BookFormat="*) format=${line#set option BookFormat=} ;;
    "set option EPDPath="*) epd_path=${line#set option EPDPath=} ;;
    "set option BookPath="*) book_path=${line#set option BookPath=} ;;
    "set option UCI_Variant="*) variant=${line#set option UCI_Variant=} ;;
    uci) echo "id name FakeEngine"; echo "uciok" ;;
    isready) echo "readyok" ;;
    save)
      if [ "$format" = "pgn" ]; then
        printf '[Event "?"]\n[Site "?"]\n[White "?"]\n[Black "?"]\n[Result "*"]\n[Variant "%s"]\n\n1. e2e3 e7e6 *\n' "$variant" > "$book_path.pgn"
      else
        printf 'rnbqkbnr/pppppppp/8/8/8/4P3/PPPP1PPP/RNBQKBNR b KQkq - 0 1\n' > "$epd_path"
      fi
      echo "info string book saved" ;;
    "exit "*) exit "${line#exit }" ;;
    "sleep "*) exec sleep "${line#sleep }" ;;
    "say "*) echo "${line#say }" ;;
    "warn "*) echo "${line#warn }" >&2 ;;
    quit) exit 0 ;;
  esac
done
exit 0
"#;

/// ETXTBSY: another test thread forked while the script was still open for writing.
const TEXT_FILE_BUSY: i32 = 26;

/// A temporary working directory holding an executable fake engine.
pub struct FakeEngine {
    pub dir: TempDir,
    pub executable: PathBuf,
}

impl FakeEngine {
    pub fn new() -> Self {
        let dir = tempdir().expect("Failed to create temporary directory");
        let executable = dir.path().join("fake-engine");
        install_fake_engine(&executable);
        Self { dir, executable }
    }

    pub fn working_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn artifact(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Writes the fake engine to `path`, creating parent directories.
pub fn install_fake_engine(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create engine directory");
    }
    fs::write(path, FAKE_ENGINE).expect("Failed to write fake engine");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake engine executable");
    wait_until_executable(path);
}

fn wait_until_executable(path: &Path) {
    for _ in 0..50 {
        match Command::new(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(_) => return,
            Err(e) if e.raw_os_error() == Some(TEXT_FILE_BUSY) => {
                std::thread::sleep(std::time::Duration::from_millis(20));
            }
            Err(e) => panic!("fake engine is not runnable: {e}"),
        }
    }
    panic!("fake engine stayed busy");
}

/// The scenario suite mirroring the book-generation checks, pointed at `executable`.
pub fn book_suite(executable: &Path) -> String {
    format!(
        r#"
language = "en"
executable = "{}"
timeout_secs = 10

[[scenarios]]
name = "epd-compat"
script = [
    "set option BookFormat=epd",
    "set option EPDPath=test_epd_compat.epd",
    "position startpos",
    "generate 2 depth 1",
    "save",
    "quit",
]
artifact = "test_epd_compat.epd"

[[scenarios.assertions]]
kind = "nonempty"
subject = "artifact"

[[scenarios.assertions]]
kind = "contains_all"
subject = "artifact"
values = ["rnbqkbnr"]

[[scenarios]]
name = "pgn-output"
script = [
    "setoption name BookFormat value pgn",
    "setoption name BookPath value test_pgn_output",
    "position startpos",
    "generate 2 depth 1",
    "save",
    "quit",
]
artifact = "test_pgn_output.pgn"

[[scenarios.assertions]]
kind = "contains_all"
subject = "artifact"
values = ["[Event", "[Site", "[White", "[Black", "[Result", "[Variant", "e2e3", "e7e6", "1."]

[[scenarios]]
name = "pgn-variant"
script = [
    "setoption name UCI_Variant value chess",
    "setoption name BookFormat value pgn",
    "setoption name BookPath value test_variant",
    "position startpos",
    "generate 2 depth 1",
    "save",
    "quit",
]
artifact = "test_variant.pgn"

[[scenarios.assertions]]
kind = "contains_all"
subject = "artifact_optional"
values = ['[Variant "chess"]']
"#,
        executable.display()
    )
}

/// A suite whose only scenario makes the engine exit with code 2.
pub fn failing_suite(executable: &Path) -> String {
    format!(
        r#"
executable = "{}"

[[scenarios]]
name = "crashes"
script = ["uci", "warn engine crashed", "exit 2"]
"#,
        executable.display()
    )
}
